//! Unified data types
//!
//! CCXT 통합 데이터 구조

mod balance;
mod exchange;
mod fee;
mod market;
mod ohlcv;
mod order;
mod orderbook;
mod ticker;
mod trade;
mod transaction;

pub use balance::{Balance, Balances};
pub use exchange::{
    Exchange, ExchangeFeatures, ExchangeId, ExchangeUrls, SignedRequest, Timeframe,
};
pub use fee::{DepositWithdrawFee, ExchangeStatus, Fee, FeeEstimate, FeeInfo, FundingFees};
pub use market::{Market, MarketLimits, MarketPrecision, MarketType, MinMax};
pub use ohlcv::OHLCV;
pub use order::{Order, OrderSide, OrderStatus, OrderType};
pub use orderbook::{OrderBook, OrderBookEntry};
pub use ticker::Ticker;
pub use trade::{TakerOrMaker, Trade};
pub use transaction::{Transaction, TransactionStatus, TransactionType};
