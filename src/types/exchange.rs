//! Exchange trait - Unified exchange interface
//!
//! The slice of the CCXT Exchange class that spot REST adapters implement.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{
    Balances, DepositWithdrawFee, ExchangeStatus, FundingFees, Market, OHLCV, Order, OrderBook,
    OrderSide, OrderType, Ticker, Trade, Transaction,
};
use crate::errors::{CcxtError, CcxtResult};

/// Exchange ID - identifies the exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeId {
    Bishino,
}

impl ExchangeId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExchangeId::Bishino => "bishino",
        }
    }
}

impl std::fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 타임프레임
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    Minute1,
    #[serde(rename = "5m")]
    Minute5,
    #[serde(rename = "15m")]
    Minute15,
    #[serde(rename = "30m")]
    Minute30,
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "4h")]
    Hour4,
    #[serde(rename = "1d")]
    Day1,
    #[serde(rename = "1w")]
    Week1,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Minute1 => "1m",
            Timeframe::Minute5 => "5m",
            Timeframe::Minute15 => "15m",
            Timeframe::Minute30 => "30m",
            Timeframe::Hour1 => "1h",
            Timeframe::Hour4 => "4h",
            Timeframe::Day1 => "1d",
            Timeframe::Week1 => "1w",
        }
    }

    /// 밀리초 단위 기간
    pub fn to_millis(&self) -> i64 {
        match self {
            Timeframe::Minute1 => 60 * 1000,
            Timeframe::Minute5 => 5 * 60 * 1000,
            Timeframe::Minute15 => 15 * 60 * 1000,
            Timeframe::Minute30 => 30 * 60 * 1000,
            Timeframe::Hour1 => 60 * 60 * 1000,
            Timeframe::Hour4 => 4 * 60 * 60 * 1000,
            Timeframe::Day1 => 24 * 60 * 60 * 1000,
            Timeframe::Week1 => 7 * 24 * 60 * 60 * 1000,
        }
    }
}

/// Exchange feature flags - indicates supported functionality
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeFeatures {
    // === Market Types ===
    pub cors: bool,
    pub spot: bool,
    pub margin: bool,
    pub swap: bool,
    pub future: bool,

    // === Public API ===
    pub fetch_markets: bool,
    pub fetch_ticker: bool,
    pub fetch_tickers: bool,
    pub fetch_order_book: bool,
    pub fetch_trades: bool,
    pub fetch_ohlcv: bool,
    pub fetch_status: bool,
    pub fetch_time: bool,
    pub fetch_bids_asks: bool,

    // === Private Trading API ===
    pub fetch_balance: bool,
    pub create_order: bool,
    pub create_limit_order: bool,
    pub create_market_order: bool,
    pub create_stop_order: bool,
    pub cancel_order: bool,
    pub fetch_order: bool,
    pub fetch_orders: bool,
    pub fetch_open_orders: bool,
    pub fetch_closed_orders: bool,
    pub fetch_my_trades: bool,

    // === Account/Wallet ===
    pub fetch_deposits: bool,
    pub fetch_withdrawals: bool,
    pub fetch_deposit_address: bool,
    pub withdraw: bool,

    // === Fees ===
    pub fetch_funding_fees: bool,
    pub fetch_deposit_withdraw_fees: bool,
    pub fetch_trading_fees: bool,

    // === WebSocket ===
    pub ws: bool,
}

/// 거래소 URL 정보
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExchangeUrls {
    pub logo: Option<String>,
    pub api: HashMap<String, String>,
    pub www: Option<String>,
    pub doc: Vec<String>,
    pub fees: Option<String>,
}

/// 서명된 요청
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub url: String,
    pub method: String,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

/// 거래소 통합 인터페이스
///
/// CCXT의 Exchange 클래스를 Rust trait으로 포팅
#[async_trait]
pub trait Exchange: Send + Sync {
    // === 메타데이터 ===

    /// 거래소 ID
    fn id(&self) -> ExchangeId;

    /// 거래소 이름
    fn name(&self) -> &str;

    /// API 버전
    fn version(&self) -> &str {
        "v1"
    }

    /// 국가 목록
    fn countries(&self) -> &[&str] {
        &[]
    }

    /// 레이트 리밋 (밀리초)
    fn rate_limit(&self) -> u64 {
        1000
    }

    /// 지원 기능
    fn has(&self) -> &ExchangeFeatures;

    /// 특정 기능 지원 여부
    fn has_feature(&self, feature: &str) -> bool {
        let features = self.has();
        match feature {
            "fetchMarkets" => features.fetch_markets,
            "fetchTicker" => features.fetch_ticker,
            "fetchTickers" => features.fetch_tickers,
            "fetchOrderBook" => features.fetch_order_book,
            "fetchTrades" => features.fetch_trades,
            "fetchOHLCV" => features.fetch_ohlcv,
            "fetchStatus" => features.fetch_status,
            "fetchTime" => features.fetch_time,
            "fetchBidsAsks" => features.fetch_bids_asks,
            "fetchBalance" => features.fetch_balance,
            "createOrder" => features.create_order,
            "cancelOrder" => features.cancel_order,
            "fetchOrder" => features.fetch_order,
            "fetchOrders" => features.fetch_orders,
            "fetchOpenOrders" => features.fetch_open_orders,
            "fetchClosedOrders" => features.fetch_closed_orders,
            "fetchMyTrades" => features.fetch_my_trades,
            "fetchDeposits" => features.fetch_deposits,
            "fetchWithdrawals" => features.fetch_withdrawals,
            "fetchDepositAddress" => features.fetch_deposit_address,
            "withdraw" => features.withdraw,
            "fetchFundingFees" => features.fetch_funding_fees,
            "fetchDepositWithdrawFees" => features.fetch_deposit_withdraw_fees,
            "fetchTradingFees" => features.fetch_trading_fees,
            _ => false,
        }
    }

    /// URL 정보
    fn urls(&self) -> &ExchangeUrls;

    /// 지원 타임프레임
    fn timeframes(&self) -> &HashMap<Timeframe, String>;

    // === Public API ===

    /// 마켓 로드 (캐싱)
    async fn load_markets(&self, reload: bool) -> CcxtResult<HashMap<String, Market>>;

    /// 마켓 목록 조회
    async fn fetch_markets(&self) -> CcxtResult<Vec<Market>>;

    /// 시세 조회
    async fn fetch_ticker(&self, symbol: &str) -> CcxtResult<Ticker>;

    /// 복수 시세 조회
    async fn fetch_tickers(&self, symbols: Option<&[&str]>) -> CcxtResult<HashMap<String, Ticker>> {
        let _ = symbols;
        Err(CcxtError::NotSupported {
            feature: "fetchTickers".into(),
        })
    }

    /// 호가창 조회
    async fn fetch_order_book(&self, symbol: &str, limit: Option<u32>) -> CcxtResult<OrderBook>;

    /// 체결 내역 조회
    async fn fetch_trades(
        &self,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Trade>>;

    /// OHLCV 조회
    async fn fetch_ohlcv(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<OHLCV>>;

    /// Fetch server time
    async fn fetch_time(&self) -> CcxtResult<i64> {
        Err(CcxtError::NotSupported {
            feature: "fetchTime".into(),
        })
    }

    /// Fetch exchange status
    async fn fetch_status(&self) -> CcxtResult<ExchangeStatus> {
        Err(CcxtError::NotSupported {
            feature: "fetchStatus".into(),
        })
    }

    // === Private API ===

    /// 잔고 조회
    async fn fetch_balance(&self) -> CcxtResult<Balances>;

    /// 주문 생성
    async fn create_order(
        &self,
        symbol: &str,
        order_type: OrderType,
        side: OrderSide,
        amount: Decimal,
        price: Option<Decimal>,
    ) -> CcxtResult<Order>;

    /// 지정가 주문 생성
    async fn create_limit_order(
        &self,
        symbol: &str,
        side: OrderSide,
        amount: Decimal,
        price: Decimal,
    ) -> CcxtResult<Order> {
        self.create_order(symbol, OrderType::Limit, side, amount, Some(price))
            .await
    }

    /// 시장가 주문 생성
    async fn create_market_order(
        &self,
        symbol: &str,
        side: OrderSide,
        amount: Decimal,
    ) -> CcxtResult<Order> {
        self.create_order(symbol, OrderType::Market, side, amount, None)
            .await
    }

    /// Create a stop / trigger order
    async fn create_stop_order(
        &self,
        symbol: &str,
        order_type: OrderType,
        side: OrderSide,
        amount: Decimal,
        price: Option<Decimal>,
        stop_price: Decimal,
    ) -> CcxtResult<Order> {
        let _ = (symbol, order_type, side, amount, price, stop_price);
        Err(CcxtError::NotSupported {
            feature: "createStopOrder".into(),
        })
    }

    /// 주문 취소
    async fn cancel_order(&self, id: &str, symbol: Option<&str>) -> CcxtResult<Order>;

    /// 주문 조회
    async fn fetch_order(&self, id: &str, symbol: Option<&str>) -> CcxtResult<Order>;

    /// 미체결 주문 목록
    async fn fetch_open_orders(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Order>>;

    /// 체결 완료 주문 목록
    async fn fetch_closed_orders(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Order>> {
        let _ = (symbol, since, limit);
        Err(CcxtError::NotSupported {
            feature: "fetchClosedOrders".into(),
        })
    }

    /// 전체 주문 목록 (미체결 + 체결 + 취소)
    async fn fetch_orders(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Order>> {
        let _ = (symbol, since, limit);
        Err(CcxtError::NotSupported {
            feature: "fetchOrders".into(),
        })
    }

    /// 내 체결 내역
    async fn fetch_my_trades(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Trade>> {
        let _ = (symbol, since, limit);
        Err(CcxtError::NotSupported {
            feature: "fetchMyTrades".into(),
        })
    }

    // === 입출금 ===

    /// 입금 내역
    async fn fetch_deposits(
        &self,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Transaction>> {
        let _ = (code, since, limit);
        Err(CcxtError::NotSupported {
            feature: "fetchDeposits".into(),
        })
    }

    /// 출금 내역
    async fn fetch_withdrawals(
        &self,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Transaction>> {
        let _ = (code, since, limit);
        Err(CcxtError::NotSupported {
            feature: "fetchWithdrawals".into(),
        })
    }

    /// Withdraw funds
    async fn withdraw(
        &self,
        code: &str,
        amount: Decimal,
        address: &str,
        tag: Option<&str>,
    ) -> CcxtResult<Transaction> {
        let _ = (code, amount, address, tag);
        Err(CcxtError::NotSupported {
            feature: "withdraw".into(),
        })
    }

    /// Legacy per-currency funding fee table
    async fn fetch_funding_fees(&self) -> CcxtResult<FundingFees> {
        Err(CcxtError::NotSupported {
            feature: "fetchFundingFees".into(),
        })
    }

    /// Deposit / withdrawal fees per currency
    async fn fetch_deposit_withdraw_fees(
        &self,
        codes: Option<&[&str]>,
    ) -> CcxtResult<HashMap<String, DepositWithdrawFee>> {
        let _ = codes;
        Err(CcxtError::NotSupported {
            feature: "fetchDepositWithdrawFees".into(),
        })
    }

    // === Utilities ===

    /// Convert symbol to market ID
    fn market_id(&self, symbol: &str) -> Option<String>;

    /// Convert market ID to symbol
    fn symbol(&self, market_id: &str) -> Option<String>;

    /// Sign a request
    ///
    /// `params` keeps caller order; it is what ends up in the query string.
    fn sign(
        &self,
        path: &str,
        api: &str,
        method: &str,
        params: &[(String, String)],
    ) -> CcxtResult<SignedRequest>;
}
