//! CCXT-Bishino: unified REST adapter for the Bishino exchange
//!
//! CCXT 통합 인터페이스로 Bishino 거래소를 감싼 라이브러리
//!
//! ```no_run
//! use ccxt_bishino::{Bishino, Exchange, ExchangeConfig};
//!
//! # async fn run() -> ccxt_bishino::CcxtResult<()> {
//! let exchange = Bishino::new(ExchangeConfig::new())?;
//! let ticker = exchange.fetch_ticker("ETH/BTC").await?;
//! println!("{:?}", ticker.last);
//! # Ok(())
//! # }
//! ```

#[macro_use]
mod macros;

pub mod client;
pub mod errors;
pub mod exchanges;
pub mod types;
pub mod utils;

// Re-exports
pub use client::{ExchangeConfig, HttpClient, RateLimiter};
pub use errors::{CcxtError, CcxtResult};
pub use exchanges::cex::{BishinoOptions, OrderParams};
pub use exchanges::Bishino;
pub use types::Exchange;
