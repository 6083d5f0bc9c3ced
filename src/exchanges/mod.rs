//! Exchange Implementations
//!
//! 거래소별 구현체

pub mod cex;

pub use cex::Bishino;
