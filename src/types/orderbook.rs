//! OrderBook type - 호가창

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::time::iso8601;

/// 호가창
///
/// 호가 순서는 거래소가 보낸 순서를 그대로 유지한다.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrderBook {
    /// 심볼
    #[serde(default)]
    pub symbol: String,
    /// 타임스탬프 (밀리초)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timestamp: Option<i64>,
    /// ISO 8601 datetime
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub datetime: Option<String>,
    /// 매수호가
    #[serde(default)]
    pub bids: Vec<OrderBookEntry>,
    /// 매도호가
    #[serde(default)]
    pub asks: Vec<OrderBookEntry>,
    /// 호가 시퀀스 번호
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub nonce: Option<i64>,
}

/// 호가 항목
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBookEntry {
    /// 가격
    pub price: Decimal,
    /// 수량
    pub amount: Decimal,
}

impl OrderBook {
    /// 새 OrderBook 생성
    pub fn new(symbol: String) -> Self {
        Self {
            symbol,
            timestamp: None,
            datetime: None,
            bids: Vec::new(),
            asks: Vec::new(),
            nonce: None,
        }
    }

    /// 타임스탬프 설정
    pub fn with_timestamp(mut self, ts: i64) -> Self {
        self.timestamp = Some(ts);
        self.datetime = iso8601(ts);
        self
    }

    /// 첫 번째 매수호가
    pub fn best_bid(&self) -> Option<&OrderBookEntry> {
        self.bids.first()
    }

    /// 첫 번째 매도호가
    pub fn best_ask(&self) -> Option<&OrderBookEntry> {
        self.asks.first()
    }

    /// 스프레드 (매도-매수 가격 차이)
    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask.price - bid.price),
            _ => None,
        }
    }
}
