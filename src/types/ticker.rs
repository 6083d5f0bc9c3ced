//! Ticker type - 시세 정보

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::time::iso8601;

/// 시세 정보
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker {
    /// 심볼
    pub symbol: String,
    /// 타임스탬프 (밀리초)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// ISO 8601 datetime
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
    /// 고가
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<Decimal>,
    /// 저가
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<Decimal>,
    /// 최고 매수호가
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bid: Option<Decimal>,
    /// 매수호가 수량
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bid_volume: Option<Decimal>,
    /// 최저 매도호가
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ask: Option<Decimal>,
    /// 매도호가 수량
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ask_volume: Option<Decimal>,
    /// 거래량 가중 평균가
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vwap: Option<Decimal>,
    /// 시가
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<Decimal>,
    /// 종가 (= last)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close: Option<Decimal>,
    /// 최종 거래가
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<Decimal>,
    /// 전일 종가
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_close: Option<Decimal>,
    /// 가격 변동
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<Decimal>,
    /// 가격 변동률 (%)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<Decimal>,
    /// 평균가
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average: Option<Decimal>,
    /// 기준화폐 거래량
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_volume: Option<Decimal>,
    /// 견적화폐 거래량
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_volume: Option<Decimal>,
    /// 원본 응답
    #[serde(default)]
    pub info: serde_json::Value,
}

impl Ticker {
    /// 새 Ticker 생성
    pub fn new(symbol: String) -> Self {
        Self {
            symbol,
            timestamp: None,
            datetime: None,
            high: None,
            low: None,
            bid: None,
            bid_volume: None,
            ask: None,
            ask_volume: None,
            vwap: None,
            open: None,
            close: None,
            last: None,
            previous_close: None,
            change: None,
            percentage: None,
            average: None,
            base_volume: None,
            quote_volume: None,
            info: serde_json::Value::Null,
        }
    }

    /// 타임스탬프 설정
    pub fn with_timestamp(mut self, ts: i64) -> Self {
        self.timestamp = Some(ts);
        self.datetime = iso8601(ts);
        self
    }

    /// 원본 응답 설정
    pub fn with_info(mut self, info: serde_json::Value) -> Self {
        self.info = info;
        self
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(String::new())
    }
}
