//! OHLCV type - 캔들 데이터

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::time::iso8601;

/// OHLCV 캔들 데이터
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OHLCV {
    /// 타임스탬프 (밀리초)
    pub timestamp: i64,
    /// 시가
    pub open: Decimal,
    /// 고가
    pub high: Decimal,
    /// 저가
    pub low: Decimal,
    /// 종가
    pub close: Decimal,
    /// 거래량
    pub volume: Decimal,
}

impl OHLCV {
    /// 새 OHLCV 생성
    pub fn new(
        timestamp: i64,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// 상승 캔들 여부
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// datetime 문자열 반환
    pub fn datetime(&self) -> String {
        iso8601(self.timestamp).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_ohlcv() {
        let candle = OHLCV::new(
            1700000000000,
            dec!(100),
            dec!(110),
            dec!(95),
            dec!(105),
            dec!(12.5),
        );
        assert!(candle.is_bullish());
        assert!(candle.datetime().starts_with("2023-11-14"));
    }
}
