//! Market type - 거래소 마켓 정보

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::PrecisionMode;

/// 마켓 타입
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MarketType {
    #[default]
    Spot,
    Margin,
    Swap,
    Future,
    Option,
}

/// 마켓 정보
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    /// 거래소 내부 ID (예: 'BTC_USDT')
    pub id: String,
    /// 소문자 ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lowercase_id: Option<String>,
    /// 통합 심볼 (예: 'BTC/USDT')
    pub symbol: String,
    /// 기준 화폐 (예: 'BTC')
    pub base: String,
    /// 견적 화폐 (예: 'USDT')
    pub quote: String,
    /// 거래소 기준 화폐 ID
    pub base_id: String,
    /// 거래소 견적 화폐 ID
    pub quote_id: String,
    /// 마켓 타입
    #[serde(rename = "type")]
    pub market_type: MarketType,
    /// 현물 여부
    pub spot: bool,
    /// 활성 상태
    pub active: bool,
    /// 테이커 수수료
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taker: Option<Decimal>,
    /// 메이커 수수료
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maker: Option<Decimal>,
    /// 정밀도
    pub precision: MarketPrecision,
    /// 거래 제한
    pub limits: MarketLimits,
    /// 원본 응답
    #[serde(default)]
    pub info: serde_json::Value,
    /// 티어 기반 수수료
    #[serde(default)]
    pub tier_based: bool,
    /// 퍼센트 기반 수수료
    #[serde(default)]
    pub percentage: bool,
}

/// 마켓 정밀도
///
/// 값은 소수 자릿수(예: `8`)일 수도 있고 틱 크기(예: `0.01`, `1`)일 수도 있다.
/// 어느 쪽인지는 `amount_mode` / `price_mode` 에 기록한다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketPrecision {
    /// 수량 정밀도
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    /// 가격 정밀도
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// 기준 정밀도
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<Decimal>,
    /// 견적 정밀도
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<Decimal>,
    /// 수량 정밀도 해석 방식
    #[serde(default)]
    pub amount_mode: PrecisionMode,
    /// 가격 정밀도 해석 방식
    #[serde(default)]
    pub price_mode: PrecisionMode,
}

/// 마켓 제한
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketLimits {
    /// 수량 제한
    #[serde(default)]
    pub amount: MinMax,
    /// 가격 제한
    #[serde(default)]
    pub price: MinMax,
    /// 비용 제한
    #[serde(default)]
    pub cost: MinMax,
}

/// 최소/최대 값
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MinMax {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Decimal>,
}

impl Market {
    /// 현물 마켓 생성
    pub fn spot(id: String, symbol: String, base: String, quote: String) -> Self {
        Self {
            lowercase_id: Some(id.to_lowercase()),
            id,
            symbol,
            base_id: base.clone(),
            quote_id: quote.clone(),
            base,
            quote,
            market_type: MarketType::Spot,
            spot: true,
            active: true,
            taker: None,
            maker: None,
            precision: MarketPrecision::default(),
            limits: MarketLimits::default(),
            info: serde_json::Value::Null,
            tier_based: false,
            percentage: true,
        }
    }
}
