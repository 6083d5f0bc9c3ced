//! Order type - 주문 정보

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Fee, Trade};
use crate::utils::time::iso8601;

/// 주문 상태
///
/// 알 수 없는 상태 문자열은 `Unknown`으로 그대로 전달된다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Open,
    Closed,
    Canceled,
    Expired,
    Rejected,
    #[serde(untagged)]
    Unknown(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Open => "open",
            OrderStatus::Closed => "closed",
            OrderStatus::Canceled => "canceled",
            OrderStatus::Expired => "expired",
            OrderStatus::Rejected => "rejected",
            OrderStatus::Unknown(raw) => raw,
        }
    }
}

/// 주문 측면
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "buy",
            OrderSide::Sell => "sell",
        }
    }
}

/// 주문 타입
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Limit,
    Market,
    StopLimit,
    StopMarket,
    StopLoss,
    StopLossLimit,
    TakeProfit,
    TakeProfitLimit,
    LimitMaker,
    /// 트리거 가격 도달 시 지정가로 전환되는 주문
    Trigger,
    /// 일부 수량만 호가창에 노출되는 주문
    Iceberg,
}

/// 주문 정보
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// 주문 ID
    pub id: String,
    /// 클라이언트 주문 ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
    /// 타임스탬프 (밀리초)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// ISO 8601 datetime
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
    /// 최종 체결 타임스탬프
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_trade_timestamp: Option<i64>,
    /// 주문 상태
    pub status: OrderStatus,
    /// 심볼
    pub symbol: String,
    /// 주문 타입
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub order_type: Option<OrderType>,
    /// 매수/매도
    pub side: OrderSide,
    /// 주문 가격
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// 평균 체결가
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average: Option<Decimal>,
    /// 주문 수량
    pub amount: Decimal,
    /// 체결된 수량
    #[serde(default)]
    pub filled: Decimal,
    /// 미체결 수량
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<Decimal>,
    /// 트리거가
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_price: Option<Decimal>,
    /// 총 비용 (quote 화폐)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<Decimal>,
    /// 체결 내역
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trades: Vec<Trade>,
    /// 수수료
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<Fee>,
    /// 원본 응답
    #[serde(default)]
    pub info: serde_json::Value,
}

impl Order {
    /// 새 주문 생성
    pub fn new(
        id: String,
        symbol: String,
        order_type: Option<OrderType>,
        side: OrderSide,
        amount: Decimal,
    ) -> Self {
        Self {
            id,
            client_order_id: None,
            timestamp: None,
            datetime: None,
            last_trade_timestamp: None,
            status: OrderStatus::Open,
            symbol,
            order_type,
            side,
            price: None,
            average: None,
            amount,
            filled: Decimal::ZERO,
            remaining: Some(amount),
            trigger_price: None,
            cost: None,
            trades: Vec::new(),
            fee: None,
            info: serde_json::Value::Null,
        }
    }

    /// 타임스탬프 설정
    pub fn with_timestamp(mut self, ts: i64) -> Self {
        self.timestamp = Some(ts);
        self.datetime = iso8601(ts);
        self
    }

    /// 상태 설정
    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    /// 미체결 여부
    pub fn is_open(&self) -> bool {
        self.status == OrderStatus::Open
    }

    /// 취소됨 여부
    pub fn is_canceled(&self) -> bool {
        self.status == OrderStatus::Canceled
    }

    /// 체결률 (%)
    pub fn fill_percentage(&self) -> Decimal {
        if self.amount > Decimal::ZERO {
            self.filled / self.amount * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        }
    }
}
