//! Fee type - 수수료 정보

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::TakerOrMaker;

/// 수수료 정보
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fee {
    /// 수수료 금액
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<Decimal>,
    /// 수수료 화폐
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// 수수료율
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<Decimal>,
}

impl Fee {
    /// 새 Fee 생성
    pub fn new(cost: Decimal, currency: String) -> Self {
        Self {
            cost: Some(cost),
            currency: Some(currency),
            rate: None,
        }
    }

    /// 수수료율 설정
    pub fn with_rate(mut self, rate: Decimal) -> Self {
        self.rate = Some(rate);
        self
    }
}

/// 주문 수수료 추정치 (`calculate_fee` 결과)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeEstimate {
    /// 테이커/메이커
    #[serde(rename = "type")]
    pub fee_type: TakerOrMaker,
    /// 수수료 화폐
    pub currency: String,
    /// 적용된 수수료율
    pub rate: Decimal,
    /// 정밀도에 맞춰 반올림된 금액
    pub cost: Decimal,
}

/// 화폐별 입출금 수수료 표 (CCXT `fetchFundingFees`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FundingFees {
    /// 출금 수수료
    pub withdraw: HashMap<String, Decimal>,
    /// 입금 수수료
    pub deposit: HashMap<String, Decimal>,
    /// 원본 응답
    #[serde(default)]
    pub info: serde_json::Value,
}

/// 수수료 정보 (입출금용)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeInfo {
    /// 수수료 금액
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<Decimal>,
    /// 퍼센트 기반 여부
    #[serde(default)]
    pub percentage: bool,
}

impl FeeInfo {
    /// 고정 수수료 생성
    pub fn fixed(fee: Decimal) -> Self {
        Self {
            fee: Some(fee),
            percentage: false,
        }
    }
}

/// 입출금 수수료 (통화별)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositWithdrawFee {
    /// 통화 코드 (예: "BTC", "ETH")
    pub currency: String,
    /// 입금 수수료
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit: Option<FeeInfo>,
    /// 출금 수수료
    #[serde(skip_serializing_if = "Option::is_none")]
    pub withdraw: Option<FeeInfo>,
    /// 원본 응답
    #[serde(default)]
    pub info: serde_json::Value,
}

impl DepositWithdrawFee {
    /// 새 DepositWithdrawFee 생성
    pub fn new(currency: &str) -> Self {
        Self {
            currency: currency.to_string(),
            deposit: None,
            withdraw: None,
            info: serde_json::Value::Null,
        }
    }

    /// 입금 수수료 설정
    pub fn with_deposit(mut self, fee: FeeInfo) -> Self {
        self.deposit = Some(fee);
        self
    }

    /// 출금 수수료 설정
    pub fn with_withdraw(mut self, fee: FeeInfo) -> Self {
        self.withdraw = Some(fee);
        self
    }

    /// 원본 응답 설정
    pub fn with_info(mut self, info: serde_json::Value) -> Self {
        self.info = info;
        self
    }
}

/// 거래소 상태 정보
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeStatus {
    /// 거래소 상태 ("ok", "maintenance", "error" 등)
    pub status: String,
    /// 마지막 업데이트 타임스탬프
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<i64>,
    /// ETA (예상 복구 시간)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta: Option<String>,
    /// 상태 URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// 원본 응답
    #[serde(default)]
    pub info: serde_json::Value,
}

impl ExchangeStatus {
    /// 정상 상태 생성
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            updated: Some(chrono::Utc::now().timestamp_millis()),
            eta: None,
            url: None,
            info: serde_json::Value::Null,
        }
    }

    /// 정상 상태인지 확인
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

impl Default for ExchangeStatus {
    fn default() -> Self {
        Self::ok()
    }
}
