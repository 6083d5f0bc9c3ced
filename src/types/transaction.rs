//! Transaction type - 입출금 내역

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Fee;
use crate::utils::time::iso8601;

/// 트랜잭션 타입
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
}

/// 트랜잭션 상태
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Ok,
    Canceled,
    Failed,
    /// 해석하지 못한 원본 상태
    #[serde(untagged)]
    Unknown(String),
}

/// 입출금 트랜잭션
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// 트랜잭션 ID
    pub id: String,
    /// 타임스탬프 (밀리초)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// ISO 8601 datetime
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
    /// 업데이트 타임스탬프
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<i64>,
    /// 트랜잭션 타입
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    /// 화폐 코드
    pub currency: String,
    /// 금액
    pub amount: Decimal,
    /// 상태
    pub status: TransactionStatus,
    /// 주소
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// 태그 (memo, destination tag 등)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// 트랜잭션 해시
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
    /// 수수료
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<Fee>,
    /// 원본 응답
    #[serde(default)]
    pub info: serde_json::Value,
}

impl Transaction {
    /// 새 입금 트랜잭션 생성
    pub fn deposit(id: String, currency: String, amount: Decimal) -> Self {
        Self {
            id,
            timestamp: None,
            datetime: None,
            updated: None,
            tx_type: TransactionType::Deposit,
            currency,
            amount,
            status: TransactionStatus::Pending,
            address: None,
            tag: None,
            txid: None,
            fee: None,
            info: serde_json::Value::Null,
        }
    }

    /// 새 출금 트랜잭션 생성
    pub fn withdrawal(id: String, currency: String, amount: Decimal) -> Self {
        Self {
            id,
            timestamp: None,
            datetime: None,
            updated: None,
            tx_type: TransactionType::Withdrawal,
            currency,
            amount,
            status: TransactionStatus::Pending,
            address: None,
            tag: None,
            txid: None,
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

    /// 주소 설정
    pub fn with_address(mut self, address: String, tag: Option<String>) -> Self {
        self.address = Some(address);
        self.tag = tag;
        self
    }

    /// 상태 설정
    pub fn with_status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    /// 트랜잭션 해시 설정
    pub fn with_txid(mut self, txid: String) -> Self {
        self.txid = Some(txid);
        self
    }

    /// 수수료 설정
    pub fn with_fee(mut self, fee: Fee) -> Self {
        self.fee = Some(fee);
        self
    }

    /// 입금인지 확인
    pub fn is_deposit(&self) -> bool {
        self.tx_type == TransactionType::Deposit
    }

    /// 출금인지 확인
    pub fn is_withdrawal(&self) -> bool {
        self.tx_type == TransactionType::Withdrawal
    }

    /// 완료됨인지 확인
    pub fn is_completed(&self) -> bool {
        self.status == TransactionStatus::Ok
    }

    /// 대기 중인지 확인
    pub fn is_pending(&self) -> bool {
        self.status == TransactionStatus::Pending
    }
}
