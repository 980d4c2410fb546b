//! Transfer types - 입출금 내역

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CanonicalStatus;

/// 입금 내역
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositInfo {
    pub id: String,
    /// 화폐 코드
    pub currency: String,
    /// 체인 식별자
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// 트랜잭션 해시
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// 정규화된 상태
    pub status: CanonicalStatus,
    /// 원본 응답
    #[serde(default)]
    pub info: serde_json::Value,
}

/// 출금 내역
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalInfo {
    pub id: String,
    /// 화폐 코드
    pub currency: String,
    /// 체인 식별자
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    pub amount: Decimal,
    /// 출금 수수료
    #[serde(default)]
    pub fee: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// 태그 (memo, destination tag 등)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// 정규화된 상태
    pub status: CanonicalStatus,
    /// 원본 응답
    #[serde(default)]
    pub info: serde_json::Value,
}

impl DepositInfo {
    /// 완료 여부
    pub fn is_completed(&self) -> bool {
        self.status == CanonicalStatus::Completed
    }
}

impl WithdrawalInfo {
    /// 완료 여부
    pub fn is_completed(&self) -> bool {
        self.status == CanonicalStatus::Completed
    }

    /// 실제 수령 수량
    pub fn net_amount(&self) -> Decimal {
        self.amount - self.fee
    }
}
