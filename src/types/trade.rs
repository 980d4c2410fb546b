//! Trade type - 체결 내역

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CanonicalStatus, OrderSide};

/// 체결 내역
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeInfo {
    /// 체결 ID
    pub id: String,
    /// 주문 ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// 타임스탬프 (밀리초)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<OrderSide>,
    /// 체결 가격
    pub price: Decimal,
    /// 체결 수량
    pub amount: Decimal,
    /// 수수료
    #[serde(default)]
    pub fee: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_currency: Option<String>,
    /// 체결 상태 (보통 Closed)
    pub status: CanonicalStatus,
    /// 원본 응답
    #[serde(default)]
    pub info: serde_json::Value,
}

impl TradeInfo {
    /// 체결 금액 (price * amount)
    pub fn cost(&self) -> Decimal {
        self.price * self.amount
    }
}
