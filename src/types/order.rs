//! Order types - 주문 정보

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CanonicalStatus;
use crate::utils::time::iso8601;

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

    /// 문자열에서 변환 (BUY/bid/Sell/ask 등)
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "buy" | "bid" | "b" => Some(OrderSide::Buy),
            "sell" | "ask" | "s" => Some(OrderSide::Sell),
            _ => None,
        }
    }
}

/// 주문 타입
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Limit,
    Market,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Limit => "limit",
            OrderType::Market => "market",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "limit" => Some(OrderType::Limit),
            "market" => Some(OrderType::Market),
            _ => None,
        }
    }
}

/// 주문 요청
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// 거래소 내부 심볼
    pub symbol: String,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub side: OrderSide,
    pub amount: Decimal,
    /// 지정가 주문시 가격
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
}

impl OrderRequest {
    /// 지정가 주문 요청
    pub fn limit(symbol: &str, side: OrderSide, amount: Decimal, price: Decimal) -> Self {
        Self {
            symbol: symbol.to_string(),
            order_type: OrderType::Limit,
            side,
            amount,
            price: Some(price),
            client_order_id: None,
        }
    }

    /// 시장가 주문 요청
    pub fn market(symbol: &str, side: OrderSide, amount: Decimal) -> Self {
        Self {
            symbol: symbol.to_string(),
            order_type: OrderType::Market,
            side,
            amount,
            price: None,
            client_order_id: None,
        }
    }

    /// 클라이언트 주문 ID 설정
    pub fn with_client_order_id(mut self, client_order_id: &str) -> Self {
        self.client_order_id = Some(client_order_id.to_string());
        self
    }
}

/// 주문 정보
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInfo {
    /// 주문 ID
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
    /// 타임스탬프 (밀리초)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// ISO 8601 datetime
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
    /// 정규화된 상태
    pub status: CanonicalStatus,
    pub symbol: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub order_type: Option<OrderType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<OrderSide>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// 평균 체결가
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average: Option<Decimal>,
    pub amount: Decimal,
    #[serde(default)]
    pub filled: Decimal,
    /// 원본 응답
    #[serde(default)]
    pub info: serde_json::Value,
}

impl OrderInfo {
    pub fn new(id: impl Into<String>, symbol: impl Into<String>, status: CanonicalStatus) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            status,
            ..Default::default()
        }
    }

    /// 타임스탬프 설정
    pub fn with_timestamp(mut self, ts: i64) -> Self {
        self.timestamp = Some(ts);
        self.datetime = iso8601(ts);
        self
    }

    /// 미체결 수량
    pub fn remaining(&self) -> Decimal {
        (self.amount - self.filled).max(Decimal::ZERO)
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

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_request_limit() {
        let req = OrderRequest::limit("BTCUSDT", OrderSide::Buy, dec!(0.1), dec!(50000))
            .with_client_order_id("my-order-1");

        assert_eq!(req.order_type, OrderType::Limit);
        assert_eq!(req.price, Some(dec!(50000)));
        assert_eq!(req.client_order_id.as_deref(), Some("my-order-1"));
    }

    #[test]
    fn test_order_request_serialization() {
        let req = OrderRequest::market("ETHUSDT", OrderSide::Sell, dec!(1.0));
        let json = serde_json::to_string(&req).unwrap();

        assert!(json.contains("\"type\":\"market\""));
        assert!(json.contains("\"side\":\"sell\""));
        assert!(!json.contains("price"));
    }

    #[test]
    fn test_order_info_fill() {
        let mut order = OrderInfo::new("1", "BTCUSDT", CanonicalStatus::PartiallyFilled)
            .with_timestamp(1700000000000);
        order.amount = dec!(1.0);
        order.filled = dec!(0.25);

        assert_eq!(order.remaining(), dec!(0.75));
        assert_eq!(order.fill_percentage(), dec!(25));
        assert!(order.datetime.is_some());
    }

    #[test]
    fn test_side_parse() {
        assert_eq!(OrderSide::parse("BUY"), Some(OrderSide::Buy));
        assert_eq!(OrderSide::parse("ask"), Some(OrderSide::Sell));
        assert_eq!(OrderSide::parse("hold"), None);
        assert_eq!(OrderType::parse("LIMIT"), Some(OrderType::Limit));
    }
}
