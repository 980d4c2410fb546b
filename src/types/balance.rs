//! Balance type - 잔고 정보

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 잔고 정보
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balances {
    /// 타임스탬프 (밀리초)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// 화폐별 잔고
    #[serde(flatten)]
    pub currencies: HashMap<String, Balance>,
    /// 원본 응답
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub info: serde_json::Value,
}

/// 단일 화폐 잔고
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    /// 사용 가능 잔고
    pub free: Decimal,
    /// 사용 중 잔고 (주문 등)
    pub used: Decimal,
}

impl Balance {
    pub fn new(free: Decimal, used: Decimal) -> Self {
        Self { free, used }
    }

    /// 총 잔고
    pub fn total(&self) -> Decimal {
        self.free + self.used
    }
}

impl Balances {
    pub fn new(timestamp: i64) -> Self {
        Self {
            timestamp: Some(timestamp),
            ..Default::default()
        }
    }

    /// 잔고 추가 (같은 화폐는 합산)
    pub fn add(&mut self, currency: impl Into<String>, balance: Balance) {
        let entry = self.currencies.entry(currency.into().to_uppercase()).or_default();
        entry.free += balance.free;
        entry.used += balance.used;
    }

    /// 특정 화폐 잔고 조회
    pub fn get(&self, currency: &str) -> Option<&Balance> {
        self.currencies.get(&currency.to_uppercase())
    }

    /// 사용 가능 잔고 (없으면 0)
    pub fn free(&self, currency: &str) -> Decimal {
        self.get(currency).map(|b| b.free).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_balances_merge_same_currency() {
        let mut balances = Balances::new(1);
        balances.add("usdt", Balance::new(dec!(100), dec!(5)));
        balances.add("USDT", Balance::new(dec!(1), Decimal::ZERO));

        let usdt = balances.get("Usdt").unwrap();
        assert_eq!(usdt.free, dec!(101));
        assert_eq!(usdt.total(), dec!(106));
        assert_eq!(balances.free("BTC"), Decimal::ZERO);
    }
}
