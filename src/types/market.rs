//! QueueSymbol - 거래소별 거래쌍 정보

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 거래쌍 (거래소 하나의 거래 가능 심볼)
///
/// Built once during symbol discovery and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueSymbol {
    /// 거래소 내부 심볼 (예: 'BTC-USDT', 'BTCUSDT', 'KRW-BTC')
    pub symbol: String,
    /// 기준 화폐 (예: 'BTC')
    pub base_name: String,
    /// 견적 화폐 (예: 'USDT')
    pub quote_name: String,
    /// 집계 키 (기본값은 기준 화폐)
    pub comp_name: String,
    /// 최소 주문 가격
    #[serde(default)]
    pub min_price: Decimal,
    /// 최대 주문 가격
    #[serde(default)]
    pub max_price: Decimal,
    /// 호가 단위
    #[serde(default)]
    pub tick_size: Decimal,
    /// 최소 주문 수량
    #[serde(default)]
    pub min_qty: Decimal,
    /// 최대 주문 수량
    #[serde(default)]
    pub max_qty: Decimal,
    /// 수량 단위
    #[serde(default)]
    pub qty_step: Decimal,
    /// 메이커 수수료율
    #[serde(default)]
    pub maker_fee: Decimal,
    /// 테이커 수수료율
    #[serde(default)]
    pub taker_fee: Decimal,
}

impl QueueSymbol {
    /// 새 거래쌍 생성
    pub fn new(
        symbol: impl Into<String>,
        base_name: impl Into<String>,
        quote_name: impl Into<String>,
    ) -> Self {
        let base_name = base_name.into().to_uppercase();
        Self {
            symbol: symbol.into(),
            comp_name: base_name.clone(),
            base_name,
            quote_name: quote_name.into().to_uppercase(),
            min_price: Decimal::ZERO,
            max_price: Decimal::ZERO,
            tick_size: Decimal::ZERO,
            min_qty: Decimal::ZERO,
            max_qty: Decimal::ZERO,
            qty_step: Decimal::ZERO,
            maker_fee: Decimal::ZERO,
            taker_fee: Decimal::ZERO,
        }
    }

    /// 가격 제한 설정
    pub fn with_price_bounds(mut self, min: Decimal, max: Decimal, tick: Decimal) -> Self {
        self.min_price = min;
        self.max_price = max;
        self.tick_size = tick;
        self
    }

    /// 수량 제한 설정
    pub fn with_qty_bounds(mut self, min: Decimal, max: Decimal, step: Decimal) -> Self {
        self.min_qty = min;
        self.max_qty = max;
        self.qty_step = step;
        self
    }

    /// 수수료 설정
    pub fn with_fees(mut self, maker: Decimal, taker: Decimal) -> Self {
        self.maker_fee = maker;
        self.taker_fee = taker;
        self
    }

    /// 집계 키 설정
    pub fn with_comp_name(mut self, comp_name: impl Into<String>) -> Self {
        self.comp_name = comp_name.into();
        self
    }

    /// 대소문자 무시 심볼 키
    pub fn key(&self) -> String {
        self.symbol.to_uppercase()
    }
}
