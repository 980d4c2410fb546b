//! Ticker types - 실시간 시세 상태
//!
//! `Tickers` is the per-exchange aggregate mutated by exactly one polling task. Entries are
//! never removed from the list; a ticker whose symbol disappeared from the exchange snapshot is
//! marked with the `"X"` sentinel and stays in place so positional references remain valid.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{QueueSymbol, WState};

/// 폴링 태스크와 소비자가 공유하는 시세 집합
pub type SharedTickers = Arc<RwLock<Tickers>>;

/// Symbol value of a ticker that dropped out of the exchange snapshot.
pub const DEAD_SYMBOL: &str = "X";

/// 정규화된 시세
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker {
    /// 거래소 내부 심볼 (무효화되면 "X")
    pub symbol: String,
    /// 기준 화폐
    pub base_name: String,
    /// 견적 화폐
    pub quote_name: String,
    /// 집계 키
    pub comp_name: String,
    /// 최고 매수호가 (법정화폐 환산)
    pub bid_price: Decimal,
    /// 최저 매도호가 (법정화폐 환산)
    pub ask_price: Decimal,
    /// 최종 거래가 (법정화폐 환산)
    pub last_price: Decimal,
    /// 24시간 거래대금 / volume_24h_base
    pub volume_24h: Decimal,
    /// 1분 거래대금 추정치 / volume_1m_base
    pub volume_1m: Decimal,
    /// 직전 윈도우의 환산 24시간 거래대금
    pub previous_24h: Decimal,
    /// 마지막 윈도우 갱신 시각 (밀리초)
    pub timestamp: i64,
    /// 거래 가능 여부
    pub active: bool,
    /// 입금 가능 여부
    pub deposit: bool,
    /// 출금 가능 여부
    pub withdraw: bool,
    /// 체인 네트워크 사용 가능 여부
    pub network: bool,
}

impl Ticker {
    /// 거래쌍으로부터 Ticker 생성
    pub fn from_symbol(qs: &QueueSymbol) -> Self {
        Self {
            symbol: qs.symbol.clone(),
            base_name: qs.base_name.clone(),
            quote_name: qs.quote_name.clone(),
            comp_name: qs.comp_name.clone(),
            bid_price: Decimal::ZERO,
            ask_price: Decimal::ZERO,
            last_price: Decimal::ZERO,
            volume_24h: Decimal::ZERO,
            volume_1m: Decimal::ZERO,
            previous_24h: Decimal::ZERO,
            timestamp: 0,
            active: true,
            deposit: true,
            withdraw: true,
            network: true,
        }
    }

    /// 무효화 여부
    pub fn is_dead(&self) -> bool {
        self.symbol == DEAD_SYMBOL
    }

    /// 무효화 (같은 레지스트리 세대 안에서는 되돌릴 수 없음)
    pub fn mark_dead(&mut self) {
        self.symbol = DEAD_SYMBOL.to_string();
    }

    pub(crate) fn apply_state(&mut self, state: &WState) {
        self.active = state.active;
        self.deposit = state.deposit;
        self.withdraw = state.withdraw;
        self.network = state.network_available();
    }
}

/// 원본 시세 (견적 화폐 단위, 환산 전)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuote {
    pub last: Decimal,
    pub bid: Decimal,
    pub ask: Decimal,
    /// 24시간 거래대금 (견적 화폐 단위)
    pub volume_24h: Decimal,
}

impl RawQuote {
    pub fn new(last: Decimal, bid: Decimal, ask: Decimal, volume_24h: Decimal) -> Self {
        Self {
            last,
            bid,
            ask,
            volume_24h,
        }
    }
}

/// One polling cycle's raw quotes keyed by exchange-native symbol (case-insensitive).
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    quotes: HashMap<String, RawQuote>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: &str, quote: RawQuote) {
        self.quotes.insert(symbol.to_uppercase(), quote);
    }

    pub fn get(&self, symbol: &str) -> Option<&RawQuote> {
        self.quotes.get(&symbol.to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

impl FromIterator<(String, RawQuote)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (String, RawQuote)>>(iter: I) -> Self {
        let mut snapshot = Snapshot::new();
        for (symbol, quote) in iter {
            snapshot.insert(&symbol, quote);
        }
        snapshot
    }
}

/// 거래소별 시세 집합
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tickers {
    /// 거래소 이름
    pub exchange: String,
    /// 등록 순서의 시세 목록
    pub tickers: Vec<Ticker>,
    /// 기준 화폐별 입출금 상태
    pub states: Vec<WState>,
    /// 견적 화폐(법정화폐/스테이블코인) 환산 배율
    pub exchg_rate: Decimal,
    /// BTC 1개의 법정화폐 가격
    pub btc_price: Decimal,
    /// 연결 상태
    pub connected: bool,
    /// 다음 주기에 레지스트리 재구성 요청
    pub reset_cache: bool,
    /// 다음 입출금 상태 조회 시각 (밀리초)
    pub next_state_check: i64,
    /// 레지스트리 세대
    pub generation: u64,
}

impl Tickers {
    pub fn new(exchange: impl Into<String>) -> Self {
        Self {
            exchange: exchange.into(),
            tickers: Vec::new(),
            states: Vec::new(),
            exchg_rate: Decimal::ONE,
            btc_price: Decimal::ZERO,
            connected: false,
            reset_cache: false,
            next_state_check: 0,
            generation: 0,
        }
    }

    /// 환산 배율 설정
    pub fn with_rates(mut self, exchg_rate: Decimal, btc_price: Decimal) -> Self {
        self.exchg_rate = exchg_rate;
        self.btc_price = btc_price;
        self
    }

    /// Starts a new registry generation from the discovered symbol list.
    ///
    /// Live tickers whose symbol is still listed keep prices and volume-window state; dead
    /// tickers and delisted symbols are dropped; new symbols get fresh tickers. Asset flags are
    /// re-applied from the known `states`.
    pub fn rebuild<'a>(&mut self, symbols: impl IntoIterator<Item = &'a QueueSymbol>) {
        let mut previous: HashMap<String, Ticker> = self
            .tickers
            .drain(..)
            .filter(|t| !t.is_dead())
            .map(|t| (t.symbol.to_uppercase(), t))
            .collect();

        for qs in symbols {
            let mut ticker = match previous.remove(&qs.key()) {
                Some(mut kept) => {
                    kept.base_name = qs.base_name.clone();
                    kept.quote_name = qs.quote_name.clone();
                    kept.comp_name = qs.comp_name.clone();
                    kept
                },
                None => Ticker::from_symbol(qs),
            };
            if let Some(state) = self.states.iter().find(|s| s.base_name == ticker.comp_name) {
                ticker.apply_state(state);
            }
            self.tickers.push(ticker);
        }

        self.generation += 1;
        self.reset_cache = false;
    }

    /// 살아있는 시세 목록
    pub fn live(&self) -> impl Iterator<Item = &Ticker> {
        self.tickers.iter().filter(|t| !t.is_dead())
    }

    /// 심볼로 시세 조회 (대소문자 무시, 무효화된 시세 제외)
    pub fn find(&self, symbol: &str) -> Option<&Ticker> {
        self.live().find(|t| t.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn registry() -> Vec<QueueSymbol> {
        vec![
            QueueSymbol::new("BTC-USDT", "BTC", "USDT"),
            QueueSymbol::new("ETH-USDT", "ETH", "USDT"),
        ]
    }

    #[test]
    fn test_sentinel() {
        let mut ticker = Ticker::from_symbol(&QueueSymbol::new("BTC-USDT", "BTC", "USDT"));
        assert!(!ticker.is_dead());
        ticker.mark_dead();
        assert!(ticker.is_dead());
        assert_eq!(ticker.symbol, DEAD_SYMBOL);
    }

    #[test]
    fn test_snapshot_case_insensitive() {
        let mut snapshot = Snapshot::new();
        snapshot.insert("btc-usdt", RawQuote::new(dec!(1), dec!(1), dec!(1), dec!(1)));
        assert!(snapshot.get("BTC-USDT").is_some());
        assert!(snapshot.get("Btc-Usdt").is_some());
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn test_rebuild_keeps_live_state_and_revives_dead() {
        let symbols = registry();
        let mut tickers = Tickers::new("bybit");
        tickers.rebuild(&symbols);
        assert_eq!(tickers.generation, 1);
        assert_eq!(tickers.len(), 2);

        tickers.tickers[0].previous_24h = dec!(500);
        tickers.tickers[0].timestamp = 42;
        tickers.tickers[1].mark_dead();
        tickers.reset_cache = true;

        tickers.rebuild(&symbols);
        assert_eq!(tickers.generation, 2);
        assert!(!tickers.reset_cache);
        assert_eq!(tickers.tickers[0].previous_24h, dec!(500));
        assert_eq!(tickers.tickers[0].timestamp, 42);
        assert_eq!(tickers.tickers[1].symbol, "ETH-USDT");
        assert_eq!(tickers.tickers[1].previous_24h, Decimal::ZERO);
    }

    #[test]
    fn test_find_skips_dead() {
        let mut tickers = Tickers::new("bybit");
        tickers.rebuild(&registry());
        tickers.tickers[0].mark_dead();

        assert!(tickers.find("btc-usdt").is_none());
        assert!(tickers.find("eth-usdt").is_some());
        assert_eq!(tickers.live().count(), 1);
    }
}
