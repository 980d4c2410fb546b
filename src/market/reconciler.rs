//! Ticker reconciler
//!
//! Merges one cycle's raw snapshot into the exchange's [`Tickers`]. Prices and volumes are
//! converted into the configured fiat; a ticker whose symbol is missing from the snapshot is
//! marked dead with the `"X"` sentinel and skipped until the registry is rebuilt.
//!
//! The one-minute volume is a gated delta of successive 24h volumes: it only advances once
//! the previous window is older than `volume_window_ms`, and holds its last value otherwise.

use rust_decimal::Decimal;

use crate::client::MarketConfig;
use crate::types::{RawQuote, Snapshot, Ticker, Tickers};

/// How a quote currency is turned into fiat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// 법정화폐 또는 스테이블코인: `exchg_rate`
    ExchangeRate,
    /// BTC: 추적 중인 BTC 가격
    BtcPrice,
    /// 알 수 없는 견적 화폐: 변환 없음
    Identity,
}

/// 한 주기 결과
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// 갱신된 시세 수
    pub updated: usize,
    /// 이번 주기에 무효화된 심볼
    pub invalidated: Vec<String>,
    /// 견적 화폐를 인식하지 못해 변환 없이 반영된 심볼
    pub unconverted: Vec<String>,
    /// BTC 가격이 아직 없어 건너뛴 심볼
    pub awaiting_btc: Vec<String>,
    /// 환산 결과가 Decimal 범위를 벗어나 이번 주기에 건너뛴 심볼
    pub out_of_range: Vec<String>,
    /// BTC 가격 갱신 여부
    pub btc_price_refreshed: bool,
}

/// 시세 병합기
#[derive(Debug, Clone)]
pub struct TickerReconciler {
    config: MarketConfig,
    stablecoins: Vec<String>,
}

impl TickerReconciler {
    pub fn new<I, S>(config: MarketConfig, stablecoins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            config,
            stablecoins: stablecoins
                .into_iter()
                .map(|s| s.as_ref().to_uppercase())
                .collect(),
        }
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    /// 견적 화폐별 변환 방식
    pub fn conversion(&self, quote: &str) -> Conversion {
        if quote.eq_ignore_ascii_case(&self.config.fiat)
            || self.stablecoins.iter().any(|s| s.eq_ignore_ascii_case(quote))
        {
            Conversion::ExchangeRate
        } else if quote.eq_ignore_ascii_case("BTC") {
            Conversion::BtcPrice
        } else {
            Conversion::Identity
        }
    }

    /// Refreshes `btc_price` from the first live BTC pair quoted in fiat or a stablecoin.
    pub fn refresh_btc_price(&self, tickers: &mut Tickers, snapshot: &Snapshot) -> bool {
        let price = tickers
            .live()
            .filter(|t| t.base_name.eq_ignore_ascii_case("BTC"))
            .filter(|t| self.conversion(&t.quote_name) == Conversion::ExchangeRate)
            .find_map(|t| snapshot.get(&t.symbol))
            .and_then(|quote| quote.last.checked_mul(tickers.exchg_rate))
            .filter(|price| *price > Decimal::ZERO);

        match price {
            Some(price) => {
                tickers.btc_price = price;
                true
            },
            None => false,
        }
    }

    /// One reconciliation pass at wall-clock time `now` (epoch ms).
    pub fn reconcile(&self, tickers: &mut Tickers, snapshot: &Snapshot, now: i64) -> ReconcileReport {
        let mut report = ReconcileReport {
            btc_price_refreshed: self.refresh_btc_price(tickers, snapshot),
            ..Default::default()
        };
        let exchg_rate = tickers.exchg_rate;
        let btc_price = tickers.btc_price;

        for ticker in tickers.tickers.iter_mut() {
            if ticker.is_dead() {
                continue;
            }

            let Some(quote) = snapshot.get(&ticker.symbol) else {
                report.invalidated.push(ticker.symbol.clone());
                ticker.mark_dead();
                continue;
            };

            let factor = match self.conversion(&ticker.quote_name) {
                Conversion::ExchangeRate => exchg_rate,
                Conversion::BtcPrice if btc_price > Decimal::ZERO => btc_price,
                Conversion::BtcPrice => {
                    report.awaiting_btc.push(ticker.symbol.clone());
                    continue;
                },
                Conversion::Identity => {
                    report.unconverted.push(ticker.symbol.clone());
                    Decimal::ONE
                },
            };

            if self.apply_quote(ticker, quote, factor, now) {
                report.updated += 1;
            } else {
                report.out_of_range.push(ticker.symbol.clone());
            }
        }

        report
    }

    /// Converts and writes one quote. Leaves the ticker untouched and returns `false` when any
    /// converted value does not fit in a `Decimal`.
    fn apply_quote(&self, ticker: &mut Ticker, quote: &RawQuote, factor: Decimal, now: i64) -> bool {
        let converted = (
            quote.last.checked_mul(factor),
            quote.ask.checked_mul(factor),
            quote.bid.checked_mul(factor),
            quote.volume_24h.checked_mul(factor),
        );
        let (Some(last), Some(ask), Some(bid), Some(volume)) = converted else {
            return false;
        };
        if !self.advance_volume(ticker, volume, now) {
            return false;
        }
        ticker.last_price = last;
        ticker.ask_price = ask;
        ticker.bid_price = bid;
        true
    }

    /// Volume window step for an already converted 24h volume.
    ///
    /// Returns `false` without touching the ticker when the scaled volumes cannot be computed.
    pub fn advance_volume(&self, ticker: &mut Ticker, converted: Decimal, now: i64) -> bool {
        let Some(volume_24h) = converted.checked_div(self.config.volume_24h_base) else {
            return false;
        };

        let next_check = ticker.timestamp.saturating_add(self.config.volume_window_ms);
        if now > next_check {
            let delta = if ticker.previous_24h > Decimal::ZERO {
                converted.checked_sub(ticker.previous_24h)
            } else {
                Some(Decimal::ZERO)
            };
            let Some(volume_1m) = delta.and_then(|d| d.checked_div(self.config.volume_1m_base)) else {
                return false;
            };
            ticker.volume_1m = volume_1m.floor();
            ticker.timestamp = now;
            ticker.previous_24h = converted;
        }
        ticker.volume_24h = volume_24h.floor();
        true
    }
}
