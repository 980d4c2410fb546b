//! Symbol registry - 거래소별 거래쌍 테이블

use std::collections::HashMap;

use crate::types::QueueSymbol;

const SEPARATORS: [char; 3] = ['-', '_', '/'];

/// 레지스트리 재구성 결과
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryReport {
    /// 등록된 거래쌍 수
    pub accepted: usize,
    /// 지원하지 않는 견적 화폐로 제외된 수
    pub filtered: usize,
    /// 중복으로 제외된 심볼
    pub duplicates: Vec<String>,
    /// 심볼에서 기준 화폐를 다시 얻은 심볼
    pub overridden: Vec<String>,
}

/// Per-exchange table of tradable pairs.
///
/// Holds at most one entry per symbol (case-insensitive). Entries are replaced as a whole on
/// [`rebuild`](Self::rebuild) and never edited in place.
#[derive(Debug, Clone, Default)]
pub struct SymbolRegistry {
    quotes: Vec<String>,
    symbols: Vec<QueueSymbol>,
    index: HashMap<String, usize>,
}

impl SymbolRegistry {
    /// Registry limited to the given quote currencies. An empty list accepts every quote.
    pub fn new<I, S>(quotes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            quotes: quotes.into_iter().map(|q| q.as_ref().to_uppercase()).collect(),
            symbols: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// 지원 견적 화폐 여부
    pub fn supports_quote(&self, quote: &str) -> bool {
        self.quotes.is_empty() || self.quotes.iter().any(|q| q.eq_ignore_ascii_case(quote))
    }

    /// Replaces the table with the discovered pairs.
    ///
    /// Pairs quoted in an unsupported currency are dropped, the first entry wins on duplicate
    /// symbols, and the base code is re-derived from the symbol when the vendor's base
    /// disagrees with it.
    pub fn rebuild(&mut self, candidates: impl IntoIterator<Item = QueueSymbol>) -> RegistryReport {
        let mut report = RegistryReport::default();
        let mut symbols = Vec::new();
        let mut index = HashMap::new();

        for mut qs in candidates {
            if !self.supports_quote(&qs.quote_name) {
                report.filtered += 1;
                continue;
            }
            let key = qs.key();
            if index.contains_key(&key) {
                report.duplicates.push(qs.symbol);
                continue;
            }
            if let Some(base) = split_base(&qs.symbol, &qs.quote_name) {
                if base != qs.base_name {
                    if qs.comp_name == qs.base_name {
                        qs.comp_name = base.clone();
                    }
                    qs.base_name = base;
                    report.overridden.push(qs.symbol.clone());
                }
            }
            index.insert(key, symbols.len());
            symbols.push(qs);
        }

        report.accepted = symbols.len();
        self.symbols = symbols;
        self.index = index;
        report
    }

    /// 심볼 조회 (대소문자 무시)
    pub fn get(&self, symbol: &str) -> Option<&QueueSymbol> {
        self.index
            .get(&symbol.to_uppercase())
            .and_then(|&i| self.symbols.get(i))
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.index.contains_key(&symbol.to_uppercase())
    }

    /// 등록 순서의 거래쌍 목록
    pub fn symbols(&self) -> &[QueueSymbol] {
        &self.symbols
    }

    pub fn quotes(&self) -> &[String] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Base code parsed from an exchange symbol: `BTC-USDT`, `BTCUSDT` and `KRW-BTC` all give `BTC`.
///
/// A separated symbol is split at the separator and the side that is not the quote wins, so
/// `BTC-SBTC` quoted in BTC gives `SBTC`. Compact symbols fall back to stripping the quote
/// from either end.
pub fn split_base(symbol: &str, quote: &str) -> Option<String> {
    let quote = quote.to_uppercase();
    if quote.is_empty() {
        return None;
    }
    let symbol = symbol.to_uppercase();

    if let Some((left, right)) = symbol.split_once(SEPARATORS) {
        let base = if right == quote {
            left
        } else if left == quote {
            right
        } else {
            return None;
        };
        return (!base.is_empty() && !base.contains(SEPARATORS)).then(|| base.to_string());
    }

    let base = if let Some(base) = symbol.strip_suffix(&quote) {
        base
    } else if let Some(base) = symbol.strip_prefix(&quote) {
        base
    } else {
        return None;
    };

    (!base.is_empty()).then(|| base.to_string())
}
