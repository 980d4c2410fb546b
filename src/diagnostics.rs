//! Diagnostics and logging bootstrap
//!
//! Adapters never fail a market-data call on transport or parse problems; they report them
//! here instead. Codes are `profile.code_base + DiagnosticCode` and exist for log correlation
//! only.

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Mutex;
use tracing::{error, warn};
use tracing_subscriber::{fmt, EnvFilter};

use crate::errors::GatewayError;

/// 진단 코드 (거래소별 code_base에 더해짐)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum DiagnosticCode {
    SymbolDiscovery = 1,
    TickerFetch = 2,
    SymbolInvalidated = 3,
    UnconvertedQuote = 4,
    StateFetch = 5,
    OrderBook = 6,
    PrivateRequest = 7,
    UnmappedStatus = 8,
    Parse = 9,
}

impl DiagnosticCode {
    pub fn offset(self) -> u32 {
        self as u32
    }

    /// 거래소 코드 베이스 적용
    pub fn with_base(self, code_base: u32) -> u32 {
        code_base + self.offset()
    }
}

/// 진단 이벤트
#[derive(Debug)]
pub enum DiagnosticEvent {
    Message(String),
    Error(GatewayError),
}

impl DiagnosticEvent {
    pub fn message(text: impl Into<String>) -> Self {
        DiagnosticEvent::Message(text.into())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, DiagnosticEvent::Error(_))
    }

    pub fn text(&self) -> String {
        match self {
            DiagnosticEvent::Message(m) => m.clone(),
            DiagnosticEvent::Error(e) => e.to_string(),
        }
    }
}

impl From<GatewayError> for DiagnosticEvent {
    fn from(err: GatewayError) -> Self {
        DiagnosticEvent::Error(err)
    }
}

/// Receiver of `(exchange, message-or-error, code)` reports.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, exchange: &str, event: DiagnosticEvent, code: u32);
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, exchange: &str, event: DiagnosticEvent, code: u32) {
        match event {
            DiagnosticEvent::Message(message) => warn!(exchange, code, "{message}"),
            DiagnosticEvent::Error(err) => {
                error!(exchange, code, error_code = err.code(), "{err}")
            },
        }
    }
}

/// 기록된 진단
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub exchange: String,
    pub message: String,
    pub code: u32,
    pub is_error: bool,
}

/// Keeps every report in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<Recorded>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Recorded> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// 특정 코드의 진단 수
    pub fn count(&self, code: u32) -> usize {
        self.events().iter().filter(|e| e.code == code).count()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl DiagnosticSink for MemorySink {
    fn report(&self, exchange: &str, event: DiagnosticEvent, code: u32) {
        if let Ok(mut events) = self.events.lock() {
            events.push(Recorded {
                exchange: exchange.to_string(),
                message: event.text(),
                code,
                is_error: event.is_error(),
            });
        }
    }
}

/// 보고 키 상한
pub const REPORT_ONCE_CAPACITY: usize = 1024;

/// Keys already reported since the last reset.
///
/// Holds at most `capacity` keys; inserting past that starts the set over, so a long-running
/// adapter may repeat a report but never grows without bound.
#[derive(Debug)]
pub struct ReportOnce<K> {
    seen: Mutex<HashSet<K>>,
    capacity: usize,
}

impl<K: Eq + Hash> ReportOnce<K> {
    pub fn new() -> Self {
        Self::with_capacity(REPORT_ONCE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            seen: Mutex::new(HashSet::new()),
            capacity: capacity.max(1),
        }
    }

    /// `true` the first time `key` is seen since the last reset.
    pub fn first(&self, key: K) -> bool {
        let mut seen = self.seen.lock().unwrap_or_else(|e| e.into_inner());
        if seen.contains(&key) {
            return false;
        }
        if seen.len() >= self.capacity {
            seen.clear();
        }
        seen.insert(key)
    }

    pub fn reset(&self) {
        self.seen.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    pub fn len(&self) -> usize {
        self.seen.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Eq + Hash> Default for ReportOnce<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` overrides `level` when set. Fails if a subscriber is already installed.
pub fn init_logging(level: &str, json: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        fmt().json().with_env_filter(filter).try_init()
    } else {
        fmt().with_env_filter(filter).try_init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_namespacing() {
        assert_eq!(DiagnosticCode::SymbolInvalidated.with_base(3000), 3003);
        assert_eq!(DiagnosticCode::UnmappedStatus.with_base(4000), 4008);
    }

    #[test]
    fn test_memory_sink_records() {
        let sink = MemorySink::new();
        sink.report("bybit", DiagnosticEvent::message("BTC-USDT invalidated"), 3003);
        sink.report(
            "bybit",
            GatewayError::NullResponse { url: "/v5/market/tickers".into() }.into(),
            3002,
        );

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert!(!events[0].is_error);
        assert!(events[1].is_error);
        assert!(events[1].message.contains("/v5/market/tickers"));
        assert_eq!(sink.count(3003), 1);

        sink.clear();
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_tracing_sink_does_not_panic_without_subscriber() {
        TracingSink.report("kucoin", DiagnosticEvent::message("hello"), 4001);
    }

    #[test]
    fn test_report_once_is_bounded() {
        let once = ReportOnce::with_capacity(2);
        assert!(once.first("BTC-EUR"));
        assert!(!once.first("BTC-EUR"));
        assert!(once.first("ETH-EUR"));
        assert_eq!(once.len(), 2);

        // full: the set starts over instead of growing
        assert!(once.first("SOL-EUR"));
        assert_eq!(once.len(), 1);
        assert!(once.first("BTC-EUR"));

        once.reset();
        assert!(once.is_empty());
        assert!(once.first("SOL-EUR"));
    }

    #[test]
    fn test_init_logging_only_once() {
        let _ = init_logging("debug", true);
        assert!(init_logging("info", false).is_err());
    }
}
