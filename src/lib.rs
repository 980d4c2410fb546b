//! Coinbridge: unified cryptocurrency exchange gateway
//!
//! 여러 거래소를 하나의 인터페이스로 묶는 라이브러리
//!
//! - `signing`: five request-signing schemes behind one `Signer`
//! - `market`: symbol registry, ticker reconciliation, asset state and status normalization
//! - `exchanges`: per-exchange profiles and the generic REST adapter
//! - `driver`: per-exchange polling workers

pub mod client;
pub mod diagnostics;
pub mod driver;
pub mod errors;
pub mod exchanges;
pub mod market;
pub mod signing;
pub mod types;
pub mod utils;

// Re-exports
pub use client::{ExchangeConfig, HttpClient, MarketConfig, RateLimiter, Transport};
pub use diagnostics::{init_logging, DiagnosticSink, MemorySink, TracingSink};
pub use driver::{run_cycle, CycleOutcome, DriverHandle, PollDriver};
pub use errors::{GatewayError, GatewayResult};
pub use exchanges::{EndpointMapper, ExchangeProfile, RestExchange};
pub use signing::{Signer, SigningScheme};
pub use types::{ExchangeAdapter, ExchangeId};
