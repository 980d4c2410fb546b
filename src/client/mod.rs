//! HTTP Client and related utilities

mod config;
mod http;
mod rate_limiter;

pub use config::{ExchangeConfig, MarketConfig};
pub use http::{HttpClient, HttpMethod, Transport};
pub use rate_limiter::RateLimiter;
