//! Exchange Implementations
//!
//! 거래소별 프로필과 범용 REST 어댑터

mod mapper;
mod profile;
mod rest;

pub use mapper::EndpointMapper;
pub use profile::ExchangeProfile;
pub use rest::RestExchange;
