//! Exchange and market-data configuration

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::{GatewayError, GatewayResult};

/// 거래소 설정
#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    api_key: Option<String>,
    api_secret: Option<String>,
    passphrase: Option<String>,
    sandbox: bool,
    timeout_ms: u64,
    rate_limit_ms: u64,
    hostname: Option<String>,
    exchange_rate: Decimal,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ExchangeConfig {
    /// 새로운 빈 설정 생성
    pub fn new() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            passphrase: None,
            sandbox: false,
            timeout_ms: 30000,
            rate_limit_ms: 100,
            hostname: None,
            exchange_rate: Decimal::ONE,
        }
    }

    /// API 키 설정
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// API 시크릿 설정
    pub fn with_api_secret(mut self, secret: impl Into<String>) -> Self {
        self.api_secret = Some(secret.into());
        self
    }

    /// 패스프레이즈 설정 (KuCoin 등)
    pub fn with_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = Some(passphrase.into());
        self
    }

    /// 샌드박스 모드 설정
    pub fn with_sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    /// 타임아웃 설정 (밀리초)
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// 요청 간 최소 간격 설정 (밀리초)
    pub fn with_rate_limit_ms(mut self, rate_limit_ms: u64) -> Self {
        self.rate_limit_ms = rate_limit_ms;
        self
    }

    /// 호스트네임 설정 (기본 URL 대체)
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// 견적 화폐 -> 법정화폐 환율 설정
    pub fn with_exchange_rate(mut self, rate: Decimal) -> Self {
        self.exchange_rate = rate;
        self
    }

    /// 인증 정보로 설정
    pub fn with_credentials(
        mut self,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        self.api_key = Some(api_key.into());
        self.api_secret = Some(api_secret.into());
        self
    }

    // === Getters ===

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn secret(&self) -> Option<&str> {
        self.api_secret.as_deref()
    }

    pub fn passphrase(&self) -> Option<&str> {
        self.passphrase.as_deref()
    }

    pub fn is_sandbox(&self) -> bool {
        self.sandbox
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    pub fn rate_limit_ms(&self) -> u64 {
        self.rate_limit_ms
    }

    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }

    pub fn exchange_rate(&self) -> Decimal {
        self.exchange_rate
    }

    /// 인증 정보 유효성 확인
    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some() && self.api_secret.is_some()
    }
}

/// Market-data reconciliation settings.
///
/// Usually loaded from a config file section; every field has a default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MarketConfig {
    /// Divisor applied to the converted 24h volume. Defaults to 1,000,000.
    #[serde(default = "default_volume_24h_base")]
    pub volume_24h_base: Decimal,

    /// Divisor applied to the one-minute volume delta. Defaults to 10,000.
    #[serde(default = "default_volume_1m_base")]
    pub volume_1m_base: Decimal,

    /// Minimum age of the volume window before it advances. Defaults to 60s.
    #[serde(default = "default_volume_window_ms")]
    pub volume_window_ms: i64,

    /// Minimum spacing between deposit/withdraw state refreshes. Defaults to 5 minutes.
    #[serde(default = "default_state_check_interval_ms")]
    pub state_check_interval_ms: i64,

    /// Initial BTC price in fiat, used until a snapshot carries the BTC pair.
    #[serde(default)]
    pub btc_price: Decimal,

    /// Fiat currency all prices are converted into. Defaults to KRW.
    #[serde(default = "default_fiat")]
    pub fiat: String,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            volume_24h_base: default_volume_24h_base(),
            volume_1m_base: default_volume_1m_base(),
            volume_window_ms: default_volume_window_ms(),
            state_check_interval_ms: default_state_check_interval_ms(),
            btc_price: Decimal::ZERO,
            fiat: default_fiat(),
        }
    }
}

impl MarketConfig {
    pub fn with_btc_price(mut self, btc_price: Decimal) -> Self {
        self.btc_price = btc_price;
        self
    }

    pub fn with_fiat(mut self, fiat: impl Into<String>) -> Self {
        self.fiat = fiat.into().to_uppercase();
        self
    }

    /// 설정 값 검증
    ///
    /// Both volume divisors must be positive; intervals and the seed BTC price must not be
    /// negative.
    pub fn validate(&self) -> GatewayResult<()> {
        let invalid = |field: &str, value: &dyn std::fmt::Display, rule: &str| {
            Err(GatewayError::configuration(format!("market.{field} must be {rule}, got {value}")))
        };

        if self.volume_24h_base <= Decimal::ZERO {
            return invalid("volume_24h_base", &self.volume_24h_base, "positive");
        }
        if self.volume_1m_base <= Decimal::ZERO {
            return invalid("volume_1m_base", &self.volume_1m_base, "positive");
        }
        if self.volume_window_ms < 0 {
            return invalid("volume_window_ms", &self.volume_window_ms, "non-negative");
        }
        if self.state_check_interval_ms < 0 {
            return invalid("state_check_interval_ms", &self.state_check_interval_ms, "non-negative");
        }
        if self.btc_price < Decimal::ZERO {
            return invalid("btc_price", &self.btc_price, "non-negative");
        }
        if self.fiat.trim().is_empty() {
            return invalid("fiat", &"empty", "set");
        }
        Ok(())
    }
}

fn default_volume_24h_base() -> Decimal {
    Decimal::new(1_000_000, 0)
}

fn default_volume_1m_base() -> Decimal {
    Decimal::new(10_000, 0)
}

const fn default_volume_window_ms() -> i64 {
    60_000
}

const fn default_state_check_interval_ms() -> i64 {
    300_000
}

fn default_fiat() -> String {
    "KRW".into()
}
