//! Exchange profiles - 거래소별 설정 레코드
//!
//! Everything that differs between two REST adapters, apart from endpoint shapes, lives here:
//! base URL, signing scheme and header names, quote-currency rules, the status vocabulary and
//! the diagnostic code namespace.

use crate::errors::{GatewayError, GatewayResult};
use crate::market::StatusVocabulary;
use crate::signing::{HeaderNames, SigningScheme};
use crate::types::ExchangeId;

/// 거래소 프로필
#[derive(Debug, Clone)]
pub struct ExchangeProfile {
    pub id: ExchangeId,
    /// 표시 이름
    pub name: String,
    pub base_url: String,
    /// 테스트넷 URL
    pub sandbox_url: Option<String>,
    pub scheme: SigningScheme,
    pub headers: HeaderNames,
    /// 지원 견적 화폐
    pub quote_currencies: Vec<String>,
    /// `exchg_rate`로 환산하는 스테이블코인
    pub stablecoins: Vec<String>,
    pub vocabulary: StatusVocabulary,
    /// 진단 코드 베이스
    pub code_base: u32,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl ExchangeProfile {
    /// 프리셋 프로필
    pub fn preset(id: ExchangeId) -> Self {
        match id {
            ExchangeId::Bybit => Self::bybit(),
            ExchangeId::Binance => Self::binance(),
            ExchangeId::Kucoin => Self::kucoin(),
            ExchangeId::Coinone => Self::coinone(),
            ExchangeId::Mexc => Self::mexc(),
        }
    }

    /// Bybit (concatenated timestamp, 5s recv window)
    pub fn bybit() -> Self {
        Self {
            id: ExchangeId::Bybit,
            name: "Bybit".into(),
            base_url: "https://api.bybit.com".into(),
            sandbox_url: Some("https://api-testnet.bybit.com".into()),
            scheme: SigningScheme::ConcatenatedTimestamp { recv_window_ms: 5000 },
            headers: HeaderNames {
                api_key: "X-BAPI-API-KEY".into(),
                signature: "X-BAPI-SIGN".into(),
                timestamp: "X-BAPI-TIMESTAMP".into(),
                recv_window: "X-BAPI-RECV-WINDOW".into(),
                ..Default::default()
            },
            quote_currencies: strings(&["USDT", "USDC", "BTC"]),
            stablecoins: strings(&["USDT", "USDC"]),
            vocabulary: StatusVocabulary::preset(ExchangeId::Bybit),
            code_base: 3000,
        }
    }

    /// Binance (sorted form)
    pub fn binance() -> Self {
        Self {
            id: ExchangeId::Binance,
            name: "Binance".into(),
            base_url: "https://api.binance.com".into(),
            sandbox_url: Some("https://testnet.binance.vision".into()),
            scheme: SigningScheme::SortedForm,
            headers: HeaderNames {
                api_key: "X-MBX-APIKEY".into(),
                ..Default::default()
            },
            quote_currencies: strings(&["USDT", "FDUSD", "BTC"]),
            stablecoins: strings(&["USDT", "FDUSD", "USDC"]),
            vocabulary: StatusVocabulary::preset(ExchangeId::Binance),
            code_base: 2000,
        }
    }

    /// KuCoin (passphrase double hash, key version 2)
    pub fn kucoin() -> Self {
        Self {
            id: ExchangeId::Kucoin,
            name: "KuCoin".into(),
            base_url: "https://api.kucoin.com".into(),
            sandbox_url: Some("https://openapi-sandbox.kucoin.com".into()),
            scheme: SigningScheme::PassphraseDoubleHash { key_version: 2 },
            headers: HeaderNames {
                api_key: "KC-API-KEY".into(),
                signature: "KC-API-SIGN".into(),
                timestamp: "KC-API-TIMESTAMP".into(),
                passphrase: "KC-API-PASSPHRASE".into(),
                key_version: "KC-API-KEY-VERSION".into(),
                ..Default::default()
            },
            quote_currencies: strings(&["USDT", "BTC"]),
            stablecoins: strings(&["USDT", "USDC"]),
            vocabulary: StatusVocabulary::preset(ExchangeId::Kucoin),
            code_base: 4000,
        }
    }

    /// Coinone (nonce payload, KRW market)
    pub fn coinone() -> Self {
        Self {
            id: ExchangeId::Coinone,
            name: "Coinone".into(),
            base_url: "https://api.coinone.co.kr".into(),
            sandbox_url: None,
            scheme: SigningScheme::NoncePayload { uppercase_secret: true },
            headers: HeaderNames {
                signature: "X-COINONE-SIGNATURE".into(),
                payload: "X-COINONE-PAYLOAD".into(),
                ..Default::default()
            },
            quote_currencies: strings(&["KRW"]),
            stablecoins: Vec::new(),
            vocabulary: StatusVocabulary::preset(ExchangeId::Coinone),
            code_base: 1000,
        }
    }

    /// MEXC (plain query)
    pub fn mexc() -> Self {
        Self {
            id: ExchangeId::Mexc,
            name: "MEXC".into(),
            base_url: "https://api.mexc.com".into(),
            sandbox_url: None,
            scheme: SigningScheme::PlainQuery,
            headers: HeaderNames {
                api_key: "X-MEXC-APIKEY".into(),
                ..Default::default()
            },
            quote_currencies: strings(&["USDT", "USDC", "BTC"]),
            stablecoins: strings(&["USDT", "USDC"]),
            vocabulary: StatusVocabulary::preset(ExchangeId::Mexc),
            code_base: 5000,
        }
    }

    /// 사용할 URL (샌드박스 여부 반영)
    pub fn url(&self, sandbox: bool) -> GatewayResult<&str> {
        if !sandbox {
            return Ok(&self.base_url);
        }
        self.sandbox_url
            .as_deref()
            .ok_or_else(|| GatewayError::NotSupported {
                feature: format!("{} sandbox", self.name),
            })
    }

    /// 다른 기본 URL로 교체
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_quote_currencies(mut self, quotes: &[&str]) -> Self {
        self.quote_currencies = strings(quotes);
        self
    }
}
