//! Request signing
//!
//! Five authentication schemes cover every supported exchange. Each scheme is a pure function
//! of the credentials, the request descriptor and a [`SignatureStamp`]; the only state a
//! [`Signer`] keeps is the keyed hash built lazily from its own secret.

mod schemes;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

use crate::client::{ExchangeConfig, HttpMethod};
use crate::errors::{GatewayError, GatewayResult};
use crate::utils::crypto::{hmac_sha256_keyed, hmac_sha512_keyed, HmacSha256, HmacSha512};
use crate::utils::time::Clock;

pub use schemes::encode_params;

/// 서명 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SigningScheme {
    /// HMAC-SHA256 over `timestamp + apiKey + recvWindow + queryOrBody`, hex, sent as headers.
    ConcatenatedTimestamp { recv_window_ms: u64 },
    /// Parameters sorted by key, URL-encoded, HMAC-SHA256 hex appended as `&signature=`.
    SortedForm,
    /// Base64 HMAC-SHA256 over `timestamp + METHOD + path + body`, plus a signed passphrase.
    PassphraseDoubleHash { key_version: u8 },
    /// Base64 JSON payload with a v4 nonce, signed with HMAC-SHA512 hex.
    NoncePayload { uppercase_secret: bool },
    /// HMAC-SHA256 over the caller's parameter string, appended as `&signature=`.
    PlainQuery,
}

impl SigningScheme {
    pub fn requires_passphrase(&self) -> bool {
        matches!(self, SigningScheme::PassphraseDoubleHash { .. })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SigningScheme::ConcatenatedTimestamp { .. } => "concatenated_timestamp",
            SigningScheme::SortedForm => "sorted_form",
            SigningScheme::PassphraseDoubleHash { .. } => "passphrase_double_hash",
            SigningScheme::NoncePayload { .. } => "nonce_payload",
            SigningScheme::PlainQuery => "plain_query",
        }
    }
}

impl fmt::Display for SigningScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 인증 헤더 이름
///
/// Only the names a scheme actually emits are read; the rest may stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeaderNames {
    pub api_key: String,
    pub signature: String,
    pub timestamp: String,
    pub recv_window: String,
    pub passphrase: String,
    pub key_version: String,
    pub payload: String,
}

/// API 인증 정보
#[derive(Clone, Default)]
pub struct Credentials {
    pub api_key: String,
    pub secret: String,
    pub passphrase: Option<String>,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret: secret.into(),
            passphrase: None,
        }
    }

    pub fn with_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = Some(passphrase.into());
        self
    }

    /// 설정에서 인증 정보 추출
    pub fn from_config(config: &ExchangeConfig) -> GatewayResult<Self> {
        let api_key = config
            .api_key()
            .ok_or_else(|| GatewayError::configuration("API key required"))?;
        let secret = config
            .secret()
            .ok_or_else(|| GatewayError::configuration("API secret required"))?;
        Ok(Self {
            api_key: api_key.to_string(),
            secret: secret.to_string(),
            passphrase: config.passphrase().map(String::from),
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("secret", &"***")
            .field("passphrase", &self.passphrase.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Time and replay inputs of one signature.
///
/// Schemes use whichever half they need: most read `timestamp`, the nonce payload scheme reads
/// `nonce`. Fixing both makes every scheme deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureStamp {
    pub timestamp: i64,
    pub nonce: Uuid,
}

impl SignatureStamp {
    pub fn new(timestamp: i64, nonce: Uuid) -> Self {
        Self { timestamp, nonce }
    }

    /// 현재 시각과 새 nonce
    pub fn now(clock: &dyn Clock) -> Self {
        Self {
            timestamp: clock.now_ms(),
            nonce: Uuid::new_v4(),
        }
    }
}

/// 서명 전 요청
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub path: String,
    /// 쿼리 파라미터 (호출자 순서 유지)
    pub params: Vec<(String, String)>,
    /// JSON 본문 (POST/PUT)
    pub body: Option<serde_json::Value>,
}

impl RequestSpec {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    pub fn params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.to_string())));
        self
    }

    pub fn body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// 서명된 요청
#[derive(Debug, Clone, PartialEq)]
pub struct SignedRequest {
    pub method: HttpMethod,
    pub path: String,
    /// 인코딩된 쿼리 문자열 (`?` 제외)
    pub query: String,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl SignedRequest {
    /// Unsigned passthrough for public endpoints.
    pub fn public(request: &RequestSpec) -> GatewayResult<Self> {
        Ok(Self {
            method: request.method,
            path: request.path.clone(),
            query: encode_params(&request.params),
            headers: HashMap::new(),
            body: request.body.as_ref().map(serde_json::to_string).transpose()?,
        })
    }

    /// 경로 + 쿼리
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// Per-adapter signer.
///
/// Credentials are validated at construction. The keyed hash for the secret is built on first
/// use and cloned for every signature; a signer is never shared between adapters.
pub struct Signer {
    scheme: SigningScheme,
    headers: HeaderNames,
    credentials: Credentials,
    sha256: OnceCell<HmacSha256>,
    sha512: OnceCell<HmacSha512>,
}

impl Signer {
    pub fn new(
        scheme: SigningScheme,
        headers: HeaderNames,
        credentials: Credentials,
    ) -> GatewayResult<Self> {
        if credentials.api_key.is_empty() {
            return Err(GatewayError::configuration(format!("{scheme}: API key required")));
        }
        if credentials.secret.is_empty() {
            return Err(GatewayError::configuration(format!("{scheme}: API secret required")));
        }
        if scheme.requires_passphrase()
            && credentials.passphrase.as_deref().map_or(true, str::is_empty)
        {
            return Err(GatewayError::configuration(format!("{scheme}: API passphrase required")));
        }

        Ok(Self {
            scheme,
            headers,
            credentials,
            sha256: OnceCell::new(),
            sha512: OnceCell::new(),
        })
    }

    pub fn scheme(&self) -> SigningScheme {
        self.scheme
    }

    pub fn api_key(&self) -> &str {
        &self.credentials.api_key
    }

    fn sha256(&self) -> GatewayResult<&HmacSha256> {
        self.sha256
            .get_or_try_init(|| hmac_sha256_keyed(&self.credentials.secret))
    }

    fn sha512(&self, uppercase_secret: bool) -> GatewayResult<&HmacSha512> {
        self.sha512.get_or_try_init(|| {
            if uppercase_secret {
                hmac_sha512_keyed(&self.credentials.secret.to_uppercase())
            } else {
                hmac_sha512_keyed(&self.credentials.secret)
            }
        })
    }

    /// 요청 서명
    pub fn sign(&self, request: &RequestSpec, stamp: &SignatureStamp) -> GatewayResult<SignedRequest> {
        let creds = &self.credentials;
        match self.scheme {
            SigningScheme::ConcatenatedTimestamp { recv_window_ms } => schemes::concatenated_timestamp(
                self.sha256()?,
                &self.headers,
                &creds.api_key,
                recv_window_ms,
                request,
                stamp.timestamp,
            ),
            SigningScheme::SortedForm => schemes::sorted_form(
                self.sha256()?,
                &self.headers,
                &creds.api_key,
                request,
                stamp.timestamp,
            ),
            SigningScheme::PassphraseDoubleHash { key_version } => {
                let passphrase = creds
                    .passphrase
                    .as_deref()
                    .ok_or_else(|| GatewayError::configuration("API passphrase required"))?;
                schemes::passphrase_double_hash(
                    self.sha256()?,
                    &self.headers,
                    &creds.api_key,
                    passphrase,
                    key_version,
                    request,
                    stamp.timestamp,
                )
            },
            SigningScheme::NoncePayload { uppercase_secret } => schemes::nonce_payload(
                self.sha512(uppercase_secret)?,
                &self.headers,
                &creds.api_key,
                request,
                stamp.nonce,
            ),
            SigningScheme::PlainQuery => schemes::plain_query(
                self.sha256()?,
                &self.headers,
                &creds.api_key,
                request,
                stamp.timestamp,
            ),
        }
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("scheme", &self.scheme)
            .field("credentials", &self.credentials)
            .finish()
    }
}
