//! Gateway Error Hierarchy
//!
//! Trimmed exchange-library error taxonomy shared by signing, transport and adapters.

use thiserror::Error;

/// Gateway error hierarchy
///
/// - Configuration (missing credentials, invalid profile; always surfaced to the caller)
/// - ExchangeError (exchange-specific errors)
///   - AuthenticationError
///   - BadSymbol
///   - InvalidOrder
///     - OrderNotFound
///   - NotSupported
/// - NetworkError (transport failures)
///   - RateLimitExceeded
///   - ExchangeNotAvailable
///   - RequestTimeout
/// - BadResponse
///   - NullResponse
/// - ParseError / JsonError
/// - InvalidSignature
#[derive(Error, Debug)]
pub enum GatewayError {
    // === Configuration ===
    /// Adapter or signer misconfigured (e.g., secret or passphrase missing)
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    // === ExchangeError family ===
    /// Generic exchange error
    #[error("Exchange error: {message}")]
    ExchangeError { message: String },

    /// Authentication rejected by the exchange
    #[error("Authentication error: {message}")]
    AuthenticationError { message: String },

    /// Invalid trading symbol
    #[error("Bad symbol: {symbol}")]
    BadSymbol { symbol: String },

    /// Generic invalid order error
    #[error("Invalid order: {message}")]
    InvalidOrder { message: String },

    /// Order not found on exchange
    #[error("Order not found: {order_id}")]
    OrderNotFound { order_id: String },

    /// Feature not supported by this exchange
    #[error("Not supported: {feature}")]
    NotSupported { feature: String },

    // === NetworkError family ===
    /// Generic network error
    #[error("Network error: {url} - {message}")]
    NetworkError { url: String, message: String },

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {message}")]
    RateLimitExceeded {
        message: String,
        /// Suggested retry after in milliseconds (if provided by exchange)
        retry_after_ms: Option<u64>,
    },

    /// Exchange is temporarily unavailable
    #[error("Exchange not available: {message}")]
    ExchangeNotAvailable { message: String },

    /// Request timed out
    #[error("Request timeout: {url}")]
    RequestTimeout { url: String },

    // === Response errors ===
    /// Invalid response from exchange
    #[error("Bad response: {message}")]
    BadResponse { message: String },

    /// Empty/null response from exchange
    #[error("Null response from: {url}")]
    NullResponse { url: String },

    // === Parsing errors ===
    /// Failed to parse response data
    #[error("Parse error: {data_type} - {message}")]
    ParseError { data_type: String, message: String },

    /// JSON parsing error
    #[error("JSON error: {message}")]
    JsonError { message: String },

    // === Cryptographic errors ===
    /// Signature could not be produced
    #[error("Invalid signature: {message}")]
    InvalidSignature { message: String },
}

impl GatewayError {
    /// Returns the error code as a string constant
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::Configuration { .. } => "CONFIGURATION_ERROR",
            GatewayError::ExchangeError { .. } => "EXCHANGE_ERROR",
            GatewayError::AuthenticationError { .. } => "AUTHENTICATION_ERROR",
            GatewayError::BadSymbol { .. } => "BAD_SYMBOL",
            GatewayError::InvalidOrder { .. } => "INVALID_ORDER",
            GatewayError::OrderNotFound { .. } => "ORDER_NOT_FOUND",
            GatewayError::NotSupported { .. } => "NOT_SUPPORTED",
            GatewayError::NetworkError { .. } => "NETWORK_ERROR",
            GatewayError::RateLimitExceeded { .. } => "RATE_LIMIT_EXCEEDED",
            GatewayError::ExchangeNotAvailable { .. } => "EXCHANGE_NOT_AVAILABLE",
            GatewayError::RequestTimeout { .. } => "REQUEST_TIMEOUT",
            GatewayError::BadResponse { .. } => "BAD_RESPONSE",
            GatewayError::NullResponse { .. } => "NULL_RESPONSE",
            GatewayError::ParseError { .. } => "PARSE_ERROR",
            GatewayError::JsonError { .. } => "JSON_ERROR",
            GatewayError::InvalidSignature { .. } => "INVALID_SIGNATURE",
        }
    }

    /// Shorthand for a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        GatewayError::Configuration {
            message: message.into(),
        }
    }

    /// Returns true if this error is temporary and the operation can be retried
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GatewayError::NetworkError { .. }
                | GatewayError::RequestTimeout { .. }
                | GatewayError::RateLimitExceeded { .. }
                | GatewayError::ExchangeNotAvailable { .. }
        )
    }

    /// Returns true if this is a network-related error
    pub fn is_network_error(&self) -> bool {
        matches!(
            self,
            GatewayError::NetworkError { .. }
                | GatewayError::RateLimitExceeded { .. }
                | GatewayError::ExchangeNotAvailable { .. }
                | GatewayError::RequestTimeout { .. }
        )
    }

    /// Returns true if the error comes from local configuration rather than the exchange.
    ///
    /// These must reach the caller; the adapter never swaps them for a default value.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, GatewayError::Configuration { .. })
    }

    /// Returns the suggested retry delay in milliseconds for retryable errors
    pub fn suggested_retry_after(&self) -> Option<u64> {
        match self {
            GatewayError::RateLimitExceeded { retry_after_ms, .. } => retry_after_ms.or(Some(1000)),
            GatewayError::RequestTimeout { .. } => Some(5000),
            GatewayError::ExchangeNotAvailable { .. } => Some(30000),
            GatewayError::NetworkError { .. } => Some(1000),
            _ => None,
        }
    }
}

// === From implementations for common error types ===

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::JsonError {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map(|u| u.to_string()).unwrap_or_default();
        if err.is_timeout() {
            GatewayError::RequestTimeout { url }
        } else if err.is_decode() {
            GatewayError::ParseError {
                data_type: "json".into(),
                message: err.to_string(),
            }
        } else {
            GatewayError::NetworkError {
                url,
                message: err.to_string(),
            }
        }
    }
}

/// Result type alias for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
