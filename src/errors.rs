//! CCXT Error Hierarchy
//!
//! The subset of CCXT's error classes that the Bishino adapter and its
//! runtime can raise.

use thiserror::Error;

/// CCXT error hierarchy
///
/// Error classes follow the same hierarchy as CCXT TypeScript:
/// - BaseError
///   - ExchangeError (exchange-specific errors)
///     - AuthenticationError
///       - PermissionDenied
///     - ArgumentsRequired
///     - BadRequest
///       - BadSymbol
///     - InsufficientFunds
///     - InvalidAddress
///     - InvalidOrder
///       - OrderNotFound
///       - MissingOrderParameter
///     - NotSupported
///   - OperationFailed (operation failures)
///     - NetworkError
///       - DDoSProtection
///       - RateLimitExceeded
///       - ExchangeNotAvailable
///       - RequestTimeout
///     - BadResponse
#[derive(Error, Debug)]
pub enum CcxtError {
    // === ExchangeError family ===
    /// Generic exchange error
    #[error("Exchange error: {message}")]
    ExchangeError { message: String },

    /// Authentication failed (invalid API key, signature, etc.)
    #[error("Authentication error: {message}")]
    AuthenticationError { message: String },

    /// API key lacks permission for the operation
    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    /// Required arguments missing
    #[error("Arguments required: {message}")]
    ArgumentsRequired { message: String },

    /// Invalid request parameters
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// Invalid trading symbol
    #[error("Bad symbol: {symbol}")]
    BadSymbol { symbol: String },

    /// Not enough balance
    #[error("Insufficient funds: {message}")]
    InsufficientFunds { message: String },

    /// Invalid deposit/withdrawal address
    #[error("Invalid address: {address}")]
    InvalidAddress { address: String },

    /// Generic invalid order error
    #[error("Invalid order: {message}")]
    InvalidOrder { message: String },

    /// Order not found on exchange
    #[error("Order not found: {message}")]
    OrderNotFound { message: String },

    /// A field the order type requires was not supplied.
    ///
    /// `order_type` is the exchange-side type name, e.g. `LIMIT`.
    #[error("Invalid order: {order_type} order requires {parameter}")]
    MissingOrderParameter {
        order_type: String,
        parameter: String,
    },

    /// Feature not supported by this exchange
    #[error("Not supported: {feature}")]
    NotSupported { feature: String },

    // === OperationFailed / NetworkError family ===
    /// Generic network error
    #[error("Network error: {url} - {message}")]
    NetworkError { url: String, message: String },

    /// CloudFlare or similar DDoS protection triggered
    #[error("DDoS protection triggered: {message}")]
    DDoSProtection { message: String },

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {message}")]
    RateLimitExceeded { message: String },

    /// Exchange is temporarily unavailable
    #[error("Exchange not available: {message}")]
    ExchangeNotAvailable { message: String },

    /// Request timed out
    #[error("Request timeout: {url}")]
    RequestTimeout { url: String },

    /// Invalid response from exchange
    #[error("Bad response: {message}")]
    BadResponse { message: String },

    // === Parsing errors ===
    /// Failed to parse response data
    #[error("Parse error: {data_type} - {message}")]
    ParseError { data_type: String, message: String },

    /// JSON parsing error
    #[error("JSON error: {message}")]
    JsonError { message: String },
}

impl CcxtError {
    /// Returns the error code as a string constant
    pub fn code(&self) -> &'static str {
        match self {
            CcxtError::ExchangeError { .. } => "EXCHANGE_ERROR",
            CcxtError::AuthenticationError { .. } => "AUTHENTICATION_ERROR",
            CcxtError::PermissionDenied { .. } => "PERMISSION_DENIED",
            CcxtError::ArgumentsRequired { .. } => "ARGUMENTS_REQUIRED",
            CcxtError::BadRequest { .. } => "BAD_REQUEST",
            CcxtError::BadSymbol { .. } => "BAD_SYMBOL",
            CcxtError::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            CcxtError::InvalidAddress { .. } => "INVALID_ADDRESS",
            CcxtError::InvalidOrder { .. } => "INVALID_ORDER",
            CcxtError::OrderNotFound { .. } => "ORDER_NOT_FOUND",
            CcxtError::MissingOrderParameter { .. } => "MISSING_ORDER_PARAMETER",
            CcxtError::NotSupported { .. } => "NOT_SUPPORTED",
            CcxtError::NetworkError { .. } => "NETWORK_ERROR",
            CcxtError::DDoSProtection { .. } => "DDOS_PROTECTION",
            CcxtError::RateLimitExceeded { .. } => "RATE_LIMIT_EXCEEDED",
            CcxtError::ExchangeNotAvailable { .. } => "EXCHANGE_NOT_AVAILABLE",
            CcxtError::RequestTimeout { .. } => "REQUEST_TIMEOUT",
            CcxtError::BadResponse { .. } => "BAD_RESPONSE",
            CcxtError::ParseError { .. } => "PARSE_ERROR",
            CcxtError::JsonError { .. } => "JSON_ERROR",
        }
    }

    /// Returns true if this error is temporary and the operation could be retried.
    ///
    /// Nothing in this crate retries; callers decide.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CcxtError::NetworkError { .. }
                | CcxtError::RequestTimeout { .. }
                | CcxtError::RateLimitExceeded { .. }
                | CcxtError::ExchangeNotAvailable { .. }
        )
    }

    /// Returns true if this is an authentication-related error
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            CcxtError::AuthenticationError { .. } | CcxtError::PermissionDenied { .. }
        )
    }

    /// Returns true if this is an order-related error
    pub fn is_order_error(&self) -> bool {
        matches!(
            self,
            CcxtError::InvalidOrder { .. }
                | CcxtError::OrderNotFound { .. }
                | CcxtError::MissingOrderParameter { .. }
        )
    }

    /// Returns true if this is a network-related error
    pub fn is_network_error(&self) -> bool {
        matches!(
            self,
            CcxtError::NetworkError { .. }
                | CcxtError::DDoSProtection { .. }
                | CcxtError::RateLimitExceeded { .. }
                | CcxtError::ExchangeNotAvailable { .. }
                | CcxtError::RequestTimeout { .. }
        )
    }

    /// Builds a `ParseError` for the given entity name.
    pub fn parse(data_type: impl Into<String>, message: impl Into<String>) -> Self {
        CcxtError::ParseError {
            data_type: data_type.into(),
            message: message.into(),
        }
    }
}

// === From implementations for common error types ===

impl From<serde_json::Error> for CcxtError {
    fn from(err: serde_json::Error) -> Self {
        CcxtError::JsonError {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for CcxtError {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map(|u| u.to_string()).unwrap_or_default();
        if err.is_timeout() {
            CcxtError::RequestTimeout { url }
        } else if err.is_connect() {
            CcxtError::NetworkError {
                url,
                message: "Connection failed".into(),
            }
        } else {
            CcxtError::NetworkError {
                url,
                message: err.to_string(),
            }
        }
    }
}

/// Result 타입 alias
pub type CcxtResult<T> = Result<T, CcxtError>;
