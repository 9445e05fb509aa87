//! Centralized Error Handling Module
//!
//! Every failure carries a unique error code so logs and API responses can
//! be correlated.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - UPSTREAM_xxx: TronGrid / TronScan transport errors
//! - API_xxx: API errors
//! - CFG_xxx: Configuration errors
//! - ADDR_xxx: Address validation errors

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Upstream Errors
    // ============================================
    /// Connection to provider failed
    UpstreamConnectionFailed,
    /// Provider request timed out
    UpstreamTimeout,
    /// Provider rate limited (HTTP 429)
    UpstreamRateLimited,
    /// Provider returned a non-success status
    UpstreamHttpError,
    /// Provider body could not be decoded
    UpstreamInvalidResponse,

    // ============================================
    // API Errors
    // ============================================
    /// Internal server error
    ApiInternalError,
    /// Resource not found
    ApiNotFound,

    // ============================================
    // Configuration Errors
    // ============================================
    /// Invalid configuration value
    ConfigInvalidValue,

    // ============================================
    // Address Errors
    // ============================================
    /// Not valid base58 / hex
    AddressInvalidEncoding,
    /// Wrong decoded length
    AddressInvalidLength,
    /// Version byte is not 0x41
    AddressInvalidPrefix,
    /// Base58Check checksum mismatch
    AddressInvalidChecksum,

    // ============================================
    // Generic Errors
    // ============================================
    /// Unknown error
    Unknown,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UpstreamConnectionFailed => "UPSTREAM_CONNECTION_FAILED",
            Self::UpstreamTimeout => "UPSTREAM_TIMEOUT",
            Self::UpstreamRateLimited => "UPSTREAM_RATE_LIMITED",
            Self::UpstreamHttpError => "UPSTREAM_HTTP_ERROR",
            Self::UpstreamInvalidResponse => "UPSTREAM_INVALID_RESPONSE",

            Self::ApiInternalError => "API_INTERNAL_ERROR",
            Self::ApiNotFound => "API_NOT_FOUND",

            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",

            Self::AddressInvalidEncoding => "ADDR_INVALID_ENCODING",
            Self::AddressInvalidLength => "ADDR_INVALID_LENGTH",
            Self::AddressInvalidPrefix => "ADDR_INVALID_PREFIX",
            Self::AddressInvalidChecksum => "ADDR_INVALID_CHECKSUM",

            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Get HTTP status code for API responses
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ConfigInvalidValue
            | Self::AddressInvalidEncoding
            | Self::AddressInvalidLength
            | Self::AddressInvalidPrefix
            | Self::AddressInvalidChecksum => 400,
            Self::ApiNotFound => 404,
            Self::UpstreamRateLimited => 429,
            Self::UpstreamConnectionFailed
            | Self::UpstreamTimeout
            | Self::UpstreamHttpError
            | Self::UpstreamInvalidResponse => 502,
            _ => 500,
        }
    }

    /// Check if error is retryable at the transport level
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::UpstreamTimeout
                | Self::UpstreamRateLimited
                | Self::UpstreamConnectionFailed
                | Self::UpstreamHttpError
        )
    }

    /// Address validation failures are user-facing
    pub fn is_invalid_address(&self) -> bool {
        matches!(
            self,
            Self::AddressInvalidEncoding
                | Self::AddressInvalidLength
                | Self::AddressInvalidPrefix
                | Self::AddressInvalidChecksum
        )
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// Provider request timed out
    pub fn upstream_timeout(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::UpstreamTimeout, msg)
    }

    /// Provider rate limited
    pub fn upstream_rate_limited(provider: &str) -> Self {
        Self::new(
            ErrorCode::UpstreamRateLimited,
            format!("{} rate limited (HTTP 429)", provider),
        )
    }

    /// Provider returned non-success status
    pub fn upstream_http(provider: &str, status: u16) -> Self {
        Self::new(
            ErrorCode::UpstreamHttpError,
            format!("{} returned HTTP {}", provider, status),
        )
    }

    /// Provider body unusable
    pub fn upstream_invalid(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::UpstreamInvalidResponse, msg)
    }

    /// Invalid configuration value
    pub fn invalid_config(key: &str, value: &str) -> Self {
        Self::new(
            ErrorCode::ConfigInvalidValue,
            format!("Invalid value for {}: {:?}", key, value),
        )
    }

    /// No route for the request path
    pub fn not_found(path: &str) -> Self {
        Self::new(ErrorCode::ApiNotFound, format!("No route for {}", path))
    }

    /// API internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiInternalError, msg)
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        Self::new(ErrorCode::Unknown, err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorCode::Unknown, "IO error", err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::new(ErrorCode::UpstreamTimeout, "Request timeout")
        } else if err.is_connect() {
            Self::new(ErrorCode::UpstreamConnectionFailed, "Connection failed")
        } else if err.is_decode() {
            Self::with_source(ErrorCode::UpstreamInvalidResponse, "Body decode failed", err)
        } else {
            Self::new(ErrorCode::Unknown, err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::UpstreamInvalidResponse, "JSON parse error", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = AppError::upstream_timeout("TronScan timed out");
        assert_eq!(err.code, ErrorCode::UpstreamTimeout);
        assert_eq!(err.code_str(), "UPSTREAM_TIMEOUT");
        assert_eq!(err.to_string(), "[UPSTREAM_TIMEOUT] TronScan timed out");
    }

    #[test]
    fn test_retryable() {
        assert!(ErrorCode::UpstreamTimeout.is_retryable());
        assert!(ErrorCode::UpstreamRateLimited.is_retryable());
        assert!(!ErrorCode::UpstreamInvalidResponse.is_retryable());
        assert!(!ErrorCode::AddressInvalidChecksum.is_retryable());
    }

    #[test]
    fn test_http_status() {
        assert_eq!(ErrorCode::ApiNotFound.http_status(), 404);
        assert_eq!(ErrorCode::AddressInvalidChecksum.http_status(), 400);
        assert_eq!(ErrorCode::UpstreamRateLimited.http_status(), 429);
        assert_eq!(ErrorCode::UpstreamTimeout.http_status(), 502);
        assert_eq!(ErrorCode::ApiInternalError.http_status(), 500);
    }

    #[test]
    fn test_invalid_address_family() {
        assert!(ErrorCode::AddressInvalidPrefix.is_invalid_address());
        assert!(!ErrorCode::ApiNotFound.is_invalid_address());
    }
}
