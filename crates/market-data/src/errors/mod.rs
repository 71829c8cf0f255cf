//! Error types and failure classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for all market data operations
//! - [`FailureClass`]: Classification for distinguishing failure kinds

mod classify;

pub use classify::FailureClass;

use thiserror::Error;

/// Errors that can occur during market data operations.
///
/// Each variant is classified into a [`FailureClass`] via the
/// [`failure_class`](Self::failure_class) method, which lets callers
/// distinguish "the data does not exist" from "it might exist, try later".
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The requested symbol was not found by the provider.
    /// Retrying won't help.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// No data available for the requested range.
    /// The symbol exists but has no quotes in the specified window.
    #[error("No data for range")]
    NoDataForRange,

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// A provider-specific error occurred.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider returned data that failed validation checks.
    #[error("Validation failed: {message}")]
    ValidationFailed {
        /// Description of the validation failure
        message: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Returns the failure classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use foliotrack_market_data::errors::{FailureClass, MarketDataError};
    ///
    /// let error = MarketDataError::RateLimited { provider: "YAHOO".to_string() };
    /// assert_eq!(error.failure_class(), FailureClass::Transient);
    ///
    /// let error = MarketDataError::SymbolNotFound("INVALID".to_string());
    /// assert_eq!(error.failure_class(), FailureClass::NoData);
    /// ```
    pub fn failure_class(&self) -> FailureClass {
        match self {
            // The data genuinely is not there
            Self::SymbolNotFound(_) | Self::NoDataForRange => FailureClass::NoData,

            // Worth trying again later
            Self::RateLimited { .. } | Self::Timeout { .. } => FailureClass::Transient,

            Self::Network(e) if e.is_timeout() || e.is_connect() => FailureClass::Transient,

            // Anything else is treated as permanent for this cycle
            Self::ProviderError { .. } | Self::ValidationFailed { .. } | Self::Network(_) => {
                FailureClass::Permanent
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_not_found_is_no_data() {
        let error = MarketDataError::SymbolNotFound("INVALID".to_string());
        assert_eq!(error.failure_class(), FailureClass::NoData);
    }

    #[test]
    fn test_no_data_for_range_is_no_data() {
        let error = MarketDataError::NoDataForRange;
        assert_eq!(error.failure_class(), FailureClass::NoData);
    }

    #[test]
    fn test_rate_limited_is_transient() {
        let error = MarketDataError::RateLimited {
            provider: "YAHOO".to_string(),
        };
        assert_eq!(error.failure_class(), FailureClass::Transient);
    }

    #[test]
    fn test_timeout_is_transient() {
        let error = MarketDataError::Timeout {
            provider: "YAHOO".to_string(),
        };
        assert_eq!(error.failure_class(), FailureClass::Transient);
    }

    #[test]
    fn test_provider_error_is_permanent() {
        let error = MarketDataError::ProviderError {
            provider: "YAHOO".to_string(),
            message: "Internal server error".to_string(),
        };
        assert_eq!(error.failure_class(), FailureClass::Permanent);
    }

    #[test]
    fn test_validation_failed_is_permanent() {
        let error = MarketDataError::ValidationFailed {
            message: "close price not convertible".to_string(),
        };
        assert_eq!(error.failure_class(), FailureClass::Permanent);
    }

    #[test]
    fn test_error_display() {
        let error = MarketDataError::SymbolNotFound("INVALID".to_string());
        assert_eq!(format!("{}", error), "Symbol not found: INVALID");

        let error = MarketDataError::RateLimited {
            provider: "YAHOO".to_string(),
        };
        assert_eq!(format!("{}", error), "Rate limited: YAHOO");

        let error = MarketDataError::ProviderError {
            provider: "YAHOO".to_string(),
            message: "bad gateway".to_string(),
        };
        assert_eq!(format!("{}", error), "Provider error: YAHOO - bad gateway");
    }
}
