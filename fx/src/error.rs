//! FX engine error types.

use easner_common::{ApiError, CurrencyPair};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while quoting or recording a transfer.
#[derive(Debug, Error)]
pub enum FxError {
    /// Amount was zero or negative.
    #[error("Amount must be greater than zero, got {0}")]
    InvalidAmount(Decimal),

    /// One or both currency codes were blank.
    #[error("Both fromCurrency and toCurrency are required")]
    MissingCurrency,

    /// No direct or invertible active rate exists for the pair.
    #[error("Exchange rate not found for {from} to {to}")]
    RateNotFound { from: String, to: String },

    /// Arithmetic on the amount left the representable decimal range.
    #[error("Amount {0} is out of range")]
    AmountOutOfRange(Decimal),

    /// The transfer recipient is missing or malformed.
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    /// A rate row failed validation.
    #[error("Invalid exchange rate {pair}: {reason}")]
    InvalidRate { pair: CurrencyPair, reason: String },

    /// The actor lacks the rights for this operation.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The backing store failed.
    #[error("Store error: {0}")]
    Store(String),
}

impl FxError {
    /// Build a `RateNotFound` for a currency pair.
    pub fn rate_not_found(from: impl Into<String>, to: impl Into<String>) -> Self {
        FxError::RateNotFound {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl ApiError for FxError {
    fn error_code(&self) -> &'static str {
        match self {
            FxError::InvalidAmount(_) => "INVALID_AMOUNT",
            FxError::MissingCurrency => "MISSING_CURRENCY",
            FxError::RateNotFound { .. } => "RATE_NOT_FOUND",
            FxError::AmountOutOfRange(_) => "AMOUNT_OUT_OF_RANGE",
            FxError::InvalidRecipient(_) => "INVALID_RECIPIENT",
            FxError::InvalidRate { .. } => "INVALID_RATE",
            FxError::Unauthorized(_) => "UNAUTHORIZED",
            FxError::Store(_) => "STORE_ERROR",
        }
    }

    fn status_code(&self) -> u16 {
        match self {
            FxError::InvalidAmount(_)
            | FxError::MissingCurrency
            | FxError::RateNotFound { .. }
            | FxError::AmountOutOfRange(_)
            | FxError::InvalidRecipient(_)
            | FxError::InvalidRate { .. } => 400,
            FxError::Unauthorized(_) => 403,
            FxError::Store(_) => 500,
        }
    }

    fn field(&self) -> Option<&'static str> {
        match self {
            FxError::InvalidAmount(_) | FxError::AmountOutOfRange(_) => Some("amount"),
            FxError::MissingCurrency => Some("currency"),
            FxError::InvalidRecipient(_) => Some("recipientId"),
            _ => None,
        }
    }
}

/// Result type for FX operations.
pub type FxResult<T> = Result<T, FxError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_engine_errors_are_client_errors() {
        let errors = [
            FxError::InvalidAmount(dec!(0)),
            FxError::MissingCurrency,
            FxError::rate_not_found("XYZ", "ABC"),
        ];

        for error in &errors {
            assert_eq!(error.status_code(), 400);
            assert!(error.is_client_error());
        }
    }

    #[test]
    fn test_rate_not_found_message_names_both_codes() {
        let error = FxError::rate_not_found("XYZ", "ABC");
        let message = error.to_string();
        assert!(message.contains("XYZ"));
        assert!(message.contains("ABC"));
        assert_eq!(error.to_body().code, "RATE_NOT_FOUND");
    }

    #[test]
    fn test_store_error_is_server_error() {
        let error = FxError::Store("connection reset".to_string());
        assert_eq!(error.status_code(), 500);
        assert!(!error.is_client_error());
    }

    #[test]
    fn test_invalid_amount_body_names_field() {
        let body = FxError::InvalidAmount(dec!(-5)).to_body();
        assert_eq!(body.field.as_deref(), Some("amount"));
    }
}
