use thiserror::Error;

/// Validation and contract errors exposed by `cambio-core`.
///
/// Every variant represents input rejected *before* any cache or network
/// access is attempted.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("currency code cannot be empty")]
    EmptyCurrency,
    #[error("currency code must be exactly 3 letters: '{value}'")]
    CurrencyLength { value: String },
    #[error("currency code contains invalid character '{ch}' at index {index}")]
    CurrencyInvalidChar { ch: char, index: usize },

    #[error("amount must be a finite number")]
    NonFiniteAmount,
    #[error("amount must be greater than zero, got {value}")]
    NonPositiveAmount { value: f64 },

    #[error("rate must be a positive finite number, got {value}")]
    InvalidRate { value: f64 },

    #[error("day count {days} is out of range, expected 1..={max}")]
    DayCountOutOfRange { days: u32, max: u32 },

    #[error("date must be YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },
    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
