//! Error types for the rate pipeline

use crate::core::currency::Currency;
use chrono::NaiveDate;
use thiserror::Error;

/// Failures a query can end with. None of them leave partial results behind.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RatesError {
    /// The rate service could not be reached or returned something unusable.
    #[error("Rate service unavailable for {currency} on {date}: {reason}")]
    SourceUnavailable {
        currency: Currency,
        date: NaiveDate,
        reason: String,
    },

    /// The service answered, but published nothing inside the lookback window.
    #[error("No {currency} rates published in the {lookback_days} days up to {as_of}")]
    NoDataAvailable {
        currency: Currency,
        lookback_days: u32,
        as_of: NaiveDate,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Cannot compute relative change for {currency}: first rate is zero")]
    DivisionByZero { currency: Currency },
}

pub type Result<T> = std::result::Result<T, RatesError>;
