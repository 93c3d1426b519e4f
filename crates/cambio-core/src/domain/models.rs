use serde::{Deserialize, Serialize};
use time::Date;

use super::date::day_format;
use crate::{CurrencyCode, UtcTimestamp, ValidationError};

/// Round a display-grade monetary amount to 2 decimal places.
///
/// Only converted amounts are rounded; rates are kept unrounded for audit.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn validate_rate(rate: f64) -> Result<f64, ValidationError> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(ValidationError::InvalidRate { value: rate });
    }
    Ok(rate)
}

pub(crate) fn validate_amount(amount: f64) -> Result<f64, ValidationError> {
    if !amount.is_finite() {
        return Err(ValidationError::NonFiniteAmount);
    }
    if amount <= 0.0 {
        return Err(ValidationError::NonPositiveAmount { value: amount });
    }
    Ok(amount)
}

/// One observed exchange rate, day granularity.
///
/// For a given `(base, quote, day)` at most one authoritative record exists;
/// the cache and the store both replace on re-observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateRecord {
    pub base: CurrencyCode,
    pub quote: CurrencyCode,
    #[serde(with = "day_format")]
    pub day: Date,
    pub rate: f64,
    pub observed_at: UtcTimestamp,
}

impl RateRecord {
    pub fn new(
        base: CurrencyCode,
        quote: CurrencyCode,
        day: Date,
        rate: f64,
        observed_at: UtcTimestamp,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            base,
            quote,
            day,
            rate: validate_rate(rate)?,
            observed_at,
        })
    }
}

/// Whether a conversion used the freshest rate or an explicitly dated one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionKind {
    Realtime,
    Historical,
}

impl ConversionKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Realtime => "realtime",
            Self::Historical => "historical",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "realtime" => Some(Self::Realtime),
            "historical" => Some(Self::Historical),
            _ => None,
        }
    }
}

/// One completed conversion. Immutable once appended to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConversionRecord {
    pub amount: f64,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub converted_amount: f64,
    pub rate: f64,
    pub kind: ConversionKind,
    pub timestamp: UtcTimestamp,
    /// Day the applied rate was observed for; may trail the request date
    /// when the resolver served a stale fallback.
    #[serde(with = "day_format")]
    pub rate_day: Date,
}

/// One point of a historical series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    #[serde(with = "day_format")]
    pub day: Date,
    pub rate: f64,
}

/// Sparse historical rate series for one currency pair, most-recent-first.
///
/// Days the source could not serve are omitted, not null-filled. Callers
/// needing chronological order reverse at the presentation boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSeries {
    pub base: CurrencyCode,
    pub quote: CurrencyCode,
    pub points: Vec<SeriesPoint>,
}

impl RateSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
