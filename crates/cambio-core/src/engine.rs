//! Conversion engine: resolution plus the bounded ledger it feeds.

use std::sync::Arc;

use thiserror::Error;
use time::Date;

use crate::clock::Clock;
use crate::domain::validate_amount;
use crate::ledger::ConversionLedger;
use crate::resolver::{RateResolver, Resolved, ResolveError};
use crate::{round2, ConversionKind, ConversionRecord, CurrencyCode, RateDate, ValidationError};

/// Failures surfaced to conversion callers.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConvertError {
    /// Rejected before any cache or network access.
    #[error(transparent)]
    InvalidInput(#[from] ValidationError),

    #[error("conversion failed: {0}")]
    RateUnavailable(#[from] ResolveError),
}

/// Converts amounts and records each successful conversion in the ledger.
///
/// The ledger is owned exclusively by the engine; callers read it through
/// [`ConversionEngine::ledger`]. Quote-only lookups via
/// [`ConversionEngine::rate`] intentionally leave no trace in it.
pub struct ConversionEngine {
    resolver: Arc<RateResolver>,
    ledger: ConversionLedger,
    clock: Arc<dyn Clock>,
}

impl ConversionEngine {
    pub fn new(resolver: Arc<RateResolver>, clock: Arc<dyn Clock>) -> Self {
        Self::with_ledger(resolver, clock, ConversionLedger::default())
    }

    pub fn with_ledger(
        resolver: Arc<RateResolver>,
        clock: Arc<dyn Clock>,
        ledger: ConversionLedger,
    ) -> Self {
        Self {
            resolver,
            ledger,
            clock,
        }
    }

    /// Convert `amount` from one currency to another, optionally on a past
    /// day, and append exactly one ledger record on success.
    ///
    /// The converted amount is rounded to 2 decimal places for display-grade
    /// results; the unrounded rate is retained on the record for audit. A
    /// resolution failure leaves the ledger untouched.
    pub async fn convert(
        &self,
        amount: f64,
        from: CurrencyCode,
        to: CurrencyCode,
        date: Option<Date>,
    ) -> Result<ConversionRecord, ConvertError> {
        let amount = validate_amount(amount)?;

        let resolved = self
            .resolver
            .resolve(from, to, RateDate::from_optional_day(date))
            .await?;

        let kind = match date {
            Some(day) if day != self.clock.today() => ConversionKind::Historical,
            _ => ConversionKind::Realtime,
        };

        let record = ConversionRecord {
            amount,
            from,
            to,
            converted_amount: round2(amount * resolved.rate),
            rate: resolved.rate,
            kind,
            timestamp: self.clock.now(),
            rate_day: resolved.day,
        };

        self.ledger.append(record);
        Ok(record)
    }

    /// Resolve a rate without recording a conversion.
    pub async fn rate(
        &self,
        from: CurrencyCode,
        to: CurrencyCode,
        date: Option<Date>,
    ) -> Result<Resolved, ConvertError> {
        Ok(self
            .resolver
            .resolve(from, to, RateDate::from_optional_day(date))
            .await?)
    }

    pub fn ledger(&self) -> &ConversionLedger {
        &self.ledger
    }

    pub fn resolver(&self) -> &RateResolver {
        &self.resolver
    }
}
