//! Historical series construction over a lookback window.

use std::sync::Arc;

use log::warn;
use thiserror::Error;
use time::Duration;

use crate::rate_source::SourceId;
use crate::resolver::{RateResolver, ResolveError};
use crate::{format_day, CurrencyCode, RateDate, RateSeries, SeriesPoint, ValidationError};

/// Longest supported lookback window, in days.
pub const MAX_LOOKBACK_DAYS: u32 = 365;

/// Whole-request failures. Per-day resolution failures are not errors; the
/// affected days are simply omitted from the series.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SeriesError {
    #[error(transparent)]
    InvalidDayCount(#[from] ValidationError),

    #[error("source '{source}' does not serve historical rates")]
    HistoricalUnsupported { source: SourceId },
}

/// Drives the resolver across a day range to build an ordered rate series.
///
/// Day 0 is today per the resolver's clock; the result is most-recent-first.
/// A single day's failure never aborts the build, and inter-call spacing is
/// the resolver's concern, so cache hits incur no delay. Dropping the returned
/// future between days leaves no partial entries: each point is pushed only
/// after its resolution completes.
pub struct HistoricalSeriesBuilder {
    resolver: Arc<RateResolver>,
}

impl HistoricalSeriesBuilder {
    pub fn new(resolver: Arc<RateResolver>) -> Self {
        Self { resolver }
    }

    pub async fn build(
        &self,
        base: CurrencyCode,
        quote: CurrencyCode,
        days: u32,
    ) -> Result<RateSeries, SeriesError> {
        if days == 0 || days > MAX_LOOKBACK_DAYS {
            return Err(SeriesError::InvalidDayCount(
                ValidationError::DayCountOutOfRange {
                    days,
                    max: MAX_LOOKBACK_DAYS,
                },
            ));
        }

        if !self.resolver.source_supports_historical() {
            return Err(SeriesError::HistoricalUnsupported {
                source: self.resolver.source_id(),
            });
        }

        let today = self.resolver.today();
        let mut points = Vec::with_capacity(days as usize);

        for offset in 0..days {
            let day = today - Duration::days(i64::from(offset));
            match self.resolver.resolve(base, quote, RateDate::Day(day)).await {
                Ok(resolved) => points.push(SeriesPoint {
                    day,
                    rate: resolved.rate,
                }),
                Err(ResolveError::RateUnavailable { .. }) => {
                    warn!(
                        "skipping {} for {base}->{quote}: no rate available",
                        format_day(day)
                    );
                }
            }
        }

        Ok(RateSeries {
            base,
            quote,
            points,
        })
    }
}
