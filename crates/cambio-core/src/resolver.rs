//! Rate resolution: the fetch → cache → stale-fallback policy.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};
use log::{debug, warn};
use thiserror::Error;
use time::Date;

use crate::cache::RateCache;
use crate::clock::Clock;
use crate::rate_source::{RateSource, SourceError, SourceId};
use crate::{format_day, CurrencyCode, RateDate, RateRecord};

/// Minimum spacing between consecutive upstream calls.
pub const DEFAULT_SOURCE_SPACING: Duration = Duration::from_millis(100);

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Spaces calls that actually reach the source; cache hits incur no delay.
pub(crate) struct SourcePacer {
    limiter: DirectRateLimiter,
}

impl SourcePacer {
    pub(crate) fn new(spacing: Duration) -> Self {
        let period = spacing.max(Duration::from_millis(1));
        let quota = Quota::with_period(period)
            .expect("spacing period is always greater than zero")
            .allow_burst(NonZeroU32::MIN);
        Self {
            limiter: RateLimiter::direct(quota),
        }
    }

    pub(crate) async fn pace(&self) {
        self.limiter.until_ready().await;
    }
}

/// How the resolved rate was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Fetched from the source during this resolution.
    Fetched,
    /// Served from the cache for the requested day; no source call made.
    Cached,
    /// The source failed; a previously observed rate was served instead.
    StaleFallback,
}

/// Outcome of a resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved {
    pub rate: f64,
    /// Day the rate was observed for. Trails the requested day when the
    /// freshness is [`Freshness::StaleFallback`].
    pub day: Date,
    pub freshness: Freshness,
}

/// Resolution failure: both the fetch and the fallback paths are exhausted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no rate available for {base}->{quote} on {day}")]
    RateUnavailable {
        base: CurrencyCode,
        quote: CurrencyCode,
        day: Date,
    },
}

/// Decides, per `(base, quote, day)` request, whether to reuse a cached
/// value, call the source, or fall back to the most recent observation.
///
/// `SourceError` never escapes: a failed fetch always becomes either a stale
/// fallback or [`ResolveError::RateUnavailable`]. No retry beyond that single
/// fallback step, and no lock is held across the source call.
pub struct RateResolver {
    source: Arc<dyn RateSource>,
    cache: RateCache,
    clock: Arc<dyn Clock>,
    pacer: SourcePacer,
}

impl RateResolver {
    pub fn new(source: Arc<dyn RateSource>, cache: RateCache, clock: Arc<dyn Clock>) -> Self {
        Self::with_spacing(source, cache, clock, DEFAULT_SOURCE_SPACING)
    }

    pub fn with_spacing(
        source: Arc<dyn RateSource>,
        cache: RateCache,
        clock: Arc<dyn Clock>,
        spacing: Duration,
    ) -> Self {
        Self {
            source,
            cache,
            clock,
            pacer: SourcePacer::new(spacing),
        }
    }

    pub fn source_id(&self) -> SourceId {
        self.source.id()
    }

    pub fn source_supports_historical(&self) -> bool {
        self.source.supports_historical()
    }

    /// The injected clock's current day.
    pub fn today(&self) -> Date {
        self.clock.today()
    }

    /// Resolve one rate per the fetch → cache → fallback policy.
    pub async fn resolve(
        &self,
        base: CurrencyCode,
        quote: CurrencyCode,
        date: RateDate,
    ) -> Result<Resolved, ResolveError> {
        let today = self.clock.today();
        let day = match date {
            RateDate::Latest => today,
            RateDate::Day(day) => day,
        };

        if let Some(hit) = self.cache.get(base, quote, day).await {
            debug!("cache hit for {base}->{quote} on {}", format_day(day));
            return Ok(Resolved {
                rate: hit.rate,
                day: hit.day,
                freshness: Freshness::Cached,
            });
        }

        match self.fetch(base, quote, day, day == today).await {
            Ok(record) => {
                self.cache.put(record).await;
                Ok(Resolved {
                    rate: record.rate,
                    day: record.day,
                    freshness: Freshness::Fetched,
                })
            }
            Err(error) => {
                warn!(
                    "source fetch failed for {base}->{quote} on {}: {error}; trying cached fallback",
                    format_day(day)
                );
                match self.cache.latest_for_pair(base, quote).await {
                    Some(stale) => {
                        warn!(
                            "serving stale rate for {base}->{quote} observed {}",
                            format_day(stale.day)
                        );
                        Ok(Resolved {
                            rate: stale.rate,
                            day: stale.day,
                            freshness: Freshness::StaleFallback,
                        })
                    }
                    None => Err(ResolveError::RateUnavailable { base, quote, day }),
                }
            }
        }
    }

    async fn fetch(
        &self,
        base: CurrencyCode,
        quote: CurrencyCode,
        day: Date,
        is_today: bool,
    ) -> Result<RateRecord, SourceError> {
        self.pacer.pace().await;

        let table = if is_today {
            self.source.fetch_latest(base).await?
        } else {
            self.source.fetch_historical(base, day).await?
        };

        let rate = table
            .rate_for(quote)
            .ok_or_else(|| SourceError::missing_quote(quote))?;

        // The record is keyed by the requested day even when the source
        // stamps its table differently; day granularity is ours to enforce.
        RateRecord::new(base, quote, day, rate, self.clock.now())
            .map_err(|e| SourceError::parse(format!("source returned unusable rate: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::rate_source::RateTable;
    use crate::UtcTimestamp;
    use std::collections::HashMap;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use time::macros::date;

    fn code(raw: &str) -> CurrencyCode {
        CurrencyCode::parse(raw).expect("valid code")
    }

    fn clock() -> Arc<dyn Clock> {
        Arc::new(ManualClock::new(
            UtcTimestamp::parse("2026-08-06T12:00:00Z").expect("ts"),
        ))
    }

    struct FlakySource {
        rate: f64,
        failing: AtomicBool,
        calls: AtomicUsize,
    }

    impl FlakySource {
        fn new(rate: f64) -> Self {
            Self {
                rate,
                failing: AtomicBool::new(false),
                calls: AtomicUsize::new(0),
            }
        }

        fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn table(&self, base: CurrencyCode, day: Date) -> Result<RateTable, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(SourceError::transport("scripted outage"));
            }
            let mut rates = HashMap::new();
            rates.insert(code("EUR"), self.rate);
            Ok(RateTable { base, day, rates })
        }
    }

    impl RateSource for FlakySource {
        fn id(&self) -> SourceId {
            SourceId::Offline
        }

        fn supports_historical(&self) -> bool {
            true
        }

        fn fetch_latest<'a>(
            &'a self,
            base: CurrencyCode,
        ) -> Pin<Box<dyn Future<Output = Result<RateTable, SourceError>> + Send + 'a>> {
            Box::pin(async move { self.table(base, date!(2026 - 08 - 06)) })
        }

        fn fetch_historical<'a>(
            &'a self,
            base: CurrencyCode,
            day: Date,
        ) -> Pin<Box<dyn Future<Output = Result<RateTable, SourceError>> + Send + 'a>> {
            Box::pin(async move { self.table(base, day) })
        }
    }

    fn resolver_with(source: Arc<FlakySource>) -> RateResolver {
        RateResolver::with_spacing(source, RateCache::new(), clock(), Duration::from_millis(1))
    }

    #[tokio::test]
    async fn second_resolution_is_served_from_cache() {
        let source = Arc::new(FlakySource::new(0.92));
        let resolver = resolver_with(Arc::clone(&source));

        let first = resolver
            .resolve(code("USD"), code("EUR"), RateDate::Latest)
            .await
            .expect("resolve");
        assert_eq!(first.freshness, Freshness::Fetched);
        assert_eq!(source.calls(), 1);

        let second = resolver
            .resolve(code("USD"), code("EUR"), RateDate::Latest)
            .await
            .expect("resolve");
        assert_eq!(second.freshness, Freshness::Cached);
        assert_eq!(second.rate, first.rate);
        assert_eq!(source.calls(), 1, "cache hit must not reach the source");
    }

    #[tokio::test]
    async fn outage_falls_back_to_most_recent_observation() {
        let source = Arc::new(FlakySource::new(0.92));
        let resolver = resolver_with(Arc::clone(&source));

        resolver
            .resolve(code("USD"), code("EUR"), RateDate::Day(date!(2026 - 08 - 04)))
            .await
            .expect("seed cache");

        source.set_failing(true);
        let resolved = resolver
            .resolve(code("USD"), code("EUR"), RateDate::Latest)
            .await
            .expect("fallback must serve");
        assert_eq!(resolved.freshness, Freshness::StaleFallback);
        assert_eq!(resolved.rate, 0.92);
        assert_eq!(resolved.day, date!(2026 - 08 - 04));
    }

    #[tokio::test]
    async fn outage_with_cold_cache_is_unavailable() {
        let source = Arc::new(FlakySource::new(0.92));
        source.set_failing(true);
        let resolver = resolver_with(Arc::clone(&source));

        let err = resolver
            .resolve(code("USD"), code("EUR"), RateDate::Latest)
            .await
            .expect_err("nothing to serve");
        assert_eq!(
            err,
            ResolveError::RateUnavailable {
                base: code("USD"),
                quote: code("EUR"),
                day: date!(2026 - 08 - 06),
            }
        );
    }

    #[tokio::test]
    async fn missing_quote_is_a_source_failure() {
        let source = Arc::new(FlakySource::new(0.92));
        let resolver = resolver_with(Arc::clone(&source));

        // GBP is not in the scripted table and nothing is cached.
        let err = resolver
            .resolve(code("USD"), code("GBP"), RateDate::Latest)
            .await
            .expect_err("absent quote currency");
        assert!(matches!(err, ResolveError::RateUnavailable { .. }));
        assert_eq!(source.calls(), 1);
    }
}
