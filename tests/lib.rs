//! Shared test support: a scriptable rate source and fixed-clock wiring.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use time::Date;

use cambio_core::{
    Clock, ManualClock, RateCache, RateResolver, RateSource, RateTable, SourceError, SourceId,
    UtcTimestamp,
};

pub fn code(raw: &str) -> cambio_core::CurrencyCode {
    cambio_core::CurrencyCode::parse(raw).expect("valid currency code")
}

pub fn ts(raw: &str) -> UtcTimestamp {
    UtcTimestamp::parse(raw).expect("valid RFC3339 UTC timestamp")
}

pub fn day(raw: &str) -> Date {
    cambio_core::parse_day(raw).expect("valid YYYY-MM-DD day")
}

pub fn fixed_clock(raw: &str) -> Arc<dyn Clock> {
    Arc::new(ManualClock::new(ts(raw)))
}

/// Rate source with per-day scripted tables and a call counter.
///
/// Days without a scripted table fail with a transport error, as does the
/// whole source once `set_failing(true)` is called.
pub struct ScriptedRateSource {
    tables: Mutex<HashMap<Date, HashMap<cambio_core::CurrencyCode, f64>>>,
    latest_day: Date,
    supports_historical: bool,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl ScriptedRateSource {
    pub fn new(latest_day: Date) -> Self {
        Self {
            tables: Mutex::new(HashMap::new()),
            latest_day,
            supports_historical: true,
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn without_historical(mut self) -> Self {
        self.supports_historical = false;
        self
    }

    pub fn script_day(&self, day: Date, rates: &[(&str, f64)]) {
        let mut table = HashMap::new();
        for (raw, rate) in rates {
            table.insert(code(raw), *rate);
        }
        self.tables
            .lock()
            .expect("scripted source lock should not be poisoned")
            .insert(day, table);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of fetches that reached this source.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn serve(&self, base: cambio_core::CurrencyCode, day: Date) -> Result<RateTable, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failing.load(Ordering::SeqCst) {
            return Err(SourceError::transport("scripted outage"));
        }

        let tables = self
            .tables
            .lock()
            .expect("scripted source lock should not be poisoned");
        match tables.get(&day) {
            Some(rates) => Ok(RateTable {
                base,
                day,
                rates: rates.clone(),
            }),
            None => Err(SourceError::transport(format!(
                "no scripted table for {}",
                cambio_core::format_day(day)
            ))),
        }
    }
}

impl RateSource for ScriptedRateSource {
    fn id(&self) -> SourceId {
        SourceId::Offline
    }

    fn supports_historical(&self) -> bool {
        self.supports_historical
    }

    fn fetch_latest<'a>(
        &'a self,
        base: cambio_core::CurrencyCode,
    ) -> Pin<Box<dyn Future<Output = Result<RateTable, SourceError>> + Send + 'a>> {
        Box::pin(async move { self.serve(base, self.latest_day) })
    }

    fn fetch_historical<'a>(
        &'a self,
        base: cambio_core::CurrencyCode,
        day: Date,
    ) -> Pin<Box<dyn Future<Output = Result<RateTable, SourceError>> + Send + 'a>> {
        Box::pin(async move { self.serve(base, day) })
    }
}

/// Resolver wired to the scripted source with negligible call spacing.
pub fn resolver_with(source: Arc<ScriptedRateSource>, clock: Arc<dyn Clock>) -> Arc<RateResolver> {
    Arc::new(RateResolver::with_spacing(
        source,
        RateCache::new(),
        clock,
        Duration::from_millis(1),
    ))
}
