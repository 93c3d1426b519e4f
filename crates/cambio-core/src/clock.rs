//! Clock capability: "today" is an explicit input to resolution logic, not
//! ambient process time.

use time::{Date, OffsetDateTime};

use crate::UtcTimestamp;

/// Time source threaded through the resolver, series builder and engine.
pub trait Clock: Send + Sync {
    fn now(&self) -> UtcTimestamp;

    fn today(&self) -> Date {
        self.now().day()
    }
}

/// Wall-clock time, UTC.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> UtcTimestamp {
        UtcTimestamp::from_offset_datetime(OffsetDateTime::now_utc())
            .expect("system UTC time must have UTC offset")
    }
}

/// Fixed clock for deterministic tests and offline demos.
#[derive(Debug, Clone, Copy)]
pub struct ManualClock {
    now: UtcTimestamp,
}

impl ManualClock {
    pub fn new(now: UtcTimestamp) -> Self {
        Self { now }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> UtcTimestamp {
        self.now
    }
}
