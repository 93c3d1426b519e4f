//! Bounded, insertion-ordered log of completed conversions.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::ConversionRecord;

/// Default number of records retained before eviction.
pub const DEFAULT_LEDGER_CAPACITY: usize = 100;

#[derive(Debug)]
struct LedgerInner {
    records: VecDeque<ConversionRecord>,
    capacity: usize,
}

/// Capacity-bounded conversion log, FIFO eviction.
///
/// The eviction check and the append happen under one lock, so the ledger
/// never exceeds capacity and never loses a record to a racing append.
#[derive(Debug)]
pub struct ConversionLedger {
    inner: Mutex<LedgerInner>,
}

impl Default for ConversionLedger {
    fn default() -> Self {
        Self::new(DEFAULT_LEDGER_CAPACITY)
    }
}

impl ConversionLedger {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Mutex::new(LedgerInner {
                records: VecDeque::with_capacity(capacity),
                capacity,
            }),
        }
    }

    /// Append a record, evicting the oldest when at capacity.
    pub fn append(&self, record: ConversionRecord) {
        let mut inner = self
            .inner
            .lock()
            .expect("conversion ledger lock should not be poisoned");
        if inner.records.len() == inner.capacity {
            inner.records.pop_front();
        }
        inner.records.push_back(record);
    }

    /// The `limit` most recently appended records, most-recent-first.
    ///
    /// A limit beyond the current length returns the whole ledger.
    pub fn recent(&self, limit: usize) -> Vec<ConversionRecord> {
        let inner = self
            .inner
            .lock()
            .expect("conversion ledger lock should not be poisoned");
        inner.records.iter().rev().take(limit).copied().collect()
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .expect("conversion ledger lock should not be poisoned")
            .records
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.inner
            .lock()
            .expect("conversion ledger lock should not be poisoned")
            .capacity
    }

    /// Empty the ledger unconditionally.
    pub fn clear(&self) {
        self.inner
            .lock()
            .expect("conversion ledger lock should not be poisoned")
            .records
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConversionKind, CurrencyCode, UtcTimestamp};
    use time::macros::date;

    fn record(amount: f64) -> ConversionRecord {
        ConversionRecord {
            amount,
            from: CurrencyCode::parse("USD").expect("code"),
            to: CurrencyCode::parse("EUR").expect("code"),
            converted_amount: amount * 0.92,
            rate: 0.92,
            kind: ConversionKind::Realtime,
            timestamp: UtcTimestamp::parse("2026-08-06T12:00:00Z").expect("ts"),
            rate_day: date!(2026 - 08 - 06),
        }
    }

    #[test]
    fn append_evicts_oldest_beyond_capacity() {
        let ledger = ConversionLedger::new(3);
        for amount in [1.0, 2.0, 3.0, 4.0] {
            ledger.append(record(amount));
        }

        assert_eq!(ledger.len(), 3);
        let recent = ledger.recent(10);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].amount, 4.0);
        assert_eq!(recent[1].amount, 3.0);
        assert_eq!(recent[2].amount, 2.0);
    }

    #[test]
    fn recent_respects_limit_and_ordering() {
        let ledger = ConversionLedger::new(10);
        for amount in [1.0, 2.0, 3.0] {
            ledger.append(record(amount));
        }

        let two = ledger.recent(2);
        assert_eq!(two.len(), 2);
        assert_eq!(two[0].amount, 3.0);
        assert_eq!(two[1].amount, 2.0);
    }

    #[test]
    fn clear_is_unconditional() {
        let ledger = ConversionLedger::new(5);
        ledger.append(record(1.0));
        ledger.append(record(2.0));

        ledger.clear();
        assert!(ledger.is_empty());
        assert_eq!(ledger.capacity(), 5);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let ledger = ConversionLedger::new(0);
        ledger.append(record(1.0));
        ledger.append(record(2.0));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.recent(10)[0].amount, 2.0);
    }
}
