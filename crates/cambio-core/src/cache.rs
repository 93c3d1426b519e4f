//! Day-granular in-memory rate cache.
//!
//! Keyed by `(base, quote, day)`; a day's entry is reused for every request
//! that day, so there is no TTL machinery: the day key itself scopes
//! freshness. `put` replaces any existing record for the same key
//! (last-writer-wins) and the write lock makes the replacement atomic per
//! key. `get` is a pure local lookup and never blocks on the network.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use time::Date;

use crate::{CurrencyCode, RateRecord};

type PairKey = (CurrencyCode, CurrencyCode);

#[derive(Debug, Default)]
struct CacheInner {
    // Per pair, records ordered by day so the fallback read is a range scan.
    map: HashMap<PairKey, BTreeMap<Date, RateRecord>>,
}

impl CacheInner {
    fn get(&self, base: CurrencyCode, quote: CurrencyCode, day: Date) -> Option<RateRecord> {
        self.map.get(&(base, quote)).and_then(|days| days.get(&day)).copied()
    }

    fn put(&mut self, record: RateRecord) {
        self.map
            .entry((record.base, record.quote))
            .or_default()
            .insert(record.day, record);
    }

    fn latest_for_pair(&self, base: CurrencyCode, quote: CurrencyCode) -> Option<RateRecord> {
        self.map
            .get(&(base, quote))
            .and_then(|days| days.last_key_value())
            .map(|(_, record)| *record)
    }

    fn len(&self) -> usize {
        self.map.values().map(BTreeMap::len).sum()
    }

    fn clear(&mut self) {
        self.map.clear();
    }
}

/// Thread-safe rate cache handle; clones share the same store.
#[derive(Debug, Clone, Default)]
pub struct RateCache {
    inner: Arc<tokio::sync::RwLock<CacheInner>>,
}

impl RateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact lookup for one `(base, quote, day)` key.
    pub async fn get(
        &self,
        base: CurrencyCode,
        quote: CurrencyCode,
        day: Date,
    ) -> Option<RateRecord> {
        let store = self.inner.read().await;
        store.get(base, quote, day)
    }

    /// Record an observation, replacing any record for the same key.
    pub async fn put(&self, record: RateRecord) {
        let mut store = self.inner.write().await;
        store.put(record);
    }

    /// Most recent observation for the pair regardless of requested day.
    ///
    /// This is the stale-fallback read: the newest cached day wins; within a
    /// day at most one record exists because `put` replaces.
    pub async fn latest_for_pair(
        &self,
        base: CurrencyCode,
        quote: CurrencyCode,
    ) -> Option<RateRecord> {
        let store = self.inner.read().await;
        store.latest_for_pair(base, quote)
    }

    /// Number of cached records across all pairs and days.
    pub async fn len(&self) -> usize {
        let store = self.inner.read().await;
        store.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn clear(&self) {
        let mut store = self.inner.write().await;
        store.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UtcTimestamp;
    use time::macros::date;

    fn code(raw: &str) -> CurrencyCode {
        CurrencyCode::parse(raw).expect("valid code")
    }

    fn record(base: &str, quote: &str, day: Date, rate: f64) -> RateRecord {
        RateRecord::new(
            code(base),
            code(quote),
            day,
            rate,
            UtcTimestamp::parse("2026-08-06T12:00:00Z").expect("ts"),
        )
        .expect("valid record")
    }

    #[tokio::test]
    async fn get_put_and_overwrite() {
        let cache = RateCache::new();
        let day = date!(2026 - 08 - 06);

        assert!(cache.get(code("USD"), code("EUR"), day).await.is_none());

        cache.put(record("USD", "EUR", day, 0.92)).await;
        let hit = cache.get(code("USD"), code("EUR"), day).await.expect("hit");
        assert_eq!(hit.rate, 0.92);

        // Same key again: last writer wins, no duplicate.
        cache.put(record("USD", "EUR", day, 0.93)).await;
        let hit = cache.get(code("USD"), code("EUR"), day).await.expect("hit");
        assert_eq!(hit.rate, 0.93);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn pairs_and_directions_are_distinct_keys() {
        let cache = RateCache::new();
        let day = date!(2026 - 08 - 06);

        cache.put(record("USD", "EUR", day, 0.92)).await;
        cache.put(record("EUR", "USD", day, 1.086)).await;

        assert_eq!(cache.len().await, 2);
        assert!(cache.get(code("USD"), code("GBP"), day).await.is_none());
        let reverse = cache.get(code("EUR"), code("USD"), day).await.expect("hit");
        assert_eq!(reverse.rate, 1.086);
    }

    #[tokio::test]
    async fn latest_for_pair_prefers_newest_day() {
        let cache = RateCache::new();

        cache.put(record("USD", "EUR", date!(2026 - 08 - 01), 0.90)).await;
        cache.put(record("USD", "EUR", date!(2026 - 08 - 04), 0.91)).await;
        cache.put(record("USD", "EUR", date!(2026 - 08 - 02), 0.95)).await;

        let latest = cache
            .latest_for_pair(code("USD"), code("EUR"))
            .await
            .expect("fallback record");
        assert_eq!(latest.day, date!(2026 - 08 - 04));
        assert_eq!(latest.rate, 0.91);

        assert!(cache.latest_for_pair(code("GBP"), code("JPY")).await.is_none());
    }

    #[tokio::test]
    async fn clear_empties_everything() {
        let cache = RateCache::new();
        cache.put(record("USD", "EUR", date!(2026 - 08 - 06), 0.92)).await;
        assert!(!cache.is_empty().await);

        cache.clear().await;
        assert!(cache.is_empty().await);
    }
}
