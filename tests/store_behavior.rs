//! Behavior-driven tests for the durability layer fed with engine records.

use cambio_tests::{code, day, ts};
use tempfile::tempdir;

use cambio_core::{format_day, ConversionKind, ConversionRecord};
use cambio_store::{NewConversion, Store, StoreConfig, StoredRate};

fn open_temp_store(temp: &tempfile::TempDir) -> Store {
    Store::open(StoreConfig {
        cambio_home: temp.path().to_path_buf(),
        db_path: temp.path().join("cambio.duckdb"),
        max_pool_size: 2,
    })
    .expect("store open")
}

fn engine_record(amount: f64, stamp: &str) -> ConversionRecord {
    ConversionRecord {
        amount,
        from: code("USD"),
        to: code("EUR"),
        converted_amount: cambio_core::round2(amount * 0.92),
        rate: 0.92,
        kind: ConversionKind::Realtime,
        timestamp: ts(stamp),
        rate_day: day("2026-08-06"),
    }
}

fn mirror(store: &Store, record: &ConversionRecord) {
    let timestamp = record.timestamp.format_rfc3339();
    let rate_day = format_day(record.rate_day);
    store
        .append_conversion(&NewConversion {
            amount: record.amount,
            from_code: record.from.as_str(),
            to_code: record.to.as_str(),
            converted_amount: record.converted_amount,
            rate: record.rate,
            kind: record.kind.as_str(),
            timestamp: &timestamp,
            rate_day: &rate_day,
        })
        .expect("append");
}

#[test]
fn when_engine_records_are_mirrored_they_read_back_most_recent_first() {
    let temp = tempdir().expect("tempdir");
    let store = open_temp_store(&temp);

    for (amount, stamp) in [
        (10.0, "2026-08-06T09:00:00Z"),
        (20.0, "2026-08-06T10:00:00Z"),
        (30.0, "2026-08-06T11:00:00Z"),
    ] {
        mirror(&store, &engine_record(amount, stamp));
    }

    let rows = store.recent_conversions(10).expect("query");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].amount, 30.0);
    assert_eq!(rows[0].kind, ConversionKind::Realtime.as_str());
    assert_eq!(rows[2].timestamp, "2026-08-06T09:00:00Z");

    // The stored kind maps back onto the domain enum.
    assert!(rows
        .iter()
        .all(|row| ConversionKind::parse(&row.kind).is_some()));
}

#[test]
fn when_history_outgrows_capacity_trim_drops_the_oldest_rows() {
    let temp = tempdir().expect("tempdir");
    let store = open_temp_store(&temp);

    for amount in 1..=6 {
        mirror(&store, &engine_record(f64::from(amount), "2026-08-06T09:00:00Z"));
    }

    let removed = store.trim_conversions(4).expect("trim");
    assert_eq!(removed, 2);

    let rows = store.recent_conversions(10).expect("query");
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0].amount, 6.0);
    assert_eq!(rows[3].amount, 3.0);
}

#[test]
fn when_the_process_restarts_history_and_rates_survive() {
    let temp = tempdir().expect("tempdir");
    let config = StoreConfig {
        cambio_home: temp.path().to_path_buf(),
        db_path: temp.path().join("cambio.duckdb"),
        max_pool_size: 2,
    };

    {
        let store = Store::open(config.clone()).expect("store open");
        mirror(&store, &engine_record(10.0, "2026-08-06T09:00:00Z"));
        store
            .upsert_rate(&StoredRate {
                base: "USD".into(),
                quote: "EUR".into(),
                day: "2026-08-06".into(),
                rate: 0.92,
                observed_at: "2026-08-06T09:00:00Z".into(),
            })
            .expect("upsert");
    }

    let reopened = Store::open(config).expect("store reopen");
    assert_eq!(reopened.conversion_count().expect("count"), 1);

    let rate = reopened
        .lookup_rate("USD", "EUR", "2026-08-06")
        .expect("lookup")
        .expect("row present");
    assert_eq!(rate.rate, 0.92);
}

#[test]
fn when_the_same_day_is_observed_twice_the_later_rate_wins() {
    let temp = tempdir().expect("tempdir");
    let store = open_temp_store(&temp);

    for (rate, stamp) in [(0.92, "2026-08-06T09:00:00Z"), (0.93, "2026-08-06T16:00:00Z")] {
        store
            .upsert_rate(&StoredRate {
                base: "USD".into(),
                quote: "EUR".into(),
                day: "2026-08-06".into(),
                rate,
                observed_at: stamp.into(),
            })
            .expect("upsert");
    }

    let row = store
        .lookup_rate("USD", "EUR", "2026-08-06")
        .expect("lookup")
        .expect("row present");
    assert_eq!(row.rate, 0.93);
    assert_eq!(row.observed_at, "2026-08-06T16:00:00Z");
}
