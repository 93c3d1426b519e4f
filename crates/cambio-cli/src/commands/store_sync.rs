//! Best-effort mirroring of engine results into the durability store.
//!
//! A store failure degrades to a warning on the command output; it never
//! fails the conversion itself.

use cambio_core::{format_day, ConversionRecord, DEFAULT_LEDGER_CAPACITY};
use cambio_store::{NewConversion, Store, StoredRate};

/// Mirror one successful conversion (and the rate it used) into the store.
/// Returns a warning message on failure.
pub fn record_conversion(store: Option<&Store>, record: &ConversionRecord) -> Option<String> {
    let store = store?;

    let timestamp = record.timestamp.format_rfc3339();
    let rate_day = format_day(record.rate_day);

    let result = (|| -> Result<(), cambio_store::StoreError> {
        store.append_conversion(&NewConversion {
            amount: record.amount,
            from_code: record.from.as_str(),
            to_code: record.to.as_str(),
            converted_amount: record.converted_amount,
            rate: record.rate,
            kind: record.kind.as_str(),
            timestamp: &timestamp,
            rate_day: &rate_day,
        })?;
        store.trim_conversions(DEFAULT_LEDGER_CAPACITY)?;

        store.upsert_rate(&StoredRate {
            base: record.from.as_str().to_owned(),
            quote: record.to.as_str().to_owned(),
            day: rate_day.clone(),
            rate: record.rate,
            observed_at: timestamp.clone(),
        })?;
        Ok(())
    })();

    result
        .err()
        .map(|error| format!("conversion history sync failed: {error}"))
}
