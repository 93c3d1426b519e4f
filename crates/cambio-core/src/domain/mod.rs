//! Domain types for cambio: validated currency codes, day-granular rate
//! records, conversion records and historical series.
//!
//! Construction validates invariants (codes are 3 uppercase letters, rates
//! are positive and finite); invalid states are unrepresentable below the
//! boundary.

mod currency;
mod date;
mod models;

pub use currency::{CurrencyCode, COMMON_CURRENCIES};
pub use date::{day_format, format_day, parse_day, RateDate, UtcTimestamp};
pub use models::{round2, ConversionKind, ConversionRecord, RateRecord, RateSeries, SeriesPoint};

pub(crate) use models::validate_amount;
