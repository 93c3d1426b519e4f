//! # Cambio Core
//!
//! Rate resolution, caching and conversion engine for the cambio currency
//! toolkit.
//!
//! ## Overview
//!
//! - **Canonical domain types** for currency codes, day-granular rate
//!   records, conversion records and historical series
//! - **Rate source contract** for upstream adapters, with a uniform source
//!   error taxonomy
//! - **Resolution policy**: fresh fetch → same-day cache reuse →
//!   stale-fallback, and nothing beyond that single fallback step
//! - **Bounded conversion ledger** fed by the engine on every successful
//!   conversion
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Rate source adapters (exchangerate-api + offline mode) |
//! | [`cache`] | Day-granular in-memory rate cache |
//! | [`clock`] | Injected time capability |
//! | [`domain`] | Domain models (CurrencyCode, RateRecord, ConversionRecord) |
//! | [`engine`] | Conversion engine and its ledger |
//! | [`error`] | Validation and core error types |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`ledger`] | Bounded conversion log |
//! | [`rate_source`] | Upstream source contract |
//! | [`resolver`] | Fetch/cache/fallback resolution policy |
//! | [`series`] | Historical series builder |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cambio_core::{
//!     ConversionEngine, CurrencyCode, ExchangeRateApiAdapter, RateCache, RateResolver,
//!     SystemClock,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let clock = Arc::new(SystemClock);
//!     let source = Arc::new(ExchangeRateApiAdapter::default());
//!     let resolver = Arc::new(RateResolver::new(source, RateCache::new(), clock.clone()));
//!     let engine = ConversionEngine::new(resolver, clock);
//!
//!     let record = engine
//!         .convert(100.0, CurrencyCode::parse("USD")?, CurrencyCode::parse("EUR")?, None)
//!         .await?;
//!     println!("{} {} = {} {}", record.amount, record.from, record.converted_amount, record.to);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return `Result` with structured errors. Source failures
//! never escape the resolver; callers see either a resolved rate (possibly
//! stale, flagged by `Freshness`) or `RateUnavailable`.

pub mod adapters;
pub mod cache;
pub mod clock;
pub mod domain;
pub mod engine;
pub mod error;
pub mod http_client;
pub mod ledger;
pub mod rate_source;
pub mod resolver;
pub mod series;

// Re-export commonly used types at crate root for convenience

// Adapter implementations
pub use adapters::ExchangeRateApiAdapter;

// Caching
pub use cache::RateCache;

// Clock capability
pub use clock::{Clock, ManualClock, SystemClock};

// Domain models
pub use domain::{
    day_format, format_day, parse_day, round2, ConversionKind, ConversionRecord, CurrencyCode,
    RateDate, RateRecord, RateSeries, SeriesPoint, UtcTimestamp, COMMON_CURRENCIES,
};

// Engine
pub use engine::{ConversionEngine, ConvertError};

// Error types
pub use error::{CoreError, ValidationError};

// HTTP client types
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient};

// Ledger
pub use ledger::{ConversionLedger, DEFAULT_LEDGER_CAPACITY};

// Rate source contract
pub use rate_source::{RateSource, RateTable, SourceError, SourceErrorKind, SourceId};

// Resolution policy
pub use resolver::{Freshness, RateResolver, Resolved, ResolveError, DEFAULT_SOURCE_SPACING};

// Series builder
pub use series::{HistoricalSeriesBuilder, SeriesError, MAX_LOOKBACK_DAYS};
