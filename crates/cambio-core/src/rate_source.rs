//! Rate source trait and the uniform source error taxonomy.
//!
//! A rate source answers "what did `base` trade against on this day" with a
//! full quote-currency mapping. The resolver treats every failure mode the
//! same way (transport, non-success status, unparseable body, quote currency
//! absent from an otherwise valid mapping): try the cache fallback.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::domain::day_format;
use crate::CurrencyCode;

/// Identifier of a rate source implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceId {
    ExchangeRateApi,
    Offline,
}

impl SourceId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExchangeRateApi => "exchangerate-api",
            Self::Offline => "offline",
        }
    }
}

impl Display for SourceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::error::Error for SourceId {}

/// Full rate mapping anchored at one base currency and one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pub base: CurrencyCode,
    #[serde(with = "day_format")]
    pub day: Date,
    pub rates: HashMap<CurrencyCode, f64>,
}

impl RateTable {
    pub fn rate_for(&self, quote: CurrencyCode) -> Option<f64> {
        self.rates.get(&quote).copied()
    }
}

/// Source-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Transport,
    Status,
    Parse,
    MissingQuote,
    Unsupported,
    InvalidRequest,
}

/// Structured source error; never escapes the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Transport,
            message: message.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            kind: SourceErrorKind::Status,
            message: format!("upstream returned status {status}"),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Parse,
            message: message.into(),
        }
    }

    pub fn missing_quote(quote: CurrencyCode) -> Self {
        Self {
            kind: SourceErrorKind::MissingQuote,
            message: format!("quote currency '{quote}' absent from returned mapping"),
        }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unsupported,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Transport => "source.transport",
            SourceErrorKind::Status => "source.status",
            SourceErrorKind::Parse => "source.parse",
            SourceErrorKind::MissingQuote => "source.missing_quote",
            SourceErrorKind::Unsupported => "source.unsupported",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Rate source contract.
///
/// Implementations must be `Send + Sync`; methods return boxed futures so the
/// trait stays object-safe behind `Arc<dyn RateSource>`.
pub trait RateSource: Send + Sync {
    fn id(&self) -> SourceId;

    /// Whether the source can serve dated lookups. Sources that cannot must
    /// say so; the series builder refuses the request rather than letting
    /// anything fabricate history.
    fn supports_historical(&self) -> bool;

    /// Fetch the freshest full mapping anchored at `base`.
    fn fetch_latest<'a>(
        &'a self,
        base: CurrencyCode,
    ) -> Pin<Box<dyn Future<Output = Result<RateTable, SourceError>> + Send + 'a>>;

    /// Fetch the mapping anchored at `base` for one past day.
    fn fetch_historical<'a>(
        &'a self,
        base: CurrencyCode,
        day: Date,
    ) -> Pin<Box<dyn Future<Output = Result<RateTable, SourceError>> + Send + 'a>>;
}
