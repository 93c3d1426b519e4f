use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use time::Date;

use crate::clock::{Clock, SystemClock};
use crate::http_client::{HttpClient, HttpRequest, NoopHttpClient};
use crate::rate_source::{RateSource, RateTable, SourceError, SourceId};
use crate::{parse_day, CurrencyCode};

const DEFAULT_BASE_URL: &str = "https://api.exchangerate-api.com/v4";
const REQUEST_TIMEOUT_MS: u64 = 10_000;

/// USD-anchored table backing the deterministic offline mode.
///
/// Values are frozen snapshots, not live data; cross rates are derived by
/// pivoting through USD.
const OFFLINE_USD_RATES: &[(&str, f64)] = &[
    ("USD", 1.0),
    ("EUR", 0.92),
    ("GBP", 0.79),
    ("JPY", 149.50),
    ("CAD", 1.36),
    ("AUD", 1.52),
    ("CHF", 0.88),
    ("CNY", 7.24),
    ("INR", 83.10),
    ("SGD", 1.34),
    ("NZD", 1.64),
    ("MXN", 17.05),
    ("BRL", 4.97),
    ("RUB", 92.40),
    ("ZAR", 18.70),
    ("KRW", 1338.00),
    ("TRY", 32.20),
    ("AED", 3.6725),
    ("SAR", 3.75),
    ("HKD", 7.82),
    ("SEK", 10.45),
    ("NOK", 10.60),
    ("DKK", 6.86),
    ("PLN", 3.98),
];

/// Adapter for exchangerate-api.com, with a deterministic offline mode.
///
/// The offline mode (default, selected whenever the injected transport is a
/// mock) serves the frozen table above and supports dated lookups via a keyed
/// per-day variation. The live free-tier endpoint has no genuine history, so
/// the real mode reports `supports_historical() == false` instead of
/// inventing one.
#[derive(Clone)]
pub struct ExchangeRateApiAdapter {
    http_client: Arc<dyn HttpClient>,
    clock: Arc<dyn Clock>,
    base_url: String,
    use_real_api: bool,
}

impl Default for ExchangeRateApiAdapter {
    fn default() -> Self {
        Self {
            http_client: Arc::new(NoopHttpClient),
            clock: Arc::new(SystemClock),
            base_url: String::from(DEFAULT_BASE_URL),
            use_real_api: false,
        }
    }
}

impl ExchangeRateApiAdapter {
    /// Build with an explicit transport; a non-mock transport selects the
    /// real API.
    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        let use_real_api = !http_client.is_mock();
        Self {
            http_client,
            use_real_api,
            ..Self::default()
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn offline_table(&self, base: CurrencyCode, day: Date, vary_by_day: bool) -> Result<RateTable, SourceError> {
        let usd_base = OFFLINE_USD_RATES
            .iter()
            .find(|(code, _)| *code == base.as_str())
            .map(|(_, rate)| *rate)
            .ok_or_else(|| {
                SourceError::invalid_request(format!("unknown base currency '{base}'"))
            })?;

        let mut rates = HashMap::with_capacity(OFFLINE_USD_RATES.len());
        for (code, usd_rate) in OFFLINE_USD_RATES {
            let quote = CurrencyCode::parse(code)
                .map_err(|e| SourceError::parse(format!("offline table entry '{code}': {e}")))?;
            let mut rate = usd_rate / usd_base;
            if vary_by_day && quote != base {
                rate *= day_variation(day, base.as_str(), code);
            }
            rates.insert(quote, rate);
        }

        Ok(RateTable { base, day, rates })
    }

    async fn fetch_real_latest(&self, base: CurrencyCode) -> Result<RateTable, SourceError> {
        let url = format!(
            "{}/latest/{}",
            self.base_url,
            urlencoding::encode(base.as_str())
        );
        let request = HttpRequest::get(url).with_timeout_ms(REQUEST_TIMEOUT_MS);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| SourceError::transport(format!("transport error: {}", e.message())))?;

        if !response.is_success() {
            return Err(SourceError::status(response.status));
        }

        let parsed: LatestResponse = serde_json::from_str(&response.body)
            .map_err(|e| SourceError::parse(format!("unparseable rate payload: {e}")))?;

        let response_base = CurrencyCode::parse(&parsed.base)
            .map_err(|e| SourceError::parse(format!("bad base in payload: {e}")))?;

        let day = parsed
            .date
            .as_deref()
            .and_then(|raw| parse_day(raw).ok())
            .unwrap_or_else(|| self.clock.today());

        let mut rates = HashMap::with_capacity(parsed.rates.len());
        for (code, rate) in parsed.rates {
            // Upstream mappings occasionally carry retired or non-ISO keys;
            // those are skipped rather than failing the whole table.
            if let Ok(quote) = CurrencyCode::parse(&code) {
                rates.insert(quote, rate);
            }
        }

        Ok(RateTable {
            base: response_base,
            day,
            rates,
        })
    }
}

impl RateSource for ExchangeRateApiAdapter {
    fn id(&self) -> SourceId {
        if self.use_real_api {
            SourceId::ExchangeRateApi
        } else {
            SourceId::Offline
        }
    }

    fn supports_historical(&self) -> bool {
        !self.use_real_api
    }

    fn fetch_latest<'a>(
        &'a self,
        base: CurrencyCode,
    ) -> Pin<Box<dyn Future<Output = Result<RateTable, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            if self.use_real_api {
                self.fetch_real_latest(base).await
            } else {
                self.offline_table(base, self.clock.today(), false)
            }
        })
    }

    fn fetch_historical<'a>(
        &'a self,
        base: CurrencyCode,
        day: Date,
    ) -> Pin<Box<dyn Future<Output = Result<RateTable, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            if self.use_real_api {
                return Err(SourceError::unsupported(
                    "exchangerate-api free tier serves no historical rates",
                ));
            }
            if day > self.clock.today() {
                return Err(SourceError::invalid_request(format!(
                    "historical lookup for future day {}",
                    crate::format_day(day)
                )));
            }
            if day == self.clock.today() {
                self.offline_table(base, day, false)
            } else {
                self.offline_table(base, day, true)
            }
        })
    }
}

/// Keyed per-day variation factor in [0.95, 1.05).
///
/// Deterministic on (day, base, quote) so repeated offline lookups agree.
fn day_variation(day: Date, base: &str, quote: &str) -> f64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in base.bytes().chain(quote.bytes()) {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash ^= day.to_julian_day() as u64;
    hash = hash.wrapping_mul(0x0000_0100_0000_01b3);

    let unit = (hash >> 11) as f64 / (1u64 << 53) as f64;
    0.95 + unit * 0.10
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    base: String,
    date: Option<String>,
    rates: HashMap<String, f64>,
}
