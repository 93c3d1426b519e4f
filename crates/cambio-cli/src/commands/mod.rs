mod convert;
mod currencies;
mod history;
mod interactive;
mod log;
mod rates;
mod store_sync;

use std::sync::Arc;

use serde_json::Value;

use cambio_core::{
    Clock, ConversionEngine, ExchangeRateApiAdapter, HistoricalSeriesBuilder, RateCache,
    RateResolver, RateSource, ReqwestHttpClient, SystemClock,
};
use cambio_store::Store;

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Rendered result of one command: structured data for `--format json`,
/// pre-formatted text for the table view.
pub struct CommandOutput {
    pub data: Value,
    pub table: String,
    pub warnings: Vec<String>,
}

impl CommandOutput {
    pub fn new(data: Value, table: impl Into<String>) -> Self {
        Self {
            data,
            table: table.into(),
            warnings: Vec::new(),
        }
    }

    /// Output that renders nothing (used by the interactive loop, which
    /// prints as it goes).
    pub fn silent() -> Self {
        Self::new(Value::Null, "")
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

/// Shared wiring for all commands: one source, one resolver/engine, and the
/// best-effort durability store.
pub struct AppContext {
    pub source: Arc<dyn RateSource>,
    pub engine: ConversionEngine,
    pub series: HistoricalSeriesBuilder,
    pub store: Option<Store>,
    pub store_warning: Option<String>,
}

impl AppContext {
    fn build(mock: bool) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let source: Arc<dyn RateSource> = if mock {
            Arc::new(ExchangeRateApiAdapter::default().with_clock(Arc::clone(&clock)))
        } else {
            Arc::new(
                ExchangeRateApiAdapter::with_http_client(Arc::new(ReqwestHttpClient::new()))
                    .with_clock(Arc::clone(&clock)),
            )
        };

        let resolver = Arc::new(RateResolver::new(
            Arc::clone(&source),
            RateCache::new(),
            Arc::clone(&clock),
        ));

        // The store is durability, not correctness: failing to open it
        // degrades commands to in-process state with a warning.
        let (store, store_warning) = match Store::open_default() {
            Ok(store) => (Some(store), None),
            Err(error) => (None, Some(format!("conversion store unavailable: {error}"))),
        };

        Self {
            source,
            engine: ConversionEngine::new(Arc::clone(&resolver), clock),
            series: HistoricalSeriesBuilder::new(resolver),
            store,
            store_warning,
        }
    }
}

pub async fn run(cli: &Cli) -> Result<CommandOutput, CliError> {
    let ctx = AppContext::build(cli.mock);

    let mut output = match &cli.command {
        Command::Convert(args) => convert::run(args, &ctx).await?,
        Command::Rates(args) => rates::run(args, &ctx).await?,
        Command::History(args) => history::run(args, &ctx).await?,
        Command::Log(args) => log::run(args, &ctx)?,
        Command::Currencies => currencies::run()?,
        Command::Interactive => interactive::run(&ctx).await?,
    };

    if let Some(warning) = &ctx.store_warning {
        output = output.with_warning(warning.clone());
    }

    Ok(output)
}
