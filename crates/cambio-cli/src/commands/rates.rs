use serde_json::json;

use cambio_core::{format_day, CurrencyCode, COMMON_CURRENCIES};

use crate::cli::RatesArgs;
use crate::commands::{AppContext, CommandOutput};
use crate::error::CliError;

/// The rates board reads the source directly: it is a presentation-level
/// view of the full mapping, not a pairwise resolution.
pub async fn run(args: &RatesArgs, ctx: &AppContext) -> Result<CommandOutput, CliError> {
    let base = CurrencyCode::parse(&args.base)?;

    let table = ctx
        .source
        .fetch_latest(base)
        .await
        .map_err(|error| CliError::Command(error.to_string()))?;

    let mut lines = vec![format!(
        "Rates for {} on {}",
        table.base,
        format_day(table.day)
    )];
    let mut rates = serde_json::Map::new();

    for raw in COMMON_CURRENCIES {
        let quote = CurrencyCode::parse(raw)?;
        if quote == table.base {
            continue;
        }
        if let Some(rate) = table.rate_for(quote) {
            lines.push(format!("  {quote}  {rate:.4}"));
            rates.insert(quote.as_str().to_owned(), json!(rate));
        }
    }

    let data = json!({
        "base": table.base,
        "day": format_day(table.day),
        "rates": rates,
    });

    Ok(CommandOutput::new(data, lines.join("\n")))
}
