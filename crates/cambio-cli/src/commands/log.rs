use serde_json::json;

use crate::cli::LogArgs;
use crate::commands::{AppContext, CommandOutput};
use crate::error::CliError;

pub fn run(args: &LogArgs, ctx: &AppContext) -> Result<CommandOutput, CliError> {
    let store = ctx
        .store
        .as_ref()
        .ok_or_else(|| CliError::Command(String::from("conversion history store unavailable")))?;

    if args.clear {
        store.clear_conversions()?;
        return Ok(CommandOutput::new(
            json!({"cleared": true}),
            "Conversion history cleared",
        ));
    }

    let rows = store.recent_conversions(args.limit)?;

    let mut lines = vec![String::from("Recent conversions (most recent first)")];
    for row in &rows {
        lines.push(format!(
            "  {}  {} {} -> {:.2} {} (rate {:.4}, {})",
            row.timestamp,
            row.amount,
            row.from_code,
            row.converted_amount,
            row.to_code,
            row.rate,
            row.kind,
        ));
    }
    if rows.is_empty() {
        lines.push(String::from("  (empty)"));
    }

    Ok(CommandOutput::new(serde_json::to_value(rows)?, lines.join("\n")))
}
