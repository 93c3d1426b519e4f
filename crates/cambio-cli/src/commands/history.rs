use cambio_core::{format_day, CurrencyCode};

use crate::cli::HistoryArgs;
use crate::commands::{AppContext, CommandOutput};
use crate::error::CliError;

pub async fn run(args: &HistoryArgs, ctx: &AppContext) -> Result<CommandOutput, CliError> {
    let from = CurrencyCode::parse(&args.from)?;
    let to = CurrencyCode::parse(&args.to)?;

    let series = ctx.series.build(from, to, args.days).await?;

    let mut lines = vec![format!(
        "Historical rates {} -> {} (most recent first)",
        series.base, series.quote
    )];
    for point in &series.points {
        lines.push(format!("  {}  {:.4}", format_day(point.day), point.rate));
    }
    if series.is_empty() {
        lines.push(String::from("  (no data)"));
    }

    let mut output = CommandOutput::new(serde_json::to_value(&series)?, lines.join("\n"));

    let missing = args.days as usize - series.len();
    if missing > 0 {
        output = output.with_warning(format!(
            "{missing} of {} days had no resolvable rate and were omitted",
            args.days
        ));
    }

    Ok(output)
}
