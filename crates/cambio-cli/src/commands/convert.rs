use cambio_core::{format_day, parse_day, CurrencyCode};

use crate::cli::ConvertArgs;
use crate::commands::{store_sync, AppContext, CommandOutput};
use crate::error::CliError;

pub async fn run(args: &ConvertArgs, ctx: &AppContext) -> Result<CommandOutput, CliError> {
    let from = CurrencyCode::parse(&args.from)?;
    let to = CurrencyCode::parse(&args.to)?;
    let date = args.date.as_deref().map(parse_day).transpose()?;

    let record = ctx.engine.convert(args.amount, from, to, date).await?;

    let table = format!(
        "{} {} = {:.2} {}\nRate: 1 {} = {:.4} {} ({}, {})",
        record.amount,
        record.from,
        record.converted_amount,
        record.to,
        record.from,
        record.rate,
        record.to,
        format_day(record.rate_day),
        record.kind.as_str(),
    );

    let mut output = CommandOutput::new(serde_json::to_value(record)?, table);

    let requested_day = date.unwrap_or_else(|| ctx.engine.resolver().today());
    if record.rate_day != requested_day {
        output = output.with_warning(format!(
            "rate source unreachable; used the rate observed on {}",
            format_day(record.rate_day)
        ));
    }

    if let Some(warning) = store_sync::record_conversion(ctx.store.as_ref(), &record) {
        output = output.with_warning(warning);
    }

    Ok(output)
}
