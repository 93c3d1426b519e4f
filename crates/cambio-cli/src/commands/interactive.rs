//! Interactive conversion loop: parses lines like `100 USD to EUR`.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};

use cambio_core::{format_day, CurrencyCode};

use crate::commands::{store_sync, AppContext, CommandOutput};
use crate::error::CliError;

const HELP: &str = "\
Commands:
  <amount> <from> to <to>   convert, e.g. '100 USD to EUR'
  history                   show conversions from this session
  help                      show this message
  quit                      exit";

pub async fn run(ctx: &AppContext) -> Result<CommandOutput, CliError> {
    println!("cambio interactive mode");
    println!("Enter conversions like '100 USD to EUR'; 'help' lists commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();

        match input.to_ascii_lowercase().as_str() {
            "" => continue,
            "quit" | "exit" | "q" => break,
            "help" => {
                println!("{HELP}");
                continue;
            }
            "history" => {
                show_session_history(ctx);
                continue;
            }
            _ => {}
        }

        match parse_conversion(input) {
            Some((amount, from, to)) => convert_line(ctx, amount, &from, &to).await,
            None => {
                println!("error: expected '<amount> <from> to <to>', e.g. '100 USD to EUR'");
            }
        }
    }

    println!("Goodbye!");
    Ok(CommandOutput::silent())
}

fn prompt() -> Result<(), CliError> {
    print!("> ");
    std::io::stdout().flush()?;
    Ok(())
}

fn parse_conversion(input: &str) -> Option<(f64, String, String)> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    if parts.len() != 4 || !parts[2].eq_ignore_ascii_case("to") {
        return None;
    }
    let amount = parts[0].parse::<f64>().ok()?;
    Some((amount, parts[1].to_owned(), parts[3].to_owned()))
}

async fn convert_line(ctx: &AppContext, amount: f64, from: &str, to: &str) {
    let (from, to) = match (CurrencyCode::parse(from), CurrencyCode::parse(to)) {
        (Ok(from), Ok(to)) => (from, to),
        (Err(error), _) | (_, Err(error)) => {
            println!("error: {error}");
            return;
        }
    };

    match ctx.engine.convert(amount, from, to, None).await {
        Ok(record) => {
            println!(
                "{} {} = {:.2} {}",
                record.amount, record.from, record.converted_amount, record.to
            );
            println!(
                "rate: 1 {} = {:.4} {} ({})",
                record.from,
                record.rate,
                record.to,
                format_day(record.rate_day)
            );
            if let Some(warning) = store_sync::record_conversion(ctx.store.as_ref(), &record) {
                eprintln!("warning: {warning}");
            }
        }
        Err(error) => println!("error: {error}"),
    }
}

fn show_session_history(ctx: &AppContext) {
    let records = ctx.engine.ledger().recent(10);
    if records.is_empty() {
        println!("no conversions this session");
        return;
    }
    for record in records {
        println!(
            "{}  {} {} -> {:.2} {} (rate {:.4}, {})",
            record.timestamp,
            record.amount,
            record.from,
            record.converted_amount,
            record.to,
            record.rate,
            record.kind.as_str(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::parse_conversion;

    #[test]
    fn parses_well_formed_conversion_lines() {
        let (amount, from, to) = parse_conversion("100 usd to eur").expect("must parse");
        assert_eq!(amount, 100.0);
        assert_eq!(from, "usd");
        assert_eq!(to, "eur");
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(parse_conversion("convert please").is_none());
        assert!(parse_conversion("100 usd eur").is_none());
        assert!(parse_conversion("x usd to eur").is_none());
    }
}
