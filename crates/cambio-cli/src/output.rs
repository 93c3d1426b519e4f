use crate::cli::OutputFormat;
use crate::commands::CommandOutput;
use crate::error::CliError;

pub fn render(output: &CommandOutput, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    for warning in &output.warnings {
        eprintln!("warning: {warning}");
    }

    match format {
        OutputFormat::Json => {
            if output.data.is_null() {
                return Ok(());
            }
            let payload = if pretty {
                serde_json::to_string_pretty(&output.data)?
            } else {
                serde_json::to_string(&output.data)?
            };
            println!("{payload}");
        }
        OutputFormat::Table => {
            if !output.table.is_empty() {
                println!("{}", output.table);
            }
        }
    }

    Ok(())
}
