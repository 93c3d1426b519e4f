use serde_json::json;

use cambio_core::COMMON_CURRENCIES;

use crate::commands::CommandOutput;
use crate::error::CliError;

pub fn run() -> Result<CommandOutput, CliError> {
    let mut lines = vec![String::from("Common currency codes")];
    for chunk in COMMON_CURRENCIES.chunks(8) {
        lines.push(format!("  {}", chunk.join("  ")));
    }

    Ok(CommandOutput::new(
        json!(COMMON_CURRENCIES),
        lines.join("\n"),
    ))
}
