use waitroom::ReconnectConfig;

use crate::error::{CliError, Result};

pub fn execute(config: &ReconnectConfig) -> Result<()> {
	let rendered = serde_json::to_string_pretty(config).map_err(|e| CliError::Anyhow(e.into()))?;
	println!("{rendered}");
	Ok(())
}
