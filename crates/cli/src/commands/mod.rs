//! Subcommand implementations.

pub mod check_config;
pub mod probe;
pub mod wait;

use anyhow::anyhow;
use waitroom::TargetId;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use crate::settings::load_config;

pub async fn dispatch(cli: Cli) -> Result<()> {
	let config = load_config(cli.config.as_deref())?;

	match cli.command {
		Commands::Wait { target, client } => wait::execute(config, parse_target(&target)?, &client).await,
		Commands::Probe { target, timeout_ms } => {
			let timeout = timeout_ms.map_or_else(|| config.ping_timeout(), std::time::Duration::from_millis);
			probe::execute(parse_target(&target)?, timeout).await
		}
		Commands::CheckConfig => check_config::execute(&config),
	}
}

/// Accepts `host:port` targets with a numeric port.
pub fn parse_target(target: &str) -> Result<TargetId> {
	let valid = target
		.rsplit_once(':')
		.is_some_and(|(host, port)| !host.is_empty() && port.parse::<u16>().is_ok());
	if !valid {
		return Err(CliError::Anyhow(anyhow!("target must be host:port, got `{target}`")));
	}
	Ok(TargetId::new(target))
}
