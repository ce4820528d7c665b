//! Configuration file loading.
//!
//! The file is JSON in the shape of [`ReconnectConfig`]; missing keys take
//! their defaults. A missing `--config` flag means all defaults.

use std::fs;
use std::path::Path;

use tracing::debug;
use waitroom::ReconnectConfig;

use crate::error::{CliError, Result};

/// Reads, parses and validates the configuration at `path`.
pub fn load_config(path: Option<&Path>) -> Result<ReconnectConfig> {
	let config = match path {
		Some(path) => {
			let content = fs::read_to_string(path).map_err(|source| CliError::ReadConfig {
				path: path.to_path_buf(),
				source,
			})?;
			let config: ReconnectConfig = serde_json::from_str(&content).map_err(|source| CliError::ParseConfig {
				path: path.to_path_buf(),
				source,
			})?;
			debug!(target = "waitroom.cli", path = %path.display(), "loaded config");
			config
		}
		None => ReconnectConfig::default(),
	};

	config.validate()?;
	Ok(config)
}
