use std::path::PathBuf;

use thiserror::Error;
use waitroom::{ConfigError, ProbeError, ReconnectError};

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	#[error("failed to read config {path}: {source}")]
	ReadConfig {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to parse config {path}: {source}")]
	ParseConfig {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("invalid config: {0}")]
	InvalidConfig(#[from] ConfigError),

	#[error(transparent)]
	Reconnect(#[from] ReconnectError),

	#[error("{target}: {source}")]
	Probe {
		target: String,
		#[source]
		source: ProbeError,
	},

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Anyhow(#[from] anyhow::Error),
}
