//! Error types for the waiting room core.

use std::time::Duration;

use thiserror::Error;

use crate::ports::ClientId;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ReconnectError>;

/// Errors surfaced to the host by controllers and the waiting room.
#[derive(Debug, Error)]
pub enum ReconnectError {
	#[error("invalid configuration: {0}")]
	Config(#[from] ConfigError),

	#[error("session already activated")]
	AlreadyActivated,

	#[error("sessions must be activated from within a tokio runtime")]
	NoRuntime,

	#[error("client {0} already has a live session")]
	DuplicateClient(ClientId),
}

/// Configuration rejected at construction time.
///
/// Every variant is fatal: a controller is never built from a configuration
/// that fails [`ReconnectConfig::validate`](crate::ReconnectConfig::validate).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
	#[error("message sequence `{0}` must contain at least one entry")]
	EmptySequence(&'static str),

	#[error("`{0}` must be greater than zero")]
	ZeroDuration(&'static str),

	#[error("cue `{cue}` has non-finite pitch {pitch}")]
	InvalidPitch { cue: &'static str, pitch: f32 },

	#[error("cue `{cue}` has invalid volume {volume}")]
	InvalidVolume { cue: &'static str, volume: f32 },
}

/// Failure reported by a [`Probe`](crate::Probe), always recovered by retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
	#[error("probe timed out after {}ms", .0.as_millis())]
	Timeout(Duration),

	#[error("target unreachable: {0}")]
	Unreachable(String),
}
