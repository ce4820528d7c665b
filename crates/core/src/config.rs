//! Immutable configuration injected into every controller.
//!
//! Loading is the host's job; this module only defines the shape, the
//! defaults, and [`ReconnectConfig::validate`], which must pass before a
//! controller can be built.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::ports::StatusMessage;
use crate::session::Position;

/// Duration of one display tick.
pub const TICK: Duration = Duration::from_millis(50);

/// Lower bound applied to cue pitch when deriving the replay period.
pub const MIN_PITCH: f32 = 0.01;

/// Timing, message and cue settings shared by every session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReconnectConfig {
	pub check_interval_ms: u64,
	pub join_delay_ms: u64,
	pub ping_timeout_ms: u64,
	/// Grace period before the first waiting cue, so the client can finish loading.
	pub feedback_ready_delay_ms: u64,
	/// Promotes probe failure logs from debug to info.
	pub debug: bool,
	/// Position assumed until the first move notification.
	pub spawn: Position,
	pub messages: MessagesConfig,
	pub sounds: SoundsConfig,
}

impl Default for ReconnectConfig {
	fn default() -> Self {
		Self {
			check_interval_ms: 1000,
			join_delay_ms: 1000,
			ping_timeout_ms: 500,
			feedback_ready_delay_ms: 1000,
			debug: false,
			spawn: Position::default(),
			messages: MessagesConfig::default(),
			sounds: SoundsConfig::default(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessagesConfig {
	/// Display interval in [`TICK`] units.
	pub show_delay_ticks: u64,
	pub waiting: Vec<StatusMessage>,
	pub connecting: Vec<StatusMessage>,
}

impl Default for MessagesConfig {
	fn default() -> Self {
		Self {
			show_delay_ticks: 20,
			waiting: vec![StatusMessage::new("Server is restarting", "Please wait...")],
			connecting: vec![StatusMessage::new("Connecting", "Server is back online")],
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SoundsConfig {
	pub waiting: CueConfig,
	pub connecting: CueConfig,
	pub replay: ReplayTuning,
}

/// One audio cue. An empty `name` disables the cue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CueConfig {
	pub name: String,
	/// Audible length at pitch 1.0; 0 means the cue is never replayed.
	pub length_ms: u64,
	pub volume: f32,
	pub pitch: f32,
}

impl Default for CueConfig {
	fn default() -> Self {
		Self {
			name: String::new(),
			length_ms: 0,
			volume: 1.0,
			pitch: 1.0,
		}
	}
}

impl CueConfig {
	pub fn is_enabled(&self) -> bool {
		!self.name.is_empty()
	}
}

/// Knobs for the waiting-cue replay loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReplayTuning {
	/// A replay due within this window is played now.
	pub slack_ms: u64,
	/// Minimum delay between two replay loop ticks.
	pub min_delay_ms: u64,
}

impl Default for ReplayTuning {
	fn default() -> Self {
		Self {
			slack_ms: 25,
			min_delay_ms: 250,
		}
	}
}

impl ReconnectConfig {
	/// Rejects configurations that would fail at tick time.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.check_interval_ms == 0 {
			return Err(ConfigError::ZeroDuration("checkIntervalMs"));
		}
		if self.ping_timeout_ms == 0 {
			return Err(ConfigError::ZeroDuration("pingTimeoutMs"));
		}
		if self.messages.show_delay_ticks == 0 {
			return Err(ConfigError::ZeroDuration("messages.showDelayTicks"));
		}
		if self.sounds.replay.min_delay_ms == 0 {
			return Err(ConfigError::ZeroDuration("sounds.replay.minDelayMs"));
		}
		if self.messages.waiting.is_empty() {
			return Err(ConfigError::EmptySequence("messages.waiting"));
		}
		if self.messages.connecting.is_empty() {
			return Err(ConfigError::EmptySequence("messages.connecting"));
		}
		validate_cue("sounds.waiting", &self.sounds.waiting)?;
		validate_cue("sounds.connecting", &self.sounds.connecting)?;
		Ok(())
	}

	pub fn check_interval(&self) -> Duration {
		Duration::from_millis(self.check_interval_ms)
	}

	pub fn join_delay(&self) -> Duration {
		Duration::from_millis(self.join_delay_ms)
	}

	pub fn ping_timeout(&self) -> Duration {
		Duration::from_millis(self.ping_timeout_ms)
	}

	pub fn feedback_ready_delay(&self) -> Duration {
		Duration::from_millis(self.feedback_ready_delay_ms)
	}

	/// Message display interval: `show_delay_ticks` x [`TICK`].
	pub fn message_interval(&self) -> Duration {
		TICK * u32::try_from(self.messages.show_delay_ticks).unwrap_or(u32::MAX)
	}
}

fn validate_cue(cue: &'static str, config: &CueConfig) -> Result<(), ConfigError> {
	if !config.pitch.is_finite() {
		return Err(ConfigError::InvalidPitch { cue, pitch: config.pitch });
	}
	if !config.volume.is_finite() || config.volume < 0.0 {
		return Err(ConfigError::InvalidVolume { cue, volume: config.volume });
	}
	Ok(())
}
