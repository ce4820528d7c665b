//! Host-supplied collaborators consumed by the session controller.
//!
//! The controller never talks to the network or to the client directly. It
//! asks a [`Probe`] whether the target answers and tells a [`Feedback`] sink
//! what the waiting client should see and hear.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProbeError;
use crate::session::Position;

/// Identifier of a waiting client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(String);

impl ClientId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ClientId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Identifier of the backend endpoint a session waits for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetId(String);

impl TargetId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for TargetId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Title/subtitle pair shown to a waiting client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusMessage {
	pub title: String,
	#[serde(default)]
	pub subtitle: String,
}

impl StatusMessage {
	pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
		Self {
			title: title.into(),
			subtitle: subtitle.into(),
		}
	}
}

/// A positioned audio cue ready to be played to one client.
#[derive(Debug, Clone, PartialEq)]
pub struct CueEmission {
	pub name: String,
	pub position: Position,
	pub volume: f32,
	pub pitch: f32,
}

/// Availability check against a backend target.
///
/// Implementations may complete on any worker; the controller delivers the
/// result back into the session's own task before acting on it.
#[async_trait]
pub trait Probe: Send + Sync {
	/// Returns `Ok(())` when `target` answered within `timeout`.
	async fn probe(&self, target: &TargetId, timeout: Duration) -> Result<(), ProbeError>;
}

/// Presentation sink for a waiting client.
///
/// Calls are fire-and-forget and must not block the caller.
pub trait Feedback: Send + Sync {
	fn show_message(&self, client: &ClientId, message: &StatusMessage);

	/// Plays `cue` to `client`. Implementations treat an empty cue name as a no-op.
	fn emit_cue(&self, client: &ClientId, cue: &CueEmission);

	fn clear_display(&self, client: &ClientId);

	/// Moves `client` from the waiting room to `target`.
	fn finalize_handoff(&self, client: &ClientId, target: &TargetId);
}
