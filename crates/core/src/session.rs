//! Per-client session record and its state transitions.
//!
//! A [`Session`] is owned by exactly one controller task. The methods here are
//! the only way its fields change, which keeps the transition rules in one
//! place and testable without timers.

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::config::MessagesConfig;
use crate::ports::{StatusMessage, TargetId};

/// Client coordinate used to place audio cues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
	pub x: f64,
	pub y: f64,
	pub z: f64,
}

impl Position {
	pub fn new(x: f64, y: f64, z: f64) -> Self {
		Self { x, y, z }
	}
}

/// Lifecycle of a waiting client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
	Waiting,
	Connecting,
	Ended,
}

impl SessionState {
	pub fn is_ended(self) -> bool {
		self == SessionState::Ended
	}
}

#[derive(Debug)]
pub struct Session {
	target: TargetId,
	state: SessionState,
	position: Position,
	message_cursor: usize,
	connect_cue_played: bool,
	handed_off: bool,
	last_wait_cue_at: Option<Instant>,
}

impl Session {
	pub fn new(target: TargetId, spawn: Position) -> Self {
		Self {
			target,
			state: SessionState::Waiting,
			position: spawn,
			message_cursor: 0,
			connect_cue_played: false,
			handed_off: false,
			last_wait_cue_at: None,
		}
	}

	pub fn target(&self) -> &TargetId {
		&self.target
	}

	pub fn state(&self) -> SessionState {
		self.state
	}

	pub fn position(&self) -> Position {
		self.position
	}

	pub fn last_wait_cue_at(&self) -> Option<Instant> {
		self.last_wait_cue_at
	}

	pub fn move_to(&mut self, position: Position) {
		self.position = position;
	}

	/// Enters `Connecting` from `Waiting`. Returns `false` for any other state.
	pub fn begin_connecting(&mut self) -> bool {
		if self.state != SessionState::Waiting {
			return false;
		}
		self.state = SessionState::Connecting;
		self.message_cursor = 0;
		true
	}

	/// Returns the message to display for the current state and advances the cursor.
	///
	/// `None` once the session has ended.
	pub fn next_message<'a>(&mut self, messages: &'a MessagesConfig) -> Option<&'a StatusMessage> {
		let sequence = match self.state {
			SessionState::Waiting => &messages.waiting,
			SessionState::Connecting => &messages.connecting,
			SessionState::Ended => return None,
		};
		if sequence.is_empty() {
			return None;
		}
		let index = self.message_cursor % sequence.len();
		self.message_cursor = (index + 1) % sequence.len();
		sequence.get(index)
	}

	/// Claims the one-shot connect cue. Returns `true` only for the first caller.
	pub fn claim_connect_cue(&mut self) -> bool {
		if self.connect_cue_played {
			return false;
		}
		self.connect_cue_played = true;
		true
	}

	pub fn record_wait_cue(&mut self, at: Instant) {
		self.last_wait_cue_at = Some(at);
	}

	/// Marks the session finished after a completed handoff.
	pub fn complete(&mut self) {
		self.state = SessionState::Ended;
		self.handed_off = true;
	}

	/// Ends the session and resets the per-episode cue bookkeeping.
	pub fn end(&mut self) {
		self.state = SessionState::Ended;
		self.connect_cue_played = false;
		self.last_wait_cue_at = None;
	}

	pub fn snapshot(&self) -> SessionSnapshot {
		SessionSnapshot {
			state: self.state,
			position: self.position,
			message_cursor: self.message_cursor,
			connect_cue_played: self.connect_cue_played,
			handed_off: self.handed_off,
			last_wait_cue_at: self.last_wait_cue_at,
		}
	}
}

/// Read-only copy of a session published after every mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
	pub state: SessionState,
	pub position: Position,
	pub message_cursor: usize,
	pub connect_cue_played: bool,
	/// Set once the client was passed to its target server.
	pub handed_off: bool,
	pub last_wait_cue_at: Option<Instant>,
}
