//! Waiting-cue replay scheduling.
//!
//! The replay loop rebases every decision on the last time the cue actually
//! played instead of summing sleeps, so a pitch-scaled cue repeats right when
//! its previous playback finishes even if individual wakeups run late.

use std::time::Duration;

use tokio::time::Instant;

use crate::config::{CueConfig, MIN_PITCH, ReplayTuning};

/// Outcome of one replay loop tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayDecision {
	/// Play the cue now.
	pub play: bool,
	/// Delay until the next tick.
	pub next_in: Duration,
}

/// Replay timing derived from a waiting cue and its tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySchedule {
	period: Option<Duration>,
	slack: Duration,
	min_delay: Duration,
}

impl ReplaySchedule {
	pub fn new(cue: &CueConfig, tuning: &ReplayTuning) -> Self {
		let period = if cue.is_enabled() { replay_period(cue.length_ms, cue.pitch) } else { None };
		Self {
			period,
			slack: Duration::from_millis(tuning.slack_ms),
			min_delay: Duration::from_millis(tuning.min_delay_ms),
		}
	}

	/// Effective replay period, `None` when the cue never repeats.
	pub fn period(&self) -> Option<Duration> {
		self.period
	}

	/// Delay until the first replay check after a playback, `None` when the cue never repeats.
	pub fn after_play(&self) -> Option<Duration> {
		self.period.map(|period| period.max(self.min_delay))
	}

	/// Decides whether to play at `now` given the last actual playback.
	///
	/// Returns `None` when the cue does not repeat and the loop should stop.
	pub fn decide(&self, last_played: Option<Instant>, now: Instant) -> Option<ReplayDecision> {
		let period = self.period?;
		let due = last_played.map_or(now, |at| at + period);
		let play = now + self.slack >= due;
		let due = if play { now + period } else { due };
		Some(ReplayDecision {
			play,
			next_in: due.saturating_duration_since(now).max(self.min_delay),
		})
	}
}

/// `length_ms / max(pitch, MIN_PITCH)`, truncated to whole milliseconds.
pub fn replay_period(length_ms: u64, pitch: f32) -> Option<Duration> {
	if length_ms == 0 {
		return None;
	}
	let millis = (length_ms as f64 / f64::from(pitch.max(MIN_PITCH))) as u64;
	(millis > 0).then(|| Duration::from_millis(millis))
}
