//! Per-session deadline table for the self-rescheduling loops.

use std::time::Duration;

use tokio::time::Instant;

/// Loops driven by a session controller, in the order ties are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timer {
	Probe,
	Messages,
	FirstWaitCue,
	WaitCue,
	Finalize,
}

impl Timer {
	const ALL: [Timer; 5] = [Timer::Probe, Timer::Messages, Timer::FirstWaitCue, Timer::WaitCue, Timer::Finalize];

	fn slot(self) -> usize {
		match self {
			Timer::Probe => 0,
			Timer::Messages => 1,
			Timer::FirstWaitCue => 2,
			Timer::WaitCue => 3,
			Timer::Finalize => 4,
		}
	}
}

/// At most one pending deadline per loop, so a loop's ticks never overlap.
#[derive(Debug, Default)]
pub struct Timers {
	deadlines: [Option<Instant>; 5],
}

impl Timers {
	/// Arms `timer` to fire `after` from `now`, replacing any pending deadline.
	pub fn schedule(&mut self, timer: Timer, now: Instant, after: Duration) {
		self.deadlines[timer.slot()] = Some(now + after);
	}

	#[cfg(test)]
	pub fn is_armed(&self, timer: Timer) -> bool {
		self.deadlines[timer.slot()].is_some()
	}

	/// Earliest pending deadline, if any.
	pub fn next_deadline(&self) -> Option<Instant> {
		self.deadlines.iter().flatten().min().copied()
	}

	/// Disarms and returns the first loop whose deadline is at or before `now`.
	pub fn pop_due(&mut self, now: Instant) -> Option<Timer> {
		let due = Timer::ALL
			.into_iter()
			.filter(|timer| self.deadlines[timer.slot()].is_some_and(|at| at <= now))
			.min_by_key(|timer| self.deadlines[timer.slot()])?;
		self.deadlines[due.slot()] = None;
		Some(due)
	}

	pub fn clear(&mut self) {
		self.deadlines = [None; 5];
	}

	#[cfg(test)]
	pub fn is_empty(&self) -> bool {
		self.deadlines.iter().all(Option::is_none)
	}
}
