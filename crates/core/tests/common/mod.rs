//! Fakes for the probe and feedback ports.

#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;
use waitroom::{ClientId, CueEmission, Feedback, Probe, ProbeError, ReconnectConfig, StatusMessage, TargetId};

/// Probe that answers from a script, then repeats `fallback` forever.
pub struct ScriptedProbe {
	start: Instant,
	script: Mutex<VecDeque<Result<(), ProbeError>>>,
	fallback: Result<(), ProbeError>,
	delay: Duration,
	attempts: Mutex<Vec<Duration>>,
}

impl ScriptedProbe {
	pub fn new(script: Vec<Result<(), ProbeError>>, fallback: Result<(), ProbeError>) -> Arc<Self> {
		Arc::new(Self {
			start: Instant::now(),
			script: Mutex::new(script.into()),
			fallback,
			delay: Duration::ZERO,
			attempts: Mutex::new(Vec::new()),
		})
	}

	pub fn always_down() -> Arc<Self> {
		Self::new(Vec::new(), Err(unreachable()))
	}

	pub fn up_on_attempt(attempt: usize) -> Arc<Self> {
		let script = (1..attempt).map(|_| Err(unreachable())).collect();
		Self::new(script, Ok(()))
	}

	/// Probe that never answers before `delay` elapses.
	pub fn hanging(delay: Duration) -> Arc<Self> {
		Arc::new(Self {
			start: Instant::now(),
			script: Mutex::new(VecDeque::new()),
			fallback: Ok(()),
			delay,
			attempts: Mutex::new(Vec::new()),
		})
	}

	/// Elapsed time at each probe attempt.
	pub fn attempts(&self) -> Vec<Duration> {
		self.attempts.lock().clone()
	}
}

#[async_trait]
impl Probe for ScriptedProbe {
	async fn probe(&self, _target: &TargetId, _timeout: Duration) -> Result<(), ProbeError> {
		self.attempts.lock().push(self.start.elapsed());
		if !self.delay.is_zero() {
			tokio::time::sleep(self.delay).await;
		}
		let next = self.script.lock().pop_front();
		next.unwrap_or_else(|| self.fallback.clone())
	}
}

/// Probe that succeeds only for targets marked reachable.
#[derive(Default)]
pub struct TargetProbe {
	reachable: Mutex<HashSet<String>>,
}

impl TargetProbe {
	pub fn with_reachable(targets: &[&str]) -> Arc<Self> {
		Arc::new(Self {
			reachable: Mutex::new(targets.iter().map(|t| t.to_string()).collect()),
		})
	}
}

#[async_trait]
impl Probe for TargetProbe {
	async fn probe(&self, target: &TargetId, _timeout: Duration) -> Result<(), ProbeError> {
		if self.reachable.lock().contains(target.as_str()) {
			Ok(())
		} else {
			Err(unreachable())
		}
	}
}

pub fn unreachable() -> ProbeError {
	ProbeError::Unreachable("connection refused".to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
	Message { client: ClientId, title: String },
	Cue { client: ClientId, cue: CueEmission },
	Clear { client: ClientId },
	Handoff { client: ClientId, target: TargetId },
}

/// Records every feedback call with the elapsed time it happened at.
pub struct RecordingFeedback {
	start: Instant,
	events: Mutex<Vec<(Duration, Event)>>,
}

impl RecordingFeedback {
	pub fn new() -> Arc<Self> {
		Arc::new(Self {
			start: Instant::now(),
			events: Mutex::new(Vec::new()),
		})
	}

	pub fn events(&self) -> Vec<(Duration, Event)> {
		self.events.lock().clone()
	}

	pub fn len(&self) -> usize {
		self.events.lock().len()
	}

	pub fn cue_times(&self, name: &str) -> Vec<Duration> {
		self.events
			.lock()
			.iter()
			.filter_map(|(at, event)| match event {
				Event::Cue { cue, .. } if cue.name == name => Some(*at),
				_ => None,
			})
			.collect()
	}

	pub fn cues(&self, name: &str) -> Vec<CueEmission> {
		self.events
			.lock()
			.iter()
			.filter_map(|(_, event)| match event {
				Event::Cue { cue, .. } if cue.name == name => Some(cue.clone()),
				_ => None,
			})
			.collect()
	}

	pub fn titles(&self) -> Vec<(Duration, String)> {
		self.events
			.lock()
			.iter()
			.filter_map(|(at, event)| match event {
				Event::Message { title, .. } => Some((*at, title.clone())),
				_ => None,
			})
			.collect()
	}

	pub fn handoffs(&self) -> Vec<(Duration, ClientId, TargetId)> {
		self.events
			.lock()
			.iter()
			.filter_map(|(at, event)| match event {
				Event::Handoff { client, target } => Some((*at, client.clone(), target.clone())),
				_ => None,
			})
			.collect()
	}

	fn record(&self, event: Event) {
		self.events.lock().push((self.start.elapsed(), event));
	}
}

impl Feedback for RecordingFeedback {
	fn show_message(&self, client: &ClientId, message: &StatusMessage) {
		self.record(Event::Message {
			client: client.clone(),
			title: message.title.clone(),
		});
	}

	fn emit_cue(&self, client: &ClientId, cue: &CueEmission) {
		self.record(Event::Cue {
			client: client.clone(),
			cue: cue.clone(),
		});
	}

	fn clear_display(&self, client: &ClientId) {
		self.record(Event::Clear { client: client.clone() });
	}

	fn finalize_handoff(&self, client: &ClientId, target: &TargetId) {
		self.record(Event::Handoff {
			client: client.clone(),
			target: target.clone(),
		});
	}
}

/// Timing used across tests: 1 s probes, 1 s messages, a 500 ms waiting cue.
pub fn test_config() -> ReconnectConfig {
	let mut config = ReconnectConfig {
		check_interval_ms: 1000,
		join_delay_ms: 500,
		ping_timeout_ms: 200,
		feedback_ready_delay_ms: 1000,
		..Default::default()
	};
	config.messages.show_delay_ticks = 20;
	config.messages.waiting = vec![
		StatusMessage::new("waiting 0", ""),
		StatusMessage::new("waiting 1", ""),
		StatusMessage::new("waiting 2", ""),
	];
	config.messages.connecting = vec![StatusMessage::new("connecting 0", ""), StatusMessage::new("connecting 1", "")];
	config.sounds.waiting.name = "wait".to_string();
	config.sounds.waiting.length_ms = 1000;
	config.sounds.waiting.pitch = 2.0;
	config.sounds.connecting.name = "connect".to_string();
	config
}

pub fn ms(millis: u64) -> Duration {
	Duration::from_millis(millis)
}

pub async fn advance(millis: u64) {
	tokio::time::sleep(ms(millis)).await;
}
