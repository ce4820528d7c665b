//! Reconnect session controller.
//!
//! Each controller owns one [`Session`] inside a dedicated tokio task. The
//! probe loop, the message loop, the waiting-cue loop and the one-shot
//! finalize step are deadlines in that task's [`Timers`] table; move and end
//! notifications arrive over a channel, and probe results come back as the
//! output of a spawned probe task. Everything that touches the session runs
//! on that one task, so no two callbacks ever interleave mid-update.
//!
//! # Lifecycle
//!
//! ```text
//! Waiting --probe ok--> Connecting --join delay--> handoff (Ended)
//!    \                      \
//!     `------- on_end ------`---------------------> Ended
//! ```
//!
//! Every tick checks the session state before doing anything, and the timer
//! table is dropped as soon as the session ends, so a late wakeup is a no-op.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info};

use crate::config::ReconnectConfig;
use crate::cue::ReplaySchedule;
use crate::error::{ProbeError, ReconnectError, Result};
use crate::ports::{ClientId, CueEmission, Feedback, Probe, TargetId};
use crate::session::{Position, Session, SessionSnapshot, SessionState};
use crate::timers::{Timer, Timers};

enum Command {
	Move(Position),
	End,
}

/// Host-facing handle for one waiting client.
///
/// Dropping the handle tears the session down the same way [`on_end`](Self::on_end) does.
pub struct ReconnectController {
	client: ClientId,
	target: TargetId,
	commands: mpsc::UnboundedSender<Command>,
	snapshots: watch::Receiver<SessionSnapshot>,
	pending: Option<SessionTask>,
	task: Option<JoinHandle<()>>,
}

impl ReconnectController {
	/// Builds a controller for `client` waiting on `target`.
	///
	/// Fails with [`ReconnectError::Config`] when `config` does not validate;
	/// nothing is scheduled until [`activate`](Self::activate).
	pub fn new(
		config: Arc<ReconnectConfig>,
		client: ClientId,
		target: TargetId,
		probe: Arc<dyn Probe>,
		feedback: Arc<dyn Feedback>,
	) -> Result<Self> {
		config.validate()?;

		let session = Session::new(target.clone(), config.spawn);
		let (commands_tx, commands_rx) = mpsc::unbounded_channel();
		let (snapshots_tx, snapshots_rx) = watch::channel(session.snapshot());
		let replay = ReplaySchedule::new(&config.sounds.waiting, &config.sounds.replay);

		Ok(Self {
			client: client.clone(),
			target,
			commands: commands_tx,
			snapshots: snapshots_rx,
			pending: Some(SessionTask {
				client,
				config,
				probe,
				feedback,
				session,
				timers: Timers::default(),
				replay,
				probe_task: None,
				commands: commands_rx,
				snapshots: snapshots_tx,
			}),
			task: None,
		})
	}

	pub fn client(&self) -> &ClientId {
		&self.client
	}

	pub fn target(&self) -> &TargetId {
		&self.target
	}

	/// Starts the session task on the current tokio runtime.
	///
	/// Returns [`ReconnectError::NoRuntime`] outside a tokio runtime and
	/// [`ReconnectError::AlreadyActivated`] on a second call.
	pub fn activate(&mut self) -> Result<()> {
		if self.pending.is_none() {
			return Err(ReconnectError::AlreadyActivated);
		}
		let runtime = tokio::runtime::Handle::try_current().map_err(|_| ReconnectError::NoRuntime)?;
		let task = self.pending.take().ok_or(ReconnectError::AlreadyActivated)?;
		self.task = Some(runtime.spawn(task.run()));
		Ok(())
	}

	/// Records the client's latest position for upcoming cues.
	pub fn on_move(&self, x: f64, y: f64, z: f64) {
		let _ = self.commands.send(Command::Move(Position::new(x, y, z)));
	}

	/// Ends the session. Pending ticks become no-ops.
	pub fn on_end(&self) {
		let _ = self.commands.send(Command::End);
	}

	/// Latest published copy of the session.
	pub fn snapshot(&self) -> SessionSnapshot {
		self.snapshots.borrow().clone()
	}

	/// Subscribes to session snapshots.
	pub fn watch(&self) -> watch::Receiver<SessionSnapshot> {
		self.snapshots.clone()
	}

	/// `true` once the session task has exited.
	pub fn is_finished(&self) -> bool {
		self.task.as_ref().is_some_and(JoinHandle::is_finished)
	}

	/// Waits for the session task to exit. Returns immediately if never activated.
	pub async fn finished(&mut self) {
		if let Some(task) = self.task.take() {
			let _ = task.await;
		}
	}
}

struct SessionTask {
	client: ClientId,
	config: Arc<ReconnectConfig>,
	probe: Arc<dyn Probe>,
	feedback: Arc<dyn Feedback>,
	session: Session,
	timers: Timers,
	replay: ReplaySchedule,
	probe_task: Option<JoinHandle<std::result::Result<(), ProbeError>>>,
	commands: mpsc::UnboundedReceiver<Command>,
	snapshots: watch::Sender<SessionSnapshot>,
}

impl SessionTask {
	async fn run(mut self) {
		self.activate(Instant::now());

		while !self.session.state().is_ended() {
			let deadline = self.timers.next_deadline();
			tokio::select! {
				biased;

				command = self.commands.recv() => match command {
					Some(Command::Move(position)) => self.session.move_to(position),
					Some(Command::End) | None => self.end(),
				},
				outcome = probe_outcome(&mut self.probe_task), if self.probe_task.is_some() => {
					self.probe_task = None;
					self.on_probe_outcome(outcome);
				}
				_ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
					let now = Instant::now();
					while let Some(timer) = self.timers.pop_due(now) {
						self.fire(timer, now);
					}
				}
			}

			self.publish();
		}

		debug!(
			target = "waitroom.session",
			client = %self.client,
			server = %self.session.target(),
			"session task exiting"
		);
	}

	fn activate(&mut self, now: Instant) {
		debug!(
			target = "waitroom.session",
			client = %self.client,
			server = %self.session.target(),
			"session activated"
		);
		self.timers.schedule(Timer::Messages, now, std::time::Duration::ZERO);
		self.timers.schedule(Timer::Probe, now, self.config.check_interval());
		self.timers.schedule(Timer::FirstWaitCue, now, self.config.feedback_ready_delay());
	}

	fn fire(&mut self, timer: Timer, now: Instant) {
		match timer {
			Timer::Probe => self.probe_tick(),
			Timer::Messages => self.message_tick(now),
			Timer::FirstWaitCue => self.first_wait_cue(now),
			Timer::WaitCue => self.waiting_cue_tick(now),
			Timer::Finalize => self.finalize(),
		}
	}

	fn probe_tick(&mut self) {
		if self.session.state() != SessionState::Waiting || self.probe_task.is_some() {
			return;
		}

		let probe = Arc::clone(&self.probe);
		let target = self.session.target().clone();
		let timeout = self.config.ping_timeout();
		self.probe_task = Some(tokio::spawn(async move {
			match tokio::time::timeout(timeout, probe.probe(&target, timeout)).await {
				Ok(result) => result,
				Err(_) => Err(ProbeError::Timeout(timeout)),
			}
		}));
	}

	fn on_probe_outcome(&mut self, outcome: std::result::Result<(), ProbeError>) {
		if self.session.state() != SessionState::Waiting {
			return;
		}

		let now = Instant::now();
		match outcome {
			Err(err) => {
				if self.config.debug {
					info!(
						target = "waitroom.session",
						client = %self.client,
						server = %self.session.target(),
						error = %err,
						"can't reach server"
					);
				} else {
					debug!(
						target = "waitroom.session",
						client = %self.client,
						server = %self.session.target(),
						error = %err,
						"can't reach server"
					);
				}
				self.timers.schedule(Timer::Probe, now, self.config.check_interval());
			}
			Ok(()) => {
				self.session.begin_connecting();
				info!(
					target = "waitroom.session",
					client = %self.client,
					server = %self.session.target(),
					join_delay_ms = self.config.join_delay_ms,
					"server is reachable; connecting"
				);
				self.timers.schedule(Timer::Finalize, now, self.config.join_delay());
			}
		}
	}

	fn message_tick(&mut self, now: Instant) {
		let Some(message) = self.session.next_message(&self.config.messages) else {
			return;
		};
		self.feedback.show_message(&self.client, message);
		self.timers.schedule(Timer::Messages, now, self.config.message_interval());
	}

	fn first_wait_cue(&mut self, now: Instant) {
		if self.session.state() != SessionState::Waiting {
			return;
		}
		if !self.config.sounds.waiting.is_enabled() {
			return;
		}
		self.emit_wait_cue(now);
		if let Some(next_in) = self.replay.after_play() {
			self.timers.schedule(Timer::WaitCue, now, next_in);
		}
	}

	fn waiting_cue_tick(&mut self, now: Instant) {
		if self.session.state() != SessionState::Waiting {
			return;
		}
		let Some(decision) = self.replay.decide(self.session.last_wait_cue_at(), now) else {
			return;
		};
		if decision.play {
			self.emit_wait_cue(now);
		}
		self.timers.schedule(Timer::WaitCue, now, decision.next_in);
	}

	fn emit_wait_cue(&mut self, now: Instant) {
		let cue = &self.config.sounds.waiting;
		self.feedback.emit_cue(
			&self.client,
			&CueEmission {
				name: cue.name.clone(),
				position: self.session.position(),
				volume: cue.volume,
				pitch: cue.pitch,
			},
		);
		self.session.record_wait_cue(now);
	}

	fn finalize(&mut self) {
		if self.session.state().is_ended() {
			return;
		}

		let cue = &self.config.sounds.connecting;
		if self.session.claim_connect_cue() && cue.is_enabled() {
			self.feedback.emit_cue(
				&self.client,
				&CueEmission {
					name: cue.name.clone(),
					position: self.session.position(),
					volume: cue.volume,
					pitch: cue.pitch,
				},
			);
		}

		self.feedback.clear_display(&self.client);
		self.feedback.finalize_handoff(&self.client, self.session.target());
		self.session.complete();
		self.timers.clear();

		info!(
			target = "waitroom.session",
			client = %self.client,
			server = %self.session.target(),
			"client handed off"
		);
	}

	fn end(&mut self) {
		if self.session.state().is_ended() {
			return;
		}
		self.session.end();
		self.timers.clear();
		if let Some(task) = self.probe_task.take() {
			task.abort();
		}
		debug!(
			target = "waitroom.session",
			client = %self.client,
			server = %self.session.target(),
			"session ended"
		);
	}

	fn publish(&self) {
		let next = self.session.snapshot();
		self.snapshots.send_if_modified(|current| {
			if *current == next {
				return false;
			}
			*current = next;
			true
		});
	}
}

async fn probe_outcome(task: &mut Option<JoinHandle<std::result::Result<(), ProbeError>>>) -> std::result::Result<(), ProbeError> {
	match task {
		Some(handle) => match handle.await {
			Ok(outcome) => outcome,
			Err(err) => Err(ProbeError::Unreachable(format!("probe task failed: {err}"))),
		},
		None => std::future::pending().await,
	}
}
