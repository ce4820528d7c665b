//! Registry of live sessions keyed by client.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::debug;

use crate::config::ReconnectConfig;
use crate::controller::ReconnectController;
use crate::error::{ReconnectError, Result};
use crate::ports::{ClientId, Feedback, Probe, TargetId};
use crate::session::SessionSnapshot;

/// Holds one [`ReconnectController`] per waiting client.
///
/// The probe and feedback ports are shared by every session. Finished
/// sessions (handed off or ended) are pruned lazily on each call.
pub struct WaitingRoom {
	config: Arc<ReconnectConfig>,
	probe: Arc<dyn Probe>,
	feedback: Arc<dyn Feedback>,
	sessions: Mutex<HashMap<ClientId, ReconnectController>>,
}

impl WaitingRoom {
	/// Validates `config` once for every session this room will host.
	pub fn new(config: ReconnectConfig, probe: Arc<dyn Probe>, feedback: Arc<dyn Feedback>) -> Result<Self> {
		config.validate()?;
		Ok(Self {
			config: Arc::new(config),
			probe,
			feedback,
			sessions: Mutex::new(HashMap::new()),
		})
	}

	pub fn config(&self) -> &ReconnectConfig {
		&self.config
	}

	/// Places `client` in the waiting room for `target` and activates its session.
	pub fn admit(&self, client: ClientId, target: TargetId) -> Result<watch::Receiver<SessionSnapshot>> {
		let mut sessions = self.sessions.lock();
		sessions.retain(|_, controller| !controller.is_finished());
		if sessions.contains_key(&client) {
			return Err(ReconnectError::DuplicateClient(client));
		}

		let mut controller = ReconnectController::new(
			Arc::clone(&self.config),
			client.clone(),
			target,
			Arc::clone(&self.probe),
			Arc::clone(&self.feedback),
		)?;
		controller.activate()?;
		let snapshots = controller.watch();

		debug!(
			target = "waitroom.room",
			client = %client,
			server = %controller.target(),
			waiting = sessions.len() + 1,
			"client admitted"
		);
		sessions.insert(client, controller);
		Ok(snapshots)
	}

	pub fn on_move(&self, client: &ClientId, x: f64, y: f64, z: f64) {
		match self.sessions.lock().get(client) {
			Some(controller) => controller.on_move(x, y, z),
			None => debug!(target = "waitroom.room", client = %client, "move for unknown client"),
		}
	}

	/// Ends and forgets the session for `client`, if any.
	pub fn on_end(&self, client: &ClientId) {
		match self.sessions.lock().remove(client) {
			Some(controller) => controller.on_end(),
			None => debug!(target = "waitroom.room", client = %client, "end for unknown client"),
		}
	}

	pub fn contains(&self, client: &ClientId) -> bool {
		let mut sessions = self.sessions.lock();
		sessions.retain(|_, controller| !controller.is_finished());
		sessions.contains_key(client)
	}

	pub fn len(&self) -> usize {
		let mut sessions = self.sessions.lock();
		sessions.retain(|_, controller| !controller.is_finished());
		sessions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Ends every live session.
	pub fn close(&self) {
		let sessions = std::mem::take(&mut *self.sessions.lock());
		for controller in sessions.values() {
			controller.on_end();
		}
		debug!(target = "waitroom.room", closed = sessions.len(), "waiting room closed");
	}
}
