//! Terminal rendering of waiting room feedback.

use colored::Colorize;
use waitroom::{ClientId, CueEmission, Feedback, StatusMessage, TargetId};

/// Prints every feedback call as one line on stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleFeedback;

impl ConsoleFeedback {
	pub fn render_message(client: &ClientId, message: &StatusMessage) -> String {
		if message.subtitle.is_empty() {
			format!("[{client}] {}", message.title)
		} else {
			format!("[{client}] {} - {}", message.title, message.subtitle)
		}
	}

	pub fn render_cue(client: &ClientId, cue: &CueEmission) -> String {
		format!(
			"[{client}] sound {} at ({:.1}, {:.1}, {:.1}) volume {:.2} pitch {:.2}",
			cue.name, cue.position.x, cue.position.y, cue.position.z, cue.volume, cue.pitch
		)
	}
}

impl Feedback for ConsoleFeedback {
	fn show_message(&self, client: &ClientId, message: &StatusMessage) {
		println!("{}", Self::render_message(client, message).bold());
	}

	fn emit_cue(&self, client: &ClientId, cue: &CueEmission) {
		if cue.name.is_empty() {
			return;
		}
		println!("{}", Self::render_cue(client, cue).dimmed());
	}

	fn clear_display(&self, client: &ClientId) {
		println!("{}", format!("[{client}] title cleared").dimmed());
	}

	fn finalize_handoff(&self, client: &ClientId, target: &TargetId) {
		println!("{}", format!("[{client}] sending to {target}").green());
	}
}
