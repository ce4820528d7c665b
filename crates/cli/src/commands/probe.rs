use std::time::{Duration, Instant};

use serde_json::json;
use tracing::info;
use waitroom::{Probe, TargetId};

use crate::error::{CliError, Result};
use crate::tcp_probe::TcpProbe;

pub async fn execute(target: TargetId, timeout: Duration) -> Result<()> {
	info!(target = "waitroom.cli", server = %target, timeout_ms = timeout.as_millis() as u64, "probe");

	let started = Instant::now();
	let outcome = TcpProbe.probe(&target, timeout).await;
	let elapsed_ms = started.elapsed().as_millis() as u64;

	match outcome {
		Ok(()) => {
			println!(
				"{}",
				json!({
					"target": target.as_str(),
					"reachable": true,
					"elapsedMs": elapsed_ms,
				})
			);
			Ok(())
		}
		Err(source) => {
			println!(
				"{}",
				json!({
					"target": target.as_str(),
					"reachable": false,
					"elapsedMs": elapsed_ms,
					"error": source.to_string(),
				})
			);
			Err(CliError::Probe {
				target: target.to_string(),
				source,
			})
		}
	}
}
