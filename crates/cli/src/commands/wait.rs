//! Interactive waiting session against one backend.
//!
//! Reads `move X Y Z` and `quit` lines from stdin so the session's position
//! and teardown paths can be driven by hand.

use std::io::BufRead;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};
use waitroom::{ClientId, Position, ReconnectConfig, TargetId, WaitingRoom};

use crate::console::ConsoleFeedback;
use crate::error::Result;
use crate::tcp_probe::TcpProbe;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
	Move(Position),
	Quit,
}

/// Parses one stdin line. Blank or unrecognized lines yield `None`.
pub fn parse_input(line: &str) -> Option<Input> {
	let mut parts = line.split_whitespace();
	match parts.next()? {
		"quit" | "exit" => Some(Input::Quit),
		"move" => {
			let mut coord = || parts.next()?.parse::<f64>().ok();
			let (x, y, z) = (coord()?, coord()?, coord()?);
			Some(Input::Move(Position::new(x, y, z)))
		}
		_ => None,
	}
}

pub async fn execute(config: ReconnectConfig, target: TargetId, client: &str) -> Result<()> {
	let room = WaitingRoom::new(config, Arc::new(TcpProbe), Arc::new(ConsoleFeedback))?;
	let client = ClientId::new(client);
	let mut snapshots = room.admit(client.clone(), target.clone())?;
	info!(target = "waitroom.cli", client = %client, server = %target, "waiting for server");

	let mut lines = spawn_stdin_reader()?;
	let mut stdin_open = true;

	loop {
		tokio::select! {
			_ = snapshots.wait_for(|snapshot| snapshot.state.is_ended()) => break,
			line = lines.recv(), if stdin_open => match line {
				Some(line) => match parse_input(&line) {
					Some(Input::Move(position)) => room.on_move(&client, position.x, position.y, position.z),
					Some(Input::Quit) => room.on_end(&client),
					None if line.trim().is_empty() => {}
					None => warn!(target = "waitroom.cli", input = %line.trim(), "unrecognized input"),
				},
				None => stdin_open = false,
			},
			_ = tokio::signal::ctrl_c() => room.on_end(&client),
		}
	}

	let handed_off = snapshots.borrow().handed_off;
	if handed_off {
		info!(target = "waitroom.cli", client = %client, server = %target, "handed off");
	} else {
		info!(target = "waitroom.cli", client = %client, server = %target, "left the waiting room");
	}
	Ok(())
}

/// Forwards stdin lines from a detached thread so a pending read never blocks shutdown.
fn spawn_stdin_reader() -> Result<mpsc::UnboundedReceiver<String>> {
	let (tx, rx) = mpsc::unbounded_channel();
	std::thread::Builder::new().name("waitroom-stdin".to_string()).spawn(move || {
		for line in std::io::stdin().lock().lines() {
			let Ok(line) = line else { break };
			if tx.send(line).is_err() {
				break;
			}
		}
	})?;
	Ok(rx)
}
