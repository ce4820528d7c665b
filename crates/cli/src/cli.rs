use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "waitroom")]
#[command(about = "Hold clients in a waiting room until their server comes back")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = ArgAction::Count)]
	pub verbose: u8,

	/// JSON configuration file (defaults apply when omitted)
	#[arg(short, long, global = true, value_name = "FILE")]
	pub config: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Wait for TARGET and hand the client off once it answers
	Wait {
		/// Backend address as host:port
		target: String,

		/// Name of the waiting client
		#[arg(long, default_value = "player")]
		client: String,
	},

	/// Probe TARGET once
	Probe {
		/// Backend address as host:port
		target: String,

		/// Probe timeout in milliseconds (defaults to pingTimeoutMs from config)
		#[arg(long, value_name = "MS")]
		timeout_ms: Option<u64>,
	},

	/// Validate the configuration file and print the effective values
	CheckConfig,
}
