//! Reconnect waiting room.
//!
//! Holds clients while their backend is unreachable, probes the backend on a
//! fixed interval, keeps the client entertained with rotating status messages
//! and a looped audio cue, and hands the client off once the backend answers.
//!
//! The host supplies two ports: a [`Probe`] that checks the backend and a
//! [`Feedback`] sink that renders messages and cues. A [`ReconnectController`]
//! drives one client; a [`WaitingRoom`] keeps many.

pub mod config;
pub mod controller;
pub mod cue;
pub mod error;
pub mod ports;
pub mod room;
pub mod session;
mod timers;

pub use config::{CueConfig, MessagesConfig, ReconnectConfig, ReplayTuning, SoundsConfig};
pub use controller::ReconnectController;
pub use error::{ConfigError, ProbeError, ReconnectError, Result};
pub use ports::{ClientId, CueEmission, Feedback, Probe, StatusMessage, TargetId};
pub use room::WaitingRoom;
pub use session::{Position, SessionSnapshot, SessionState};
