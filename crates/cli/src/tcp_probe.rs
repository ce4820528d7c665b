//! TCP connect probe.

use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use waitroom::{Probe, ProbeError, TargetId};

/// Treats a target as reachable when a TCP connection to `host:port` opens.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpProbe;

#[async_trait]
impl Probe for TcpProbe {
	async fn probe(&self, target: &TargetId, timeout: Duration) -> Result<(), ProbeError> {
		match tokio::time::timeout(timeout, TcpStream::connect(target.as_str())).await {
			Ok(Ok(_stream)) => Ok(()),
			Ok(Err(err)) => Err(ProbeError::Unreachable(err.to_string())),
			Err(_) => Err(ProbeError::Timeout(timeout)),
		}
	}
}
