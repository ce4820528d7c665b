use std::net::TcpListener;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

fn run_waitroom(workdir: &Path, args: &[&str]) -> (bool, String, String) {
	let output = Command::new(env!("CARGO_BIN_EXE_waitroom"))
		.current_dir(workdir)
		.args(args)
		.output()
		.expect("failed to execute waitroom");

	let stdout = String::from_utf8_lossy(&output.stdout).to_string();
	let stderr = String::from_utf8_lossy(&output.stderr).to_string();
	(output.status.success(), stdout, stderr)
}

fn write_config(workdir: &Path, content: &str) {
	std::fs::write(workdir.join("room.json"), content).expect("config should be written");
}

#[test]
fn check_config_prints_effective_defaults() {
	let tmp = TempDir::new().expect("temp dir should be created");
	let (success, stdout, stderr) = run_waitroom(tmp.path(), &["check-config"]);
	assert!(success, "check-config failed: {stderr}");

	let json: serde_json::Value = serde_json::from_str(&stdout).expect("output should be JSON");
	assert_eq!(json["checkIntervalMs"], 1000);
	assert_eq!(json["messages"]["showDelayTicks"], 20);
	assert_eq!(json["sounds"]["replay"]["slackMs"], 25);
	assert_eq!(json["sounds"]["replay"]["minDelayMs"], 250);
}

#[test]
fn check_config_merges_file_values() {
	let tmp = TempDir::new().expect("temp dir should be created");
	write_config(
		tmp.path(),
		r#"{
  "joinDelayMs": 2500,
  "sounds": { "waiting": { "name": "block.note_block.harp", "lengthMs": 1200, "pitch": 1.5 } }
}"#,
	);

	let (success, stdout, stderr) = run_waitroom(tmp.path(), &["--config", "room.json", "check-config"]);
	assert!(success, "check-config failed: {stderr}");

	let json: serde_json::Value = serde_json::from_str(&stdout).expect("output should be JSON");
	assert_eq!(json["joinDelayMs"], 2500);
	assert_eq!(json["checkIntervalMs"], 1000);
	assert_eq!(json["sounds"]["waiting"]["name"], "block.note_block.harp");
	assert_eq!(json["sounds"]["waiting"]["lengthMs"], 1200);
}

#[test]
fn check_config_rejects_empty_message_sequence() {
	let tmp = TempDir::new().expect("temp dir should be created");
	write_config(tmp.path(), r#"{ "messages": { "waiting": [] } }"#);

	let (success, _stdout, stderr) = run_waitroom(tmp.path(), &["--config", "room.json", "check-config"]);
	assert!(!success, "empty waiting sequence should fail");
	assert!(stderr.contains("messages.waiting"), "stderr: {stderr}");
}

#[test]
fn probe_reports_listening_port_as_reachable() {
	let tmp = TempDir::new().expect("temp dir should be created");
	let listener = TcpListener::bind(("127.0.0.1", 0)).expect("listener should bind");
	let target = listener.local_addr().expect("listener should have an address").to_string();

	let (success, stdout, stderr) = run_waitroom(tmp.path(), &["probe", &target]);
	assert!(success, "probe failed: {stderr}");

	let json: serde_json::Value = serde_json::from_str(stdout.trim()).expect("output should be JSON");
	assert_eq!(json["target"], target.as_str());
	assert_eq!(json["reachable"], true);
}

#[test]
fn probe_reports_closed_port_as_unreachable() {
	let tmp = TempDir::new().expect("temp dir should be created");
	let listener = TcpListener::bind(("127.0.0.1", 0)).expect("listener should bind");
	let target = listener.local_addr().expect("listener should have an address").to_string();
	drop(listener);

	let (success, stdout, _stderr) = run_waitroom(tmp.path(), &["probe", &target, "--timeout-ms", "300"]);
	assert!(!success, "probe of a closed port should fail");

	let json: serde_json::Value = serde_json::from_str(stdout.trim()).expect("output should be JSON");
	assert_eq!(json["reachable"], false);
}

#[test]
fn wait_hands_off_once_target_listens() {
	let tmp = TempDir::new().expect("temp dir should be created");
	write_config(
		tmp.path(),
		r#"{
  "checkIntervalMs": 50,
  "joinDelayMs": 50,
  "feedbackReadyDelayMs": 10,
  "messages": { "showDelayTicks": 1, "waiting": [{ "title": "Restarting" }], "connecting": [{ "title": "Connecting" }] },
  "sounds": { "connecting": { "name": "entity.player.levelup" } }
}"#,
	);
	let listener = TcpListener::bind(("127.0.0.1", 0)).expect("listener should bind");
	let target = listener.local_addr().expect("listener should have an address").to_string();

	let (success, stdout, stderr) = run_waitroom(tmp.path(), &["--config", "room.json", "wait", &target, "--client", "alex"]);
	assert!(success, "wait failed: {stderr}");
	assert!(stdout.contains("[alex] Restarting"), "stdout: {stdout}");
	assert!(stdout.contains("[alex] sound entity.player.levelup"), "stdout: {stdout}");
	assert!(stdout.contains(&format!("[alex] sending to {target}")), "stdout: {stdout}");
}

#[test]
fn invalid_target_is_rejected() {
	let tmp = TempDir::new().expect("temp dir should be created");
	let (success, _stdout, stderr) = run_waitroom(tmp.path(), &["probe", "localhost"]);
	assert!(!success);
	assert!(stderr.contains("host:port"), "stderr: {stderr}");
}
