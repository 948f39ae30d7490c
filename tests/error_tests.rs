//! Error scenario integration tests

use std::process::Command;

use tempfile::TempDir;

fn clipmark_bin(home: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_clipmark"));
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env("XDG_RUNTIME_DIR", home.path())
        .env_remove("CLIPMARK_HISTORY");
    cmd
}

fn stderr_of(cmd: &mut Command) -> (bool, String) {
    let output = cmd.output().expect("Failed to execute command");
    (
        output.status.success(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

#[test]
fn daemon_command_without_daemon() {
    let home = TempDir::new().unwrap();
    let (ok, stderr) = stderr_of(clipmark_bin(&home).args(["daemon", "status"]));
    assert!(!ok);
    assert!(stderr.contains("No daemon running"), "got: {}", stderr);
}

#[test]
fn history_edit_without_daemon() {
    let home = TempDir::new().unwrap();
    let (ok, stderr) = stderr_of(clipmark_bin(&home).args(["history", "favorite", "abcd"]));
    assert!(!ok);
    assert!(stderr.contains("No daemon running"), "got: {}", stderr);
}

#[test]
fn clear_all_requires_confirmation() {
    let home = TempDir::new().unwrap();
    let (ok, stderr) = stderr_of(clipmark_bin(&home).args(["history", "clear-all"]));
    assert!(!ok);
    assert!(stderr.contains("--yes"), "got: {}", stderr);
}

#[test]
fn config_get_unknown_key() {
    let home = TempDir::new().unwrap();
    let (ok, stderr) = stderr_of(clipmark_bin(&home).args(["config", "get", "api_key"]));
    assert!(!ok);
    assert!(stderr.contains("Unknown key"), "got: {}", stderr);
}

#[test]
fn config_set_zero_capacity() {
    let home = TempDir::new().unwrap();
    let (ok, stderr) = stderr_of(clipmark_bin(&home).args(["config", "set", "capacity", "0"]));
    assert!(!ok);
    assert!(stderr.contains("positive"), "got: {}", stderr);
}

#[test]
fn config_set_invalid_boolean() {
    let home = TempDir::new().unwrap();
    let (ok, stderr) = stderr_of(clipmark_bin(&home).args(["config", "set", "paste", "maybe"]));
    assert!(!ok);
    assert!(stderr.contains("true"), "got: {}", stderr);
}

#[test]
fn config_set_invalid_keystroke_tool() {
    let home = TempDir::new().unwrap();
    let (ok, stderr) = stderr_of(clipmark_bin(&home).args([
        "config",
        "set",
        "linux.keystroke_tool",
        "robot",
    ]));
    assert!(!ok);
    assert!(stderr.contains("Valid options"), "got: {}", stderr);
}

#[test]
fn convert_missing_file() {
    let home = TempDir::new().unwrap();
    let (ok, stderr) = stderr_of(clipmark_bin(&home).args(["convert", "/nonexistent/x.md"]));
    assert!(!ok);
    assert!(stderr.contains("Failed to read"), "got: {}", stderr);
}

#[test]
fn capacity_flag_requires_daemon() {
    let home = TempDir::new().unwrap();
    let output = clipmark_bin(&home)
        .args(["--capacity", "5"])
        .output()
        .expect("Failed to execute command");
    assert_eq!(output.status.code(), Some(2));
}
