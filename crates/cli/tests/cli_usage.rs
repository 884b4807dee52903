// Integration tests for the `crucible` binary.
// Run with: cargo test -p crucible-cli --test cli_usage

use std::process::Command;

fn crucible(home: &std::path::Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_crucible"));
    // Isolate from the developer's real credentials
    cmd.env_remove("CRUCIBLE_API_KEY");
    cmd.env_remove("CRUCIBLE_API_BASE");
    cmd.env("HOME", home);
    cmd.env("XDG_CONFIG_HOME", home.join(".config"));
    cmd
}

#[test]
fn missing_credentials_exits_40() {
    let home = tempfile::tempdir().unwrap();
    let output = crucible(home.path())
        .args(["submission", "get", "s1"])
        .output()
        .expect("failed to run crucible");

    assert_eq!(
        output.status.code(),
        Some(40),
        "expected exit 40, got {:?}\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr),
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Not authenticated"), "stderr: {}", stderr);
}

#[test]
fn missing_file_argument_exits_2() {
    let home = tempfile::tempdir().unwrap();
    let output = crucible(home.path())
        .args(["submission", "create"])
        .output()
        .expect("failed to run crucible");

    // clap usage error
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn nonexistent_upload_file_exits_2() {
    let home = tempfile::tempdir().unwrap();
    let output = crucible(home.path())
        .args([
            "submission", "create", "/nonexistent/sub.json",
            "--api-key", "test-key",
        ])
        .output()
        .expect("failed to run crucible");

    assert_eq!(
        output.status.code(),
        Some(2),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr),
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("File not found"), "stderr: {}", stderr);
}

#[test]
fn unreachable_server_exits_42() {
    let home = tempfile::tempdir().unwrap();
    // Port 9 (discard) is closed on any sane test machine
    let output = crucible(home.path())
        .args([
            "submission", "get", "s1",
            "--api-key", "test-key",
            "--api-base", "http://127.0.0.1:9",
        ])
        .output()
        .expect("failed to run crucible");

    assert_eq!(
        output.status.code(),
        Some(42),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr),
    );
}

#[test]
fn login_with_flag_saves_credentials() {
    let home = tempfile::tempdir().unwrap();
    let output = crucible(home.path())
        .args(["login", "--api-key", "crucible-key-123"])
        .output()
        .expect("failed to run crucible");

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr),
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Saved credentials"), "stderr: {}", stderr);

    // And logout removes them
    let output = crucible(home.path())
        .args(["logout"])
        .output()
        .expect("failed to run crucible");
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn login_without_key_or_tty_exits_2() {
    let home = tempfile::tempdir().unwrap();
    let output = crucible(home.path())
        .arg("login")
        .stdin(std::process::Stdio::null())
        .output()
        .expect("failed to run crucible");

    assert_eq!(
        output.status.code(),
        Some(2),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr),
    );
}
