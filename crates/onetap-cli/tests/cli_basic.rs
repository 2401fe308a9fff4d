//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with HOME pointed at a temporary directory so
//! the user's real configuration is never touched.

use std::io::Write;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &TempDir, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_onetap"))
        .args(args)
        .env("HOME", home.path())
        .env_remove("ONETAP_ENV")
        .env_remove("ONETAP_LOG")
        .env_remove("GEMINI_API_KEY")
        .stdin(Stdio::null())
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

/// Run `onetap` feeding `input` on stdin, failing if it outlives `limit`.
fn run_cli_with_input(home: &TempDir, args: &[&str], input: &str, limit: Duration) -> i32 {
    let mut child = Command::new(env!("CARGO_BIN_EXE_onetap"))
        .args(args)
        .env("HOME", home.path())
        .env_remove("ONETAP_ENV")
        .env_remove("ONETAP_LOG")
        .env_remove("GEMINI_API_KEY")
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("Failed to spawn CLI");

    {
        let mut stdin = child.stdin.take().expect("stdin");
        stdin.write_all(input.as_bytes()).expect("write stdin");
    }

    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait().expect("try_wait") {
            return status.code().unwrap_or(-1);
        }
        if started.elapsed() > limit {
            let _ = child.kill();
            let _ = child.wait();
            panic!("onetap {args:?} still running {limit:?} after stdin closed");
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}

fn home() -> TempDir {
    tempfile::tempdir().expect("tempdir")
}

#[test]
fn test_presets_json() {
    let home = home();
    let (stdout, _, code) = run_cli(&home, &["presets", "--json"]);
    assert_eq!(code, 0, "presets --json failed");

    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let presets = parsed.as_array().unwrap();
    assert_eq!(presets.len(), 6);
    assert_eq!(presets[0]["id"], "1");
    assert_eq!(presets[0]["duration_secs"], 1500);
    assert_eq!(presets[0]["icon"], "zap");
}

#[test]
fn test_presets_text() {
    let home = home();
    let (stdout, _, code) = run_cli(&home, &["presets"]);
    assert_eq!(code, 0, "presets failed");
    assert!(stdout.contains("Focus"));
    assert!(stdout.contains("Workout"));
}

#[test]
fn test_run_with_unknown_deep_link_stays_idle() {
    let home = home();
    let (stdout, _, code) = run_cli(&home, &["run", "--start", "nope", "--offline"]);
    assert_eq!(code, 0, "run failed");
    assert!(stdout.contains("Pick a widget"));
    assert!(!stdout.contains("RUNNING"));
}

#[test]
fn test_run_deep_link_to_completion() {
    let home = home();
    let (_, _, code) = run_cli(
        &home,
        &[
            "config",
            "set",
            "presets",
            r#"[{"id":"t","name":"Tick","duration_secs":1}]"#,
        ],
    );
    assert_eq!(code, 0, "config set presets failed");

    let (stdout, _, code) = run_cli(&home, &["run", "--start", "t", "--offline", "--no-sound"]);
    assert_eq!(code, 0, "run failed");
    assert!(stdout.contains("RUNNING"));
    assert!(stdout.contains("Done!"));
    assert!(stdout.contains("Tick timer finished."));
    assert!(stdout.contains("Skvelá práca!"));
}

#[test]
fn test_run_exits_when_stdin_closes_while_paused() {
    let home = home();
    let code = run_cli_with_input(
        &home,
        &["run", "--offline", "--no-sound"],
        "1\np\n",
        Duration::from_secs(10),
    );
    assert_eq!(code, 0);
}

#[test]
fn test_run_streams_events_as_json_lines() {
    let home = home();
    run_cli(
        &home,
        &[
            "config",
            "set",
            "presets",
            r#"[{"id":"t","name":"Tick","duration_secs":1}]"#,
        ],
    );

    let (_, stderr, code) = run_cli(
        &home,
        &["run", "--start", "t", "--offline", "--no-sound", "--events"],
    );
    assert_eq!(code, 0, "run --events failed");

    let events: Vec<serde_json::Value> = stderr
        .lines()
        .filter_map(|line| line.find('{').map(|at| &line[at..]))
        .filter_map(|json| serde_json::from_str(json).ok())
        .collect();
    let kinds: Vec<&str> = events.iter().filter_map(|e| e["type"].as_str()).collect();
    assert_eq!(kinds, vec!["timer_started", "timer_completed", "state_snapshot"]);
    assert_eq!(events[0]["preset_id"], "t");
    assert_eq!(events[1]["run_id"], events[0]["run_id"]);
    assert_eq!(events[2]["status"], "completed");
}

#[test]
fn test_config_set_then_get() {
    let home = home();
    let (_, _, code) = run_cli(&home, &["config", "set", "motivation.locale", "en"]);
    assert_eq!(code, 0, "config set failed");

    let (stdout, _, code) = run_cli(&home, &["config", "get", "motivation.locale"]);
    assert_eq!(code, 0, "config get failed");
    assert_eq!(stdout.trim(), "en");
}

#[test]
fn test_config_rejects_unknown_key() {
    let home = home();
    let (_, stderr, code) = run_cli(&home, &["config", "set", "bogus.key", "1"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown configuration key"));
}

#[test]
fn test_config_list_and_path() {
    let home = home();
    let (stdout, _, code) = run_cli(&home, &["config", "list"]);
    assert_eq!(code, 0, "config list failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["timer"]["tick_interval_ms"], 200);

    let (stdout, _, code) = run_cli(&home, &["config", "path"]);
    assert_eq!(code, 0, "config path failed");
    assert!(stdout.trim().ends_with("onetap/config.toml"));
    assert!(stdout.trim().starts_with(home.path().to_str().unwrap()));
}

#[test]
fn test_config_reset() {
    let home = home();
    run_cli(&home, &["config", "set", "ui.clear_screen", "false"]);
    let (_, _, code) = run_cli(&home, &["config", "reset"]);
    assert_eq!(code, 0, "config reset failed");
    let (stdout, _, _) = run_cli(&home, &["config", "get", "ui.clear_screen"]);
    assert_eq!(stdout.trim(), "true");
}
