//! Integration tests for the `alarmsense` CLI binary.
//!
//! Argument parsing, validation, offline demo data, export and config
//! handling run without a backend; live behaviour uses wiremock.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `alarmsense` binary with env isolation.
///
/// Clears all `ALARMSENSE_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn alarmsense_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("alarmsense");
    cmd.env("HOME", "/tmp/alarmsense-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/alarmsense-cli-test-nonexistent")
        .env_remove("ALARMSENSE_BASE_URL")
        .env_remove("ALARMSENSE_TIMEOUT")
        .env_remove("ALARMSENSE_INSECURE")
        .env_remove("ALARMSENSE_OUTPUT")
        .env_remove("ALARMSENSE_BACKEND__BASE_URL")
        .env_remove("ALARMSENSE_DEFAULTS__PAGE_SIZE")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

const MAY: [&str; 8] = [
    "--site",
    "S1",
    "--turbine",
    "T1-1",
    "--start",
    "2024-05-01",
    "--end",
    "2024-05-31",
];

fn stdout_lines(output: &std::process::Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_owned)
        .collect()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = alarmsense_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_commands() {
    alarmsense_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("root causes")
            .and(predicate::str::contains("sites"))
            .and(predicate::str::contains("turbines"))
            .and(predicate::str::contains("search"))
            .and(predicate::str::contains("export")),
    );
}

#[test]
fn test_version_flag() {
    alarmsense_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_completions_bash() {
    alarmsense_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alarmsense"));
}

// ── Offline data ────────────────────────────────────────────────────

#[test]
fn test_offline_sites_plain() {
    let output = alarmsense_cmd()
        .args(["--offline", "-o", "plain", "sites"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec!["S1", "S2", "S3"]);
    assert!(String::from_utf8_lossy(&output.stderr).contains("OFFLINE-MOCK"));
}

#[test]
fn test_offline_turbines_table() {
    alarmsense_cmd()
        .args(["--offline", "turbines", "--site", "S2"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("TX-WTG-A1")
                .and(predicate::str::contains("TX-WTG-A2"))
                .and(predicate::str::contains("NS-WTG-001").not()),
        );
}

#[test]
fn test_quiet_suppresses_notice() {
    alarmsense_cmd()
        .args(["--offline", "--quiet", "sites"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_offline_search_table_pages() {
    let mut args = vec!["--offline", "search"];
    args.extend_from_slice(&MAY);
    args.extend_from_slice(&["--page", "2"]);
    alarmsense_cmd().args(args).assert().success().stdout(
        predicate::str::contains("ALM-110")
            .and(predicate::str::contains("ALM-100").not())
            .and(predicate::str::contains("SHOWING 11 - 20 OF 45")),
    );
}

#[test]
fn test_offline_search_table_rows() {
    let mut args = vec!["--offline", "-o", "table", "search"];
    args.extend_from_slice(&MAY);
    let output = alarmsense_cmd().args(args).output().unwrap();
    assert!(output.status.success());

    let lines = stdout_lines(&output);
    let header = lines.iter().find(|l| l.contains("Root Cause")).unwrap();
    for column in ["ID", "Start", "End", "Duration", "Code", "Class", "Priority"] {
        assert!(header.contains(column), "missing column {column}");
    }

    let first = lines.iter().find(|l| l.contains("ALM-100")).unwrap();
    for cell in [
        "2024-05-01 08:30",
        "2024-05-01 09:15",
        "45 min",
        "Gearbox Overheat",
        "ERR-0010",
        "Mechanical",
        "P1 Critical",
    ] {
        assert!(first.contains(cell), "ALM-100 row lacks {cell}: {first}");
    }

    let second = lines.iter().find(|l| l.contains("ALM-101")).unwrap();
    assert!(second.contains("20 min"));
    assert!(second.contains("P2 Moderate"));

    assert!(lines.iter().any(|l| l.contains("ALM-109")));
    assert!(!lines.iter().any(|l| l.contains("ALM-110")));
    assert!(
        lines
            .iter()
            .any(|l| l.contains("SHOWING 1 - 10 OF 45") && l.contains("[OFFLINE-MOCK]"))
    );
}

#[test]
fn test_offline_search_priority_filter() {
    let mut args = vec!["--offline", "-o", "plain", "search"];
    args.extend_from_slice(&MAY);
    args.extend_from_slice(&["--priority", "p1", "--all"]);
    let output = alarmsense_cmd().args(args).output().unwrap();
    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 21);
    assert_eq!(lines[0], "ALM-100");
    assert_eq!(lines[1], "ALM-103");
}

#[test]
fn test_offline_search_duration_window() {
    let mut args = vec!["--offline", "-o", "json-compact", "search"];
    args.extend_from_slice(&MAY);
    args.extend_from_slice(&["--min-duration", "60", "--all"]);
    let output = alarmsense_cmd().args(args).output().unwrap();
    assert!(output.status.success());
    let results: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(results.len(), 18);
    assert_eq!(results[0]["id"], "ALM-102");
}

#[test]
fn test_offline_search_alarm_code_query() {
    let mut args = vec!["--offline", "-o", "plain", "search"];
    args.extend_from_slice(&MAY);
    args.extend_from_slice(&["--query", "err-0010", "--all"]);
    let output = alarmsense_cmd().args(args).output().unwrap();
    assert!(output.status.success());
    assert!(stdout_lines(&output).contains(&"ALM-100".to_owned()));
}

#[test]
fn test_empty_filtered_search_says_so() {
    let mut args = vec!["--offline", "search"];
    args.extend_from_slice(&MAY);
    args.extend_from_slice(&["--query", "zzzz"]);
    alarmsense_cmd()
        .args(args)
        .assert()
        .success()
        .stdout(predicate::str::contains("Query returned 0 results"));
}

#[test]
fn test_require_live_rejects_demo_data() {
    let output = alarmsense_cmd()
        .args(["--offline", "--require-live", "sites"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("Backend unavailable"));
}

// ── Validation ──────────────────────────────────────────────────────

#[test]
fn test_missing_fields_are_listed() {
    let output = alarmsense_cmd()
        .args(["--offline", "search", "--site", "S1"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("--turbine: Required"), "{text}");
    assert!(text.contains("--start: Required"), "{text}");
    assert!(!text.contains("--site: Required"), "{text}");
}

#[test]
fn test_reversed_window_is_invalid_range() {
    let output = alarmsense_cmd()
        .args([
            "--offline",
            "search",
            "--site",
            "S1",
            "--turbine",
            "T1-1",
            "--start",
            "2024-05-31",
            "--end",
            "2024-05-01",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--end: Invalid range"));
}

#[test]
fn test_bad_page_size_is_usage_error() {
    let mut args = vec!["--offline", "search"];
    args.extend_from_slice(&MAY);
    args.extend_from_slice(&["--page-size", "7"]);
    let output = alarmsense_cmd().args(args).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_bad_date_is_usage_error() {
    let output = alarmsense_cmd()
        .args(["--offline", "search", "--start", "last tuesday"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Export ──────────────────────────────────────────────────────────

#[test]
fn test_export_writes_csv_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("out.csv");
    let mut args = vec!["--offline", "export"];
    args.extend_from_slice(&MAY);
    args.extend_from_slice(&["--priority", "p2", "--file", file.to_str().unwrap()]);
    alarmsense_cmd().args(args).assert().success();

    let content = std::fs::read_to_string(&file).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines[0],
        r#""ID","Start Time","End Time","Root Cause","Alarm Code","Class","Priority""#
    );
    assert_eq!(lines.len(), 1 + 24);
    assert!(lines[1].starts_with(r#""ALM-101","2024-05-02 08:30","2024-05-02 08:50""#));
}

#[test]
fn test_export_to_stdout() {
    let mut args = vec!["--offline", "export"];
    args.extend_from_slice(&MAY);
    args.extend_from_slice(&["--file", "-"]);
    alarmsense_cmd()
        .args(args)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("\"ID\",").and(predicate::str::contains("\"ALM-144\"")));
}

#[test]
fn test_export_of_nothing_fails() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("empty.csv");
    let mut args = vec!["--offline", "export"];
    args.extend_from_slice(&MAY);
    args.extend_from_slice(&["--query", "zzzz-nothing", "--file", file.to_str().unwrap()]);
    let output = alarmsense_cmd().args(args).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(!file.exists());
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_is_under_config_home() {
    alarmsense_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alarmsense").and(predicate::str::contains("config.toml")));
}

#[test]
fn test_config_init_then_show() {
    let home = tempfile::tempdir().unwrap();
    let run = |args: &[&str]| {
        alarmsense_cmd()
            .env("HOME", home.path())
            .env("XDG_CONFIG_HOME", home.path())
            .args(args)
            .output()
            .unwrap()
    };

    let init = run(&["--base-url", "http://scada:9000/api/alarmsense", "config", "init"]);
    assert!(init.status.success(), "{}", combined_output(&init));

    let again = run(&["config", "init"]);
    assert_eq!(again.status.code(), Some(3));

    let show = run(&["config", "show"]);
    assert!(show.status.success());
    assert!(String::from_utf8_lossy(&show.stdout).contains("http://scada:9000/api/alarmsense"));
}

#[test]
fn test_broken_config_exits_with_config_code() {
    let home = tempfile::tempdir().unwrap();
    let dir = home.path().join("alarmsense");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), "[defaults]\npage_size = 7\n").unwrap();

    let output = alarmsense_cmd()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .arg("sites")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
}

// ── Live backend ────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_live_search_uses_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/alarmsense/rootcause"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "Id": "LIVE-1",
            "StartTime": "2024-05-03T10:00:00Z",
            "EndTime": "2024-05-03T10:30:00Z",
            "RootCauseName": "Pitch Bearing Wear",
            "AlarmCode": "ERR-0777",
            "Class": "Mechanical",
            "Priority": "P1"
        }])))
        .mount(&server)
        .await;

    let base = format!("{}/api/alarmsense", server.uri());
    let mut args = vec!["--base-url", base.as_str(), "--require-live", "-o", "plain", "search"];
    args.extend_from_slice(&MAY);
    let output = alarmsense_cmd().args(args).output().unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(stdout_lines(&output), vec!["LIVE-1"]);
    assert!(!String::from_utf8_lossy(&output.stderr).contains("OFFLINE-MOCK"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_backend_error_falls_back_with_notice() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/alarmsense/sites"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let base = format!("{}/api/alarmsense", server.uri());
    let output = alarmsense_cmd()
        .args(["--base-url", base.as_str(), "-o", "plain", "sites"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec!["S1", "S2", "S3"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("OFFLINE-MOCK") && stderr.contains("503"), "{stderr}");
}
