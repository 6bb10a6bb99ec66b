//! CLI integration tests.
//!
//! These run the `verdant` binary against a stub HTTP feed served on a local
//! port, verifying output formats and the export file path end to end.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::process::Command;
use std::thread;

const FEED_BODY: &str = r#"[
    {"timestamp": 1700000200000, "device_id": "greenhouse-1",
     "soil_moisture": 45.0, "temperature": 21.5, "humidity": 55.0},
    {"timestamp": 1700000100000, "device_id": "greenhouse-1",
     "soil_moisture": 47.0}
]"#;

/// Run the verdant binary and return its output.
fn run_verdant(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_verdant"))
        .args(args)
        .output()
        .expect("failed to run verdant binary")
}

/// Serve `body` as the JSON response for every connection and return the
/// feed URL. The server thread lives for the rest of the test process.
fn serve_json(body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub feed");
    let addr = listener.local_addr().expect("stub feed address");

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };
            // One read is enough for the request line and headers.
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });

    format!("http://{addr}")
}

#[test]
fn help_lists_subcommands() {
    let output = run_verdant(&["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for subcommand in ["fetch", "watch", "export"] {
        assert!(stdout.contains(subcommand), "help should list {subcommand}");
    }
}

#[test]
fn fetch_rejects_invalid_url_scheme() {
    let output = run_verdant(&["fetch", "--url", "sensors.local/feed"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid endpoint URL"));
}

#[test]
fn fetch_text_renders_summaries() {
    let url = serve_json(FEED_BODY);
    let output = run_verdant(&["fetch", "--url", &url, "--no-color", "--quiet"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Last updated:"));
    assert!(stdout.contains("Soil Moisture"));
    assert!(stdout.contains("trend down"), "47 -> 45 falls past the dead band");
}

#[test]
fn fetch_json_emits_parseable_snapshot() {
    let url = serve_json(FEED_BODY);
    let output = run_verdant(&["fetch", "--url", &url, "--format", "json", "--quiet"]);
    assert!(output.status.success());

    let snapshot: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(snapshot["readings"][0]["device_id"], "greenhouse-1");
    assert_eq!(snapshot["readings"][0]["timestamp"], 1_700_000_200_000i64);
    assert_eq!(snapshot["readings"].as_array().map(Vec::len), Some(2));
}

#[test]
fn export_writes_csv_to_given_path() {
    let url = serve_json(FEED_BODY);
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("out.csv");
    let path_str = path.to_str().expect("utf-8 temp path");

    let output = run_verdant(&["export", "--url", &url, "--output", path_str]);
    assert!(output.status.success());

    let csv = std::fs::read_to_string(&path).expect("export file should exist");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3, "header plus one row per reading");
    assert!(lines[0].starts_with("Timestamp,Device ID"));
    assert!(lines[1].contains("greenhouse-1"));
    assert!(lines[1].contains("45"));
}

#[test]
fn watch_with_count_terminates() {
    let url = serve_json(FEED_BODY);
    let output = run_verdant(&[
        "watch", "--url", &url, "--interval", "1", "--count", "1", "--quiet",
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Last updated:"));
    assert!(stdout.contains("---"));
}
