//! Binary-level tests for the trace replay CLI.

mod common;

use assert_cmd::Command;
use predicates::prelude::*;

use common::tab;
use tabsteer::{EventTrace, HostEvent, TabId, WindowId};

fn sample_trace() -> EventTrace {
    let mut trace = EventTrace::new();
    trace.push_event(HostEvent::WindowCreated {
        window_id: WindowId(1),
        tabs: vec![tab(1, 1, 0, true), tab(2, 1, 1, false)],
    });
    trace.push_event(HostEvent::TabActivated {
        tab_id: TabId(1),
        window_id: WindowId(1),
    });
    trace.push_event(HostEvent::TabCreated {
        tab: tab(3, 1, 2, false).with_opener(TabId(1)),
    });
    trace
}

#[test]
fn replay_prints_the_issued_commands() {
    let dir = tempfile::tempdir().unwrap();
    let trace_path = dir.path().join("events.jsonl");
    sample_trace().save(&trace_path).unwrap();

    let config_path = dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        "on_open = \"next-to-active\"\nactive_changed_timeout_ms = 10\n",
    )
    .unwrap();

    Command::cargo_bin("tabsteer")
        .unwrap()
        .arg("replay")
        .arg(&trace_path)
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("move tab 3 to window 1 index 1"))
        .stderr(predicate::str::contains("replayed 3 events"));
}

#[test]
fn replay_can_emit_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let trace_path = dir.path().join("events.jsonl");
    sample_trace().save(&trace_path).unwrap();

    let config_path = dir.path().join("config.toml");
    std::fs::write(&config_path, "active_changed_timeout_ms = 10\n").unwrap();

    Command::cargo_bin("tabsteer")
        .unwrap()
        .arg("replay")
        .arg("--json")
        .arg(&trace_path)
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"command\":\"move\""))
        .stdout(predicate::str::contains("\"tab_id\":3"));
}

#[test]
fn replay_rejects_a_trace_without_a_header() {
    let dir = tempfile::tempdir().unwrap();
    let trace_path = dir.path().join("headless.jsonl");
    std::fs::write(
        &trace_path,
        "{\"type\":\"entry\",\"entry\":{\"type\":\"event\",\"event\":{\"type\":\"window_removed\",\"window_id\":1}}}\n",
    )
    .unwrap();

    Command::cargo_bin("tabsteer")
        .unwrap()
        .arg("replay")
        .arg(&trace_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing its header"));
}

#[test]
fn check_config_reports_the_resolved_settings() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    std::fs::write(&config_path, "on_close = \"last-focused\"\n").unwrap();

    Command::cargo_bin("tabsteer")
        .unwrap()
        .arg("check-config")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("LastFocused"))
        .stdout(predicate::str::contains("startup_delay_ms: 2000"));
}
