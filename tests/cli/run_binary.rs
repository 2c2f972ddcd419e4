//! Runs of the `streamprod` binary
//!
//! Every run passes an explicit configuration file so a user's default
//! configuration never leaks into the tests.

use super::config_file;
use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_streamprod"))
        .args(["--no-color", "--log-level", "error"])
        .args(args)
        .output()
        .expect("run streamprod")
}

#[test]
fn test_publishes_requested_records() {
    let config = config_file("[producer]\n");
    let path = config.path().to_str().unwrap();

    let output = run(&["-c", path, "--stream", "demo", "-n", "12", "-j", "2", "--shards", "3"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(0), "stdout: {}", stdout);
    assert!(stdout.contains("published 12/12 records to stream 'demo'"));
    assert!(stdout.contains("0 failed, 12 stored"));
}

#[test]
fn test_stream_from_config_file() {
    let config = config_file("[producer]\nstream = \"configured\"\nbacklog = 2\n");
    let path = config.path().to_str().unwrap();

    let output = run(&["-c", path, "-n", "3"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout.contains("stream 'configured'"));
}

#[test]
fn test_missing_stream_exits_with_config_error() {
    let config = config_file("[producer]\nconcurrency = 2\n");
    let path = config.path().to_str().unwrap();

    let output = run(&["-c", path]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_batch_kind_exits_with_config_error() {
    let config = config_file("[producer]\nstream = \"demo\"\nkind = \"batch\"\n");
    let path = config.path().to_str().unwrap();

    let output = run(&["-c", path]);

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_missing_config_file_exits_with_config_error() {
    let output = run(&["-c", "/nonexistent/streamprod.toml", "--stream", "demo"]);
    assert_eq!(output.status.code(), Some(1));
}
