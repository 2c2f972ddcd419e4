//! TOML configuration tests
//!
//! Loading of the `[producer]` table and how command-line flags override it.

use super::config_file;
use clap::Parser;
use streamprod::app::cli::args::Args;
use streamprod::app::cli::config::{load_settings, parse_settings};
use streamprod::producer::{ConfigError, ProducerKind, DEFAULT_CONCURRENCY};

fn args(extra: &[&str]) -> Args {
    let mut argv = vec!["streamprod"];
    argv.extend_from_slice(extra);
    Args::parse_from(argv)
}

#[test]
fn test_full_producer_table() {
    let settings = parse_settings(
        r#"
        [producer]
        stream = "payments"
        concurrency = 4
        backlog = 25
        kind = "record"
        log-prefix = "payments-producer"
        idle-tick-ms = 1000
        stop-grace-ms = 250
        "#,
    )
    .unwrap();

    assert_eq!(settings.stream, "payments");
    assert_eq!(settings.concurrency, 4);
    assert_eq!(settings.backlog, 25);
    assert_eq!(settings.kind, ProducerKind::Record);
    assert_eq!(settings.log_prefix, "payments-producer");
    assert_eq!(settings.idle_tick_ms, 1000);
    assert_eq!(settings.stop_grace_ms, Some(250));
}

#[test]
fn test_unknown_kind_is_rejected() {
    let result = parse_settings("[producer]\nkind = \"firehose\"\n");
    assert!(matches!(result, Err(ConfigError::File { .. })));
}

#[tokio::test]
async fn test_file_values_defaulted_after_load() {
    let file = config_file("[producer]\nstream = \"orders\"\n");
    let path = file.path().to_str().unwrap();

    let settings = load_settings(&args(&["-c", path]))
        .await
        .unwrap()
        .with_defaults()
        .unwrap();

    assert_eq!(settings.stream, "orders");
    assert_eq!(settings.concurrency, DEFAULT_CONCURRENCY);
}

#[tokio::test]
async fn test_command_line_kind_overrides_file() {
    let file = config_file("[producer]\nstream = \"orders\"\nkind = \"batch\"\n");
    let path = file.path().to_str().unwrap();

    let settings = load_settings(&args(&["-c", path, "-t", "record"]))
        .await
        .unwrap();

    assert_eq!(settings.kind, ProducerKind::Record);
}
