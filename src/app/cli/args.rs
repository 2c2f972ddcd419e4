//! Command-line arguments
//!
//! Producer settings given here take precedence over the `[producer]` table
//! of the configuration file.

use crate::producer::ProducerKind;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "streamprod")]
#[command(about = "Publish records to an append-only stream with bounded concurrency")]
#[command(version, long_version = crate::core::version::long_version())]
pub struct Args {
    /// Stream to publish to
    #[arg(short = 's', long = "stream", value_name = "NAME")]
    pub stream: Option<String>,

    /// Maximum simultaneous writes [default: 3]
    #[arg(short = 'j', long = "concurrency", value_name = "N")]
    pub concurrency: Option<usize>,

    /// Maximum queued records before producers wait [default: 10]
    #[arg(short = 'b', long = "backlog", value_name = "N")]
    pub backlog: Option<usize>,

    /// Producer type (record or batch)
    #[arg(short = 't', long = "kind", value_name = "KIND")]
    pub kind: Option<ProducerKind>,

    /// Number of records to publish
    #[arg(short = 'n', long = "count", value_name = "N", default_value_t = 100)]
    pub count: usize,

    /// Partition key prefix; records use "<prefix>-<index>"
    #[arg(short = 'k', long = "key-prefix", value_name = "PREFIX", default_value = "key")]
    pub key_prefix: String,

    /// Delay between submissions in milliseconds
    #[arg(short = 'i', long = "interval-ms", value_name = "MS", default_value_t = 0)]
    pub interval_ms: u64,

    /// Shard count of the in-memory stream
    #[arg(long = "shards", value_name = "N", default_value_t = 1)]
    pub shards: usize,

    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Log level
    #[arg(
        short = 'l',
        long = "log-level",
        value_name = "LEVEL",
        value_parser = ["trace", "debug", "info", "warn", "error", "off"]
    )]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(
        short = 'o',
        long = "log-format",
        value_name = "FORMAT",
        value_parser = crate::core::logging::LOG_FORMATS
    )]
    pub log_format: Option<String>,

    /// Log file path
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Force colored output
    #[arg(long = "color", conflicts_with = "no_color")]
    pub color: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,
}

impl Args {
    /// Decide on color: explicit flags win, otherwise color when stdout is a terminal
    pub fn use_color(&self, stdout_is_terminal: bool) -> bool {
        !self.no_color && (self.color || stdout_is_terminal)
    }
}
