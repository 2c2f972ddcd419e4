//! CLI integration test modules

pub mod run_binary;
pub mod toml_config;

use std::io::Write;
use tempfile::NamedTempFile;

/// Write `contents` to a temporary TOML file
pub fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}
