//! TOML configuration file loading
//!
//! The configuration file may carry a `[producer]` table with the same keys
//! as [`ProducerSettings`]. Command-line values are applied on top.

use super::args::Args;
use crate::producer::{ConfigError, ConfigResult, ProducerSettings};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default configuration file location, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("StreamProd").join("streamprod.toml"))
}

/// Resolve the producer settings from the config file and command line
///
/// An explicitly given config file must exist; the default one is optional.
pub async fn load_settings(args: &Args) -> ConfigResult<ProducerSettings> {
    let config_path = match &args.config_file {
        Some(path) => {
            if !path.exists() {
                return Err(file_error(path, "the specified configuration file does not exist"));
            }
            Some(path.clone())
        }
        None => default_config_path().filter(|path| path.exists()),
    };

    let mut settings = match config_path {
        Some(path) => {
            log::debug!("loading configuration from {}", path.display());
            let contents = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| file_error(&path, &e.to_string()))?;
            parse_settings(&contents).map_err(|e| match e {
                ConfigError::File { message, .. } => file_error(&path, &message),
                other => other,
            })?
        }
        None => ProducerSettings::default(),
    };

    apply_args(&mut settings, args);
    Ok(settings)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigDocument {
    producer: ProducerSettings,
}

/// Parse the `[producer]` table of a TOML document
pub fn parse_settings(contents: &str) -> ConfigResult<ProducerSettings> {
    toml::from_str::<ConfigDocument>(contents)
        .map(|document| document.producer)
        .map_err(|e| ConfigError::File {
            path: String::new(),
            message: e.to_string(),
        })
}

fn apply_args(settings: &mut ProducerSettings, args: &Args) {
    if let Some(stream) = &args.stream {
        settings.stream = stream.clone();
    }
    if let Some(concurrency) = args.concurrency {
        settings.concurrency = concurrency;
    }
    if let Some(backlog) = args.backlog {
        settings.backlog = backlog;
    }
    if let Some(kind) = args.kind {
        settings.kind = kind;
    }
}

fn file_error(path: &Path, message: &str) -> ConfigError {
    ConfigError::File {
        path: path.display().to_string(),
        message: message.to_string(),
    }
}
