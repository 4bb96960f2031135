// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::config::{APP_NAME, default_log_level};

/// Installs the global subscriber. The TUI owns the terminal, so output
/// always goes to `log_path`.
///
/// Priority: `RUST_LOG` > `--debug` > `[logging].level` > "info".
pub fn init(debug_flag: bool, config_level: Option<&str>, log_path: &Path) -> Result<()> {
    let directive = filter_directive(std::env::var("RUST_LOG").ok(), debug_flag, config_level);
    let filter = EnvFilter::try_new(&directive)
        .with_context(|| format!("invalid log filter {directive:?}"))?;

    if let Some(parent) = log_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("open log file {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .compact()
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))?;

    tracing::debug!(
        app = APP_NAME,
        version = env!("CARGO_PKG_VERSION"),
        path = %log_path.display(),
        "logging initialised"
    );
    Ok(())
}

fn filter_directive(
    rust_log: Option<String>,
    debug_flag: bool,
    config_level: Option<&str>,
) -> String {
    if let Some(value) = rust_log.filter(|value| !value.trim().is_empty()) {
        return value;
    }
    if debug_flag {
        return "debug".to_owned();
    }
    config_level.unwrap_or(default_log_level()).to_owned()
}
