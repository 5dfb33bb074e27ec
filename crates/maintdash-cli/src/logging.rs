// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! File-backed tracing. The TUI owns the terminal, so nothing is written to
//! stdout or stderr once the dashboard starts.

use anyhow::{Context, Result, anyhow};
use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "MAINTDASH_LOG";

/// Builds the filter, preferring `MAINTDASH_LOG` over the configured level.
pub fn env_filter(level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log level {level:?}; use an EnvFilter directive")),
    }
}

/// Installs the global subscriber. Keep the guard alive until exit or
/// buffered lines are lost.
pub fn init(level: &str, file: &Path) -> Result<WorkerGuard> {
    let directory = file
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = file
        .file_name()
        .ok_or_else(|| anyhow!("log file {} has no file name", file.display()))?;
    fs::create_dir_all(directory)
        .with_context(|| format!("create log directory {}", directory.display()))?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(env_filter(level)?)
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .try_init()
        .context("install tracing subscriber")?;

    Ok(guard)
}
