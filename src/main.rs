// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Paperdock

//! Retention sweeper daemon.
//!
//! Standalone process that runs the background sweep loop over the storage
//! roots until Ctrl-C. The library never reads the environment; this binary
//! is the single place configuration is loaded from it.

use std::env;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use paperdock_file_store::config::{
    LOG_FORMAT_ENV, STORAGE_ROOT_ENV, SWEEP_INTERVAL_SECS_ENV, SWEEP_RETENTION_SECS_ENV,
};
use paperdock_file_store::storage::StorePaths;
use paperdock_file_store::sweeper::{RetentionSweeper, DEFAULT_RETENTION, DEFAULT_SWEEP_INTERVAL};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let format = env::var(LOG_FORMAT_ENV).unwrap_or_else(|_| "pretty".to_string());

    if format == "json" {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Read a duration in whole seconds from the environment, falling back to
/// the default when the variable is unset or unparseable.
fn env_secs(var: &str, default: Duration) -> Duration {
    match env::var(var) {
        Ok(raw) => match raw.parse::<u64>() {
            Ok(secs) => Duration::from_secs(secs),
            Err(_) => {
                warn!(var, value = %raw, "Ignoring unparseable duration, using default");
                default
            }
        },
        Err(_) => default,
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let paths = env::var(STORAGE_ROOT_ENV)
        .map(StorePaths::new)
        .unwrap_or_default();
    let retention = env_secs(SWEEP_RETENTION_SECS_ENV, DEFAULT_RETENTION);
    let interval = env_secs(SWEEP_INTERVAL_SECS_ENV, DEFAULT_SWEEP_INTERVAL);

    info!(
        root = %paths.root().display(),
        "Retention sweeper daemon starting"
    );

    let sweeper = RetentionSweeper::with_config(paths, retention, interval);
    let health = sweeper.health();
    let shutdown = CancellationToken::new();
    let task = tokio::spawn(sweeper.run(shutdown.clone()));

    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");

    info!("Shutdown signal received");
    shutdown.cancel();
    if let Err(e) = task.await {
        warn!(error = %e, "Sweeper task did not shut down cleanly");
    }

    let status = health.snapshot();
    info!(
        passes = status.passes,
        files_deleted = status.files_deleted,
        "Retention sweeper daemon stopped"
    );
}
