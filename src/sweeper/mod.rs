// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Paperdock

//! # Retention Sweeper
//!
//! Background task that periodically deletes stale entries from the two
//! watched storage roots. Anything a request handler leaves behind in
//! `temp/` or `uploads/` is reclaimed once it outlives the retention
//! window, so the roots never need manual housekeeping.
//!
//! ## Strategy
//!
//! Every `interval` (default 30 min) the sweeper runs one pass:
//! 1. Ensures both watched roots exist (first pass on a fresh install
//!    creates them and removes nothing).
//! 2. Scans the direct children of each root and deletes every entry whose
//!    mtime is older than `now - retention` (default 1 h), subject to the
//!    per-root [`SweepPolicy`].
//! 3. Skips entries currently held by a [`FileLease`], and skips (with a
//!    `warn` log) entries that fail mid-scan, e.g. vanished or unreadable.
//!
//! The scan is not recursive: nested entries live or die with their
//! top-level directory. A pass does blocking filesystem work and yields
//! only at the interval sleep in between.
//!
//! ## Shutdown
//!
//! Uses `tokio_util::sync::CancellationToken` for graceful shutdown. The
//! token is honored between passes, never mid-scan, so a cancelled sweeper
//! finishes the pass it is in and then exits.

use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::StoreResult;
use crate::storage::{StorePaths, StoreRoot};

pub mod health;
pub mod leases;

pub use health::{SweeperHealth, SweeperStatus};
pub use leases::{FileLease, FileLeases};

/// Default retention window before an entry becomes sweep-eligible.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(60 * 60);

/// Default interval between sweep passes.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// What a sweep pass may delete under a watched root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepPolicy {
    /// Expired files and expired directories (removed whole) are deleted.
    FilesAndDirectories,
    /// Only expired regular files are deleted; directories are never
    /// touched regardless of age.
    FilesOnly,
}

impl SweepPolicy {
    /// The policy applied to each watched root.
    ///
    /// The temp root holds only disposable intermediates, so stale
    /// directory trees go with their files. The uploads root may contain
    /// subdirectories owned by other features; those are left alone.
    pub fn for_root(root: StoreRoot) -> Self {
        match root {
            StoreRoot::Temp => SweepPolicy::FilesAndDirectories,
            StoreRoot::Uploads => SweepPolicy::FilesOnly,
        }
    }
}

/// Background sweeper that reclaims stale entries from the watched roots.
pub struct RetentionSweeper {
    paths: StorePaths,
    retention: Duration,
    interval: Duration,
    leases: FileLeases,
    health: SweeperHealth,
}

impl RetentionSweeper {
    /// Create a sweeper over the given paths with the default retention
    /// window and pass interval.
    pub fn new(paths: StorePaths) -> Self {
        Self::with_config(paths, DEFAULT_RETENTION, DEFAULT_SWEEP_INTERVAL)
    }

    /// Create a sweeper with an explicit retention window and pass
    /// interval.
    pub fn with_config(paths: StorePaths, retention: Duration, interval: Duration) -> Self {
        Self {
            paths,
            retention,
            interval,
            leases: FileLeases::new(),
            health: SweeperHealth::new(),
        }
    }

    /// Handle to the lease registry. Callers that need a file to survive
    /// the next pass take a lease on it and drop the lease when done.
    pub fn leases(&self) -> FileLeases {
        self.leases.clone()
    }

    /// Handle to the sweeper's health state, for the embedding app's
    /// health endpoint.
    pub fn health(&self) -> SweeperHealth {
        self.health.clone()
    }

    /// Run the sweep loop until the cancellation token is triggered.
    ///
    /// Should be spawned as a background task:
    /// ```rust,ignore
    /// tokio::spawn(sweeper.run(shutdown.clone()));
    /// ```
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            interval_secs = self.interval.as_secs(),
            retention_secs = self.retention.as_secs(),
            "Retention sweeper starting"
        );

        loop {
            if shutdown.is_cancelled() {
                info!("Retention sweeper shutting down");
                return;
            }

            self.sweep_step();

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {},
                _ = shutdown.cancelled() => {
                    info!("Retention sweeper shutting down");
                    return;
                }
            }
        }
    }

    /// Execute one pass and record its outcome. A failing pass never kills
    /// the loop; the next interval retries from scratch.
    fn sweep_step(&self) {
        match self.run_pass() {
            Ok(deleted) => self.health.record_pass(deleted),
            Err(e) => {
                warn!(error = %e, "Retention sweep pass failed");
                self.health.record_failure(&e);
            }
        }
    }

    /// One full scan-and-delete cycle over both watched roots. Returns the
    /// number of entries deleted.
    ///
    /// Usable directly (without the loop) by deployments that schedule
    /// sweeps externally, e.g. from cron.
    pub fn run_pass(&self) -> StoreResult<usize> {
        self.paths.ensure_all()?;

        let cutoff = SystemTime::now()
            .checked_sub(self.retention)
            .unwrap_or(SystemTime::UNIX_EPOCH);

        let mut deleted = 0;
        deleted += self.sweep_root(StoreRoot::Temp, cutoff)?;
        deleted += self.sweep_root(StoreRoot::Uploads, cutoff)?;

        if deleted > 0 {
            info!(deleted, "Retention sweep removed expired entries");
        }
        Ok(deleted)
    }

    /// Sweep the direct children of one watched root.
    fn sweep_root(&self, root: StoreRoot, cutoff: SystemTime) -> StoreResult<usize> {
        let policy = SweepPolicy::for_root(root);
        let dir = self.paths.dir(root);

        let mut deleted = 0;
        for entry in fs::read_dir(&dir)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(
                        dir = %dir.display(),
                        error = %e,
                        "Retention sweep: unreadable directory entry"
                    );
                    continue;
                }
            };

            let path = entry.path();
            match self.sweep_entry(policy, &path, cutoff) {
                Ok(true) => deleted += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "Retention sweep: skipping entry"
                    );
                }
            }
        }
        Ok(deleted)
    }

    /// Delete one entry if it is expired and the policy allows it. Returns
    /// whether a deletion happened.
    fn sweep_entry(
        &self,
        policy: SweepPolicy,
        path: &Path,
        cutoff: SystemTime,
    ) -> StoreResult<bool> {
        // Leased paths are exempt before any metadata is read.
        if self.leases.is_leased(path) {
            return Ok(false);
        }

        let meta = fs::metadata(path)?;
        if meta.modified()? >= cutoff {
            return Ok(false);
        }

        if meta.is_dir() {
            if policy != SweepPolicy::FilesAndDirectories {
                return Ok(false);
            }
            fs::remove_dir_all(path)?;
            info!(path = %path.display(), "Retention sweep: removed expired directory");
            return Ok(true);
        }

        if !meta.is_file() {
            return Ok(false);
        }
        fs::remove_file(path)?;
        info!(path = %path.display(), "Retention sweep: removed expired file");
        Ok(true)
    }
}
