// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Paperdock

//! Observability handle for the retention sweeper.
//!
//! The loop swallows pass failures by design, so liveness is not visible
//! from the outside without help. [`SweeperHealth`] records the outcome of
//! every pass; the embedding backend keeps a clone and serves
//! [`SweeperHealth::snapshot`] from its health endpoint.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Cloneable handle to the sweeper's run/health state.
#[derive(Debug, Clone, Default)]
pub struct SweeperHealth {
    inner: Arc<Mutex<HealthState>>,
}

#[derive(Debug, Default)]
struct HealthState {
    last_pass_at: Option<DateTime<Utc>>,
    last_pass_deleted: u64,
    passes: u64,
    files_deleted: u64,
    last_error: Option<String>,
    last_error_at: Option<DateTime<Utc>>,
}

/// Point-in-time view of the sweeper's state, serializable for health
/// endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct SweeperStatus {
    /// When the last successful pass completed. `None` until the first
    /// pass finishes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_pass_at: Option<DateTime<Utc>>,
    /// Files and directories deleted by the last successful pass.
    pub last_pass_deleted: u64,
    /// Successful passes since startup.
    pub passes: u64,
    /// Cumulative deletions since startup.
    pub files_deleted: u64,
    /// Most recent pass failure, if any. Sticky: a later success does not
    /// clear it, `last_error_at` tells how stale it is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    /// When the most recent pass failure happened.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error_at: Option<DateTime<Utc>>,
}

impl SweeperHealth {
    /// Create a fresh handle with no recorded passes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed pass and how many entries it deleted.
    pub(crate) fn record_pass(&self, deleted: usize) {
        let Ok(mut state) = self.inner.lock() else {
            return;
        };
        state.last_pass_at = Some(Utc::now());
        state.last_pass_deleted = deleted as u64;
        state.passes += 1;
        state.files_deleted += deleted as u64;
    }

    /// Record a pass that failed before completing.
    pub(crate) fn record_failure(&self, error: impl std::fmt::Display) {
        let Ok(mut state) = self.inner.lock() else {
            return;
        };
        state.last_error = Some(error.to_string());
        state.last_error_at = Some(Utc::now());
    }

    /// Current state, for the embedding app's health endpoint.
    pub fn snapshot(&self) -> SweeperStatus {
        let state = self.inner.lock();
        match state {
            Ok(state) => SweeperStatus {
                last_pass_at: state.last_pass_at,
                last_pass_deleted: state.last_pass_deleted,
                passes: state.passes,
                files_deleted: state.files_deleted,
                last_error: state.last_error.clone(),
                last_error_at: state.last_error_at,
            },
            Err(_) => SweeperStatus {
                last_pass_at: None,
                last_pass_deleted: 0,
                passes: 0,
                files_deleted: 0,
                last_error: Some("health state lock poisoned".to_string()),
                last_error_at: None,
            },
        }
    }
}
