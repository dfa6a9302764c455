// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Paperdock

//! Error type shared by the upload store and the retention sweeper.
//!
//! The policy is asymmetric on purpose: operations that *write* (saving an
//! upload) propagate their errors to the caller, while operations that
//! *delete* (cleanup batches, sweep passes) log individual failures and keep
//! going. Only the loud half of that split surfaces this type.

use std::io;

/// Error type for file store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The path does not exist (or vanished between check and use).
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other I/O failure (disk full, permission denied, ...).
    #[error("I/O error: {0}")]
    Io(#[source] io::Error),
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::NotFound {
            StoreError::NotFound(e.to_string())
        } else {
            StoreError::Io(e)
        }
    }
}

/// Result type for file store operations.
pub type StoreResult<T> = Result<T, StoreError>;
