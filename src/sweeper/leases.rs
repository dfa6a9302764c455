// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Paperdock

//! In-use leases that exempt paths from sweeping.
//!
//! The sweep policy is purely age-based, and a long-running request (a slow
//! download, a conversion job re-reading its input) can hold a file past the
//! retention window. A caller that is still using a path takes a lease on
//! it; the sweeper skips leased paths and picks them up again on the first
//! pass after the lease is dropped. Leases are in-process and advisory —
//! nothing else stops an external writer or a second process.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Registry of paths currently exempt from sweeping.
///
/// Cloneable handle over shared state; clones observe the same leases.
#[derive(Debug, Clone, Default)]
pub struct FileLeases {
    inner: Arc<Mutex<HashMap<PathBuf, usize>>>,
}

impl FileLeases {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a lease on a path, pinning it until the returned guard drops.
    ///
    /// Leases are counted: a path stays pinned while at least one guard for
    /// it is alive. The path must be the exact stored path as returned by
    /// the upload store — matching is textual, not canonicalized.
    pub fn lease(&self, path: impl Into<PathBuf>) -> FileLease {
        let path = path.into();
        if let Ok(mut leases) = self.inner.lock() {
            *leases.entry(path.clone()).or_insert(0) += 1;
        }
        FileLease {
            registry: self.clone(),
            path,
        }
    }

    /// Whether a path currently holds at least one lease.
    pub fn is_leased(&self, path: &Path) -> bool {
        self.inner
            .lock()
            .map(|leases| leases.contains_key(path))
            .unwrap_or(false)
    }

    fn release(&self, path: &Path) {
        let Ok(mut leases) = self.inner.lock() else {
            return;
        };
        if let Some(count) = leases.get_mut(path) {
            *count -= 1;
            if *count == 0 {
                leases.remove(path);
            }
        }
    }
}

/// RAII guard for a single lease; releases on drop.
#[must_use = "the path loses its sweep exemption as soon as the lease is dropped"]
#[derive(Debug)]
pub struct FileLease {
    registry: FileLeases,
    path: PathBuf,
}

impl FileLease {
    /// The path this lease pins.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileLease {
    fn drop(&mut self) {
        self.registry.release(&self.path);
    }
}
