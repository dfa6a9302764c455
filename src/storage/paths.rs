// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Paperdock

//! Path constants and utilities for the watched storage layout.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StoreResult;

/// Default storage root when none is configured.
///
/// Both watched directories are created relative to it, matching the
/// backend's historical `temp/` + `uploads/` layout next to the process.
pub const DEFAULT_ROOT: &str = ".";

/// Name of the transient-file directory under the root.
pub const TEMP_DIR_NAME: &str = "temp";

/// Name of the persisted-upload directory under the root.
pub const UPLOADS_DIR_NAME: &str = "uploads";

/// The two watched roots files can be stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreRoot {
    /// Scratch space for in-flight conversion work; swept aggressively
    /// (files and whole directories).
    Temp,
    /// Finished uploads handed back to the backend; only loose files are
    /// swept, directories are left alone.
    Uploads,
}

/// Storage path utilities for the watched directories.
#[derive(Debug, Clone)]
pub struct StorePaths {
    root: PathBuf,
}

impl Default for StorePaths {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT)
    }
}

impl StorePaths {
    /// Create a new StorePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory both watched directories live under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for transient files.
    pub fn temp_dir(&self) -> PathBuf {
        self.root.join(TEMP_DIR_NAME)
    }

    /// Directory for persisted uploads.
    pub fn uploads_dir(&self) -> PathBuf {
        self.root.join(UPLOADS_DIR_NAME)
    }

    /// Directory for the given watched root.
    pub fn dir(&self, root: StoreRoot) -> PathBuf {
        match root {
            StoreRoot::Temp => self.temp_dir(),
            StoreRoot::Uploads => self.uploads_dir(),
        }
    }

    /// Create both watched directories.
    ///
    /// Safe to call multiple times (idempotent); every save and every sweep
    /// pass calls it before touching the filesystem.
    pub fn ensure_all(&self) -> StoreResult<()> {
        let dirs = [self.temp_dir(), self.uploads_dir()];

        for dir in dirs {
            fs::create_dir_all(&dir)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_root_is_working_directory() {
        let paths = StorePaths::default();
        assert_eq!(paths.root(), Path::new("."));
        assert_eq!(paths.temp_dir(), PathBuf::from("./temp"));
        assert_eq!(paths.uploads_dir(), PathBuf::from("./uploads"));
    }

    #[test]
    fn custom_root_for_testing() {
        let paths = StorePaths::new("/tmp/test-store");
        assert_eq!(paths.root(), Path::new("/tmp/test-store"));
        assert_eq!(paths.temp_dir(), PathBuf::from("/tmp/test-store/temp"));
        assert_eq!(
            paths.uploads_dir(),
            PathBuf::from("/tmp/test-store/uploads")
        );
    }

    #[test]
    fn dir_selects_the_watched_root() {
        let paths = StorePaths::new("/srv/data");
        assert_eq!(paths.dir(StoreRoot::Temp), paths.temp_dir());
        assert_eq!(paths.dir(StoreRoot::Uploads), paths.uploads_dir());
    }

    #[test]
    fn ensure_all_creates_both_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = StorePaths::new(tmp.path());

        assert!(!paths.temp_dir().exists());
        assert!(!paths.uploads_dir().exists());

        paths.ensure_all().unwrap();
        assert!(paths.temp_dir().is_dir());
        assert!(paths.uploads_dir().is_dir());

        // Idempotent on a populated tree
        paths.ensure_all().unwrap();
        assert!(paths.temp_dir().is_dir());
    }
}
