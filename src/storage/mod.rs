// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Paperdock

//! # File Storage Module
//!
//! Persists uploaded files under collision-free names in two watched
//! directories beneath a configurable root.
//!
//! ## Storage Layout
//!
//! ```text
//! <root>/
//!   temp/
//!     {uuid}{ext}        # conversion scratch files and job directories
//!     {job-dir}/...      # whole directories, swept as a unit
//!   uploads/
//!     {uuid}{ext}        # persisted uploads the backend records in its DB
//! ```
//!
//! ## Important Notes
//!
//! - Files carry no metadata beyond what the filesystem provides; the
//!   retention sweeper keys off mtime alone.
//! - Nothing here tracks which paths the backend still references — the
//!   caller persists path associations itself, and can take a sweep lease
//!   (see [`crate::sweeper`]) for files it is actively serving.
//! - Both directories are shared, unsynchronized state between uploaders
//!   and the sweeper; safety rests on the atomicity of the individual
//!   filesystem operations.

pub mod paths;
pub mod uploads;

pub use paths::{StorePaths, StoreRoot};
pub use uploads::{unique_name, UploadStore};
