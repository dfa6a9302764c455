// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Paperdock

//! # Runtime Configuration Constants
//!
//! This module defines environment variable names and default values used by
//! the sweeper daemon. Configuration is loaded from the environment at
//! startup; the library itself never touches the environment — `StorePaths`
//! and `RetentionSweeper` take explicit values at construction time.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `STORAGE_ROOT` | Directory under which `temp/` and `uploads/` live | `.` |
//! | `SWEEP_RETENTION_SECS` | Age at which a file becomes sweep-eligible | `3600` |
//! | `SWEEP_INTERVAL_SECS` | Sleep between sweep passes | `1800` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

/// Environment variable name for the storage root directory.
///
/// The two watched roots (`temp/` for transient conversion scratch space,
/// `uploads/` for persisted uploads) are created beneath this directory.
///
/// # Default
/// `.` (the daemon's working directory, matching the backend's layout)
pub const STORAGE_ROOT_ENV: &str = "STORAGE_ROOT";

/// Environment variable name for the retention window, in seconds.
pub const SWEEP_RETENTION_SECS_ENV: &str = "SWEEP_RETENTION_SECS";

/// Environment variable name for the interval between passes, in seconds.
pub const SWEEP_INTERVAL_SECS_ENV: &str = "SWEEP_INTERVAL_SECS";

/// Environment variable name for the log output format (`json` or `pretty`).
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";
