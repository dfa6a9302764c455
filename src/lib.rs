// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Paperdock

//! Paperdock File Store - Upload Storage and Retention Sweeping
//!
//! This crate provides the file-storage utilities for the Paperdock web
//! backend: persisting uploaded byte streams under collision-free names,
//! and a supervised background sweeper that reclaims stale entries from
//! the watched storage roots.
//!
//! ## Modules
//!
//! - `storage` - Watched-root layout and upload persistence
//! - `sweeper` - Periodic retention sweep, lease exemptions, health state
//! - `config` - Environment variable names used by the daemon binary
//! - `error` - Crate-wide error type

pub mod config;
pub mod error;
pub mod storage;
pub mod sweeper;
