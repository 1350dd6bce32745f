// SPDX-FileCopyrightText: 2026 Docbulk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for docbulk.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported instead of silently falling back to a default.

use docbulk_core::{DocbulkError, MAX_OPS_PER_BATCH};
use serde::{Deserialize, Serialize};

/// Top-level docbulk configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DocbulkConfig {
    /// Batching settings.
    #[serde(default)]
    pub bulk: BulkConfig,

    /// Embedded SQLite document store settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Batching configuration for a bulk accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BulkConfig {
    /// Number of operations queued before a batch is submitted.
    ///
    /// Zero means "use the protocol maximum". Values above
    /// [`MAX_OPS_PER_BATCH`] are rejected because the database would refuse
    /// the whole batch.
    #[serde(default = "default_ops_per_batch")]
    pub ops_per_batch: usize,
}

impl BulkConfig {
    pub fn with_ops_per_batch(ops_per_batch: usize) -> Self {
        Self { ops_per_batch }
    }

    /// Batch size after applying the zero default and the protocol ceiling.
    pub fn effective_ops_per_batch(&self) -> Result<usize, DocbulkError> {
        match self.ops_per_batch {
            0 => Ok(MAX_OPS_PER_BATCH),
            n if n > MAX_OPS_PER_BATCH => Err(DocbulkError::Config(format!(
                "bulk.ops_per_batch must not exceed {MAX_OPS_PER_BATCH}, got {n}"
            ))),
            n => Ok(n),
        }
    }
}

impl Default for BulkConfig {
    fn default() -> Self {
        Self {
            ops_per_batch: default_ops_per_batch(),
        }
    }
}

fn default_ops_per_batch() -> usize {
    MAX_OPS_PER_BATCH
}

/// Storage backend configuration for the SQLite document store.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,

    /// How long a writer waits on a locked database, in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("docbulk").join("docbulk.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("docbulk.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

fn default_busy_timeout_ms() -> u64 {
    5000
}
