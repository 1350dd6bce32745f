// SPDX-FileCopyrightText: 2026 Docbulk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use docbulk_core::MAX_OPS_PER_BATCH;

use crate::diagnostic::ConfigError;
use crate::model::DocbulkConfig;

/// Validate a deserialized configuration.
///
/// Collects every problem instead of stopping at the first one.
pub fn validate_config(config: &DocbulkConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.bulk.ops_per_batch > MAX_OPS_PER_BATCH {
        errors.push(ConfigError::Validation {
            message: format!(
                "bulk.ops_per_batch must not exceed {MAX_OPS_PER_BATCH}, got {}",
                config.bulk.ops_per_batch
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
