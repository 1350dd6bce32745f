// SPDX-FileCopyrightText: 2026 Docbulk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for docbulk.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, `DOCBULK_` environment
//! variable overrides, and miette diagnostics with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use docbulk_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("ops per batch: {}", config.bulk.ops_per_batch);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use tracing::debug;

pub use diagnostic::{render_errors, render_to_string, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{BulkConfig, DocbulkConfig, StorageConfig};

/// Load configuration from the file hierarchy and validate it.
///
/// Figment errors are converted to diagnostics with source spans and typo
/// suggestions; semantic problems come back as `ConfigError::Validation`.
pub fn load_and_validate() -> Result<DocbulkConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            debug!(
                ops_per_batch = config.bulk.ops_per_batch,
                database_path = %config.storage.database_path,
                "configuration loaded"
            );
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(
            err,
            &collect_toml_sources(),
        )),
    }
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<DocbulkConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Read every config file that exists, keyed by the path figment reports.
fn collect_toml_sources() -> Vec<(String, String)> {
    let local = std::env::current_dir()
        .map(|d| d.join(loader::LOCAL_CONFIG_PATH))
        .unwrap_or_else(|_| loader::LOCAL_CONFIG_PATH.into());

    [
        Some(local),
        loader::user_config_path(),
        Some(loader::SYSTEM_CONFIG_PATH.into()),
    ]
    .into_iter()
    .flatten()
    .filter_map(|path| {
        std::fs::read_to_string(&path)
            .ok()
            .map(|content| (path.display().to_string(), content))
    })
    .collect()
}
