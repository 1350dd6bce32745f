// SPDX-FileCopyrightText: 2026 Docbulk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `./docbulk.toml` > `~/.config/docbulk/docbulk.toml` >
//! `/etc/docbulk/docbulk.toml`, with `DOCBULK_` environment variables on top.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed here

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::DocbulkConfig;

pub(crate) const SYSTEM_CONFIG_PATH: &str = "/etc/docbulk/docbulk.toml";
pub(crate) const LOCAL_CONFIG_PATH: &str = "docbulk.toml";

/// Path of the per-user config file, if the platform has a config directory.
pub(crate) fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("docbulk").join("docbulk.toml"))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/docbulk/docbulk.toml`
/// 3. `~/.config/docbulk/docbulk.toml`
/// 4. `./docbulk.toml`
/// 5. `DOCBULK_*` environment variables
pub fn load_config() -> Result<DocbulkConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<DocbulkConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DocbulkConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<DocbulkConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DocbulkConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(DocbulkConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_provider())
}

/// Environment provider mapping `DOCBULK_<SECTION>_<KEY>` to `section.key`.
///
/// Uses `Env::map()` rather than `Env::split("_")`: keys such as
/// `ops_per_batch` contain underscores and must stay intact.
fn env_provider() -> Env {
    Env::prefixed("DOCBULK_").map(|key| {
        key.as_str()
            .replacen("bulk_", "bulk.", 1)
            .replacen("storage_", "storage.", 1)
            .into()
    })
}
