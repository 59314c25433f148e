// SPDX-FileCopyrightText: 2026 Banana Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./banana.toml` > `~/.config/banana/banana.toml` > `/etc/banana/banana.toml`
//! with environment variable overrides via `BANANA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::BananaConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/banana/banana.toml` (system-wide)
/// 3. `~/.config/banana/banana.toml` (user XDG config)
/// 4. `./banana.toml` (local directory)
/// 5. `BANANA_*` environment variables
pub fn load_config() -> Result<BananaConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
pub fn load_config_from_str(toml_content: &str) -> Result<BananaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BananaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<BananaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BananaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(BananaConfig::default()))
        .merge(Toml::file("/etc/banana/banana.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("banana/banana.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("banana.toml"))
        .merge(env_provider())
}

/// Environment provider mapping `BANANA_<SECTION>_<KEY>` to `section.key`.
///
/// Figment hands `map` the key in its original case, so it is lowercased
/// before the section prefix is split off. Only the first underscore after a
/// known section name becomes a dot: `BANANA_STORAGE_DATABASE_PATH` maps to
/// `storage.database_path`.
fn env_provider() -> Env {
    Env::prefixed("BANANA_").map(|key| env_key_to_path(key.as_str()).into())
}

const SECTIONS: [&str; 3] = ["log", "storage", "executor"];

fn env_key_to_path(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in SECTIONS {
        if let Some(field) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{field}");
        }
    }
    key
}
