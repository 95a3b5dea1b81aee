// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Lookup order: `./tiergate.toml` > `~/.config/tiergate/tiergate.toml` >
//! `/etc/tiergate/tiergate.toml`, with `TIERGATE_` environment overrides on top.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use strum::IntoEnumIterator;
use tiergate_core::Backend;

use crate::model::TiergateConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/tiergate/tiergate.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "tiergate.toml";

/// Per-user config file under the XDG config directory, if one is known.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tiergate").join(LOCAL_CONFIG_FILE))
}

/// Build the Figment for the standard hierarchy without extracting it.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/tiergate/tiergate.toml`
/// 3. `~/.config/tiergate/tiergate.toml`
/// 4. `./tiergate.toml`
/// 5. `TIERGATE_*` environment variables
pub fn build_figment() -> Figment {
    let mut figment = Figment::new()
        .merge(Serialized::defaults(TiergateConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH));
    if let Some(user) = user_config_path() {
        figment = figment.merge(Toml::file(user));
    }
    figment.merge(Toml::file(LOCAL_CONFIG_FILE)).merge(env_provider())
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<TiergateConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from an inline TOML string over the defaults (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<TiergateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TiergateConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TiergateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TiergateConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Environment provider with explicit section mapping.
///
/// Splitting on `_` would turn `TIERGATE_ROUTER_IN_PERIMETER_SOURCE` into
/// `router.in.perimeter.source`, so keys are mapped section by section.
fn env_provider() -> Env {
    Env::prefixed("TIERGATE_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a prefix-stripped env var name to a dotted config key.
///
/// Figment passes the name in its original case, so it is lowercased first.
pub(crate) fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in ["service", "router", "telemetry"] {
        if let Some(field) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{field}");
        }
    }

    if let Some(rest) = key.strip_prefix("backends_") {
        for backend in Backend::iter() {
            let name = backend.as_ref();
            if let Some(field) = rest.strip_prefix(name).and_then(|r| r.strip_prefix('_')) {
                return format!("backends.{name}.{field}");
            }
        }
    }

    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_section_keys_with_underscores() {
        assert_eq!(map_env_key("service_log_level"), "service.log_level");
        assert_eq!(
            map_env_key("router_in_perimeter_source"),
            "router.in_perimeter_source"
        );
        assert_eq!(map_env_key("telemetry_max_history"), "telemetry.max_history");
    }

    #[test]
    fn maps_nested_backend_keys() {
        assert_eq!(
            map_env_key("backends_api_premium_enabled"),
            "backends.api_premium.enabled"
        );
        assert_eq!(
            map_env_key("backends_self_hosted_unit_cost_per_1k"),
            "backends.self_hosted.unit_cost_per_1k"
        );
    }

    #[test]
    fn maps_keys_in_original_env_case() {
        assert_eq!(
            map_env_key("ROUTER_IN_PERIMETER_SOURCE"),
            "router.in_perimeter_source"
        );
        assert_eq!(
            map_env_key("BACKENDS_API_ECONOMY_ENABLED"),
            "backends.api_economy.enabled"
        );
        assert_eq!(map_env_key("Service_Log_Level"), "service.log_level");
    }

    #[test]
    fn leaves_unknown_keys_alone() {
        assert_eq!(map_env_key("bogus_key"), "bogus_key");
        assert_eq!(map_env_key("backends_gpt_enabled"), "backends_gpt_enabled");
    }
}
