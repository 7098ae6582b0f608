// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./zela.toml` > `~/.config/zela/zela.toml` > `/etc/zela/zela.toml`
//! with environment variable overrides via `ZELA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::ZelaConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/zela/zela.toml` (system-wide)
/// 3. `~/.config/zela/zela.toml` (user XDG config)
/// 4. `./zela.toml` (local directory)
/// 5. `ZELA_*` environment variables
pub fn load_config() -> Result<ZelaConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<ZelaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ZelaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ZelaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ZelaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ZelaConfig::default()))
        .merge(Toml::file("/etc/zela/zela.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("zela/zela.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("zela.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `ZELA_WHATSAPP_VERIFY_TOKEN` must map to
/// `whatsapp.verify_token`, not `whatsapp.verify.token`.
fn env_provider() -> Env {
    Env::prefixed("ZELA_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: ZELA_WHATSAPP_VERIFY_TOKEN -> "whatsapp_verify_token"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("whatsapp_", "whatsapp.", 1)
            .replacen("backend_", "backend.", 1)
            .replacen("conversation_", "conversation.", 1)
            .replacen("locale_", "locale.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_from_str_applies_overrides() {
        let config = load_config_from_str(
            r#"
[agent]
log_level = "debug"

[locale]
country_code = "351"
"#,
        )
        .unwrap();
        assert_eq!(config.agent.log_level, "debug");
        assert_eq!(config.locale.country_code, "351");
        assert_eq!(config.agent.name, "zela");
    }

    #[test]
    fn load_from_str_empty_is_all_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.conversation.ttl_hours, 24);
        assert_eq!(config.whatsapp.host, "127.0.0.1");
    }

    #[test]
    fn env_mapping_targets_section_dot_key() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("ZELA_WHATSAPP_VERIFY_TOKEN", "tok-123");
            jail.set_env("ZELA_CONVERSATION_INACTIVITY_MINUTES", "15");
            let config: ZelaConfig = Figment::new()
                .merge(Serialized::defaults(ZelaConfig::default()))
                .merge(env_provider())
                .extract()?;
            assert_eq!(config.whatsapp.verify_token.as_deref(), Some("tok-123"));
            assert_eq!(config.conversation.inactivity_minutes, 15);
            Ok(())
        });
    }
}
