// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Zela conversational engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Zela configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ZelaConfig {
    /// Service identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// WhatsApp provider webhook and outbound API settings.
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,

    /// SaaS backend internal API settings.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Conversation state lifetime settings.
    #[serde(default)]
    pub conversation: ConversationConfig,

    /// Locale settings for phone normalization and local time.
    #[serde(default)]
    pub locale: LocaleConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the service.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "zela".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// WhatsApp provider integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WhatsAppConfig {
    /// Token echoed back during webhook subscription verification.
    /// `None` disables the GET verification endpoint.
    #[serde(default)]
    pub verify_token: Option<String>,

    /// Base URL of the provider's message-send endpoint.
    #[serde(default)]
    pub api_url: Option<String>,

    /// Bearer token for the provider API. `None` requires environment variable.
    #[serde(default)]
    pub access_token: Option<String>,

    /// Host address to bind the webhook server to.
    #[serde(default = "default_webhook_host")]
    pub host: String,

    /// Port to bind the webhook server to.
    #[serde(default = "default_webhook_port")]
    pub port: u16,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            verify_token: None,
            api_url: None,
            access_token: None,
            host: default_webhook_host(),
            port: default_webhook_port(),
        }
    }
}

fn default_webhook_host() -> String {
    "127.0.0.1".to_string()
}

fn default_webhook_port() -> u16 {
    8090
}

/// SaaS backend internal API configuration.
///
/// The directory and ledger collaborators are HTTP clients against this API.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Base URL of the backend internal API.
    #[serde(default = "default_backend_url")]
    pub base_url: String,

    /// Bearer token for the internal API. `None` requires environment variable.
    #[serde(default)]
    pub api_token: Option<String>,

    /// Per-request timeout in seconds. Requests fail fast; no retries.
    #[serde(default = "default_backend_timeout")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            api_token: None,
            timeout_secs: default_backend_timeout(),
        }
    }
}

fn default_backend_url() -> String {
    "http://127.0.0.1:3000/internal".to_string()
}

fn default_backend_timeout() -> u64 {
    10
}

/// Conversation state lifetime configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConversationConfig {
    /// Absolute record lifetime in hours. An abandoned conversation is
    /// dropped entirely after this window.
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u64,

    /// Idle window in minutes after which only the pending confirmation is
    /// cleared, leaving identity fields for a fast resume.
    #[serde(default = "default_inactivity_minutes")]
    pub inactivity_minutes: u64,

    /// Interval of the background sweep pass in seconds.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Minimum hours between cosmetic joke lines per conversation.
    #[serde(default = "default_joke_cooldown")]
    pub joke_cooldown_hours: u64,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            ttl_hours: default_ttl_hours(),
            inactivity_minutes: default_inactivity_minutes(),
            sweep_interval_secs: default_sweep_interval(),
            joke_cooldown_hours: default_joke_cooldown(),
        }
    }
}

fn default_ttl_hours() -> u64 {
    24
}

fn default_inactivity_minutes() -> u64 {
    30
}

fn default_sweep_interval() -> u64 {
    60
}

fn default_joke_cooldown() -> u64 {
    6
}

/// Locale configuration for phone normalization and the household clock.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LocaleConfig {
    /// Country code prefixed to national numbers (digits only).
    #[serde(default = "default_country_code")]
    pub country_code: String,

    /// Offset of the household's local clock from UTC, in whole hours.
    #[serde(default = "default_utc_offset")]
    pub utc_offset_hours: i32,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            country_code: default_country_code(),
            utc_offset_hours: default_utc_offset(),
        }
    }
}

fn default_country_code() -> String {
    "55".to_string()
}

fn default_utc_offset() -> i32 {
    -3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = ZelaConfig::default();
        assert_eq!(config.agent.name, "zela");
        assert_eq!(config.agent.log_level, "info");
        assert_eq!(config.whatsapp.port, 8090);
        assert_eq!(config.conversation.ttl_hours, 24);
        assert_eq!(config.conversation.inactivity_minutes, 30);
        assert_eq!(config.locale.country_code, "55");
        assert_eq!(config.locale.utc_offset_hours, -3);
    }

    #[test]
    fn unknown_top_level_key_is_rejected() {
        let toml_str = r#"
[agent]
name = "test"

[nonsense]
key = "value"
"#;
        assert!(toml::from_str::<ZelaConfig>(toml_str).is_err());
    }

    #[test]
    fn unknown_section_key_is_rejected() {
        let toml_str = r#"
[conversation]
ttl_hourz = 12
"#;
        assert!(toml::from_str::<ZelaConfig>(toml_str).is_err());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[whatsapp]
verify_token = "hunter2"
port = 9000
"#;
        let config: ZelaConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.whatsapp.verify_token.as_deref(), Some("hunter2"));
        assert_eq!(config.whatsapp.port, 9000);
        // Untouched sections keep their defaults.
        assert_eq!(config.backend.timeout_secs, 10);
        assert_eq!(config.conversation.sweep_interval_secs, 60);
    }
}
