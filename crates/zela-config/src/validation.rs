// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as digit-only country codes and lifetime ordering
//! between the absolute TTL and the inactivity window.

use crate::diagnostic::ConfigError;
use crate::model::ZelaConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &ZelaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.agent.name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "agent.name must not be empty".to_string(),
        });
    }

    // Webhook bind address.
    let host = config.whatsapp.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "whatsapp.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("whatsapp.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.whatsapp.port == 0 {
        errors.push(ConfigError::Validation {
            message: "whatsapp.port must not be 0".to_string(),
        });
    }

    if config.backend.base_url.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "backend.base_url must not be empty".to_string(),
        });
    }

    if config.backend.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "backend.timeout_secs must be at least 1".to_string(),
        });
    }

    // Conversation lifetimes: the inactivity window must be strictly inside
    // the absolute TTL, otherwise the sweep could never fire before expiry.
    if config.conversation.ttl_hours == 0 {
        errors.push(ConfigError::Validation {
            message: "conversation.ttl_hours must be at least 1".to_string(),
        });
    }
    if config.conversation.inactivity_minutes == 0 {
        errors.push(ConfigError::Validation {
            message: "conversation.inactivity_minutes must be at least 1".to_string(),
        });
    }
    if config.conversation.inactivity_minutes >= config.conversation.ttl_hours * 60 {
        errors.push(ConfigError::Validation {
            message: format!(
                "conversation.inactivity_minutes ({}) must be shorter than conversation.ttl_hours ({}h)",
                config.conversation.inactivity_minutes, config.conversation.ttl_hours
            ),
        });
    }
    if config.conversation.sweep_interval_secs < 5 {
        errors.push(ConfigError::Validation {
            message: format!(
                "conversation.sweep_interval_secs must be at least 5, got {}",
                config.conversation.sweep_interval_secs
            ),
        });
    }

    // Locale.
    let cc = config.locale.country_code.trim();
    if cc.is_empty() || !cc.chars().all(|c| c.is_ascii_digit()) {
        errors.push(ConfigError::Validation {
            message: format!("locale.country_code must be digits only, got `{cc}`"),
        });
    }
    if !(-12..=14).contains(&config.locale.utc_offset_hours) {
        errors.push(ConfigError::Validation {
            message: format!(
                "locale.utc_offset_hours must be between -12 and 14, got {}",
                config.locale.utc_offset_hours
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = ZelaConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_country_code_fails_validation() {
        let mut config = ZelaConfig::default();
        config.locale.country_code = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("country_code"))));
    }

    #[test]
    fn non_digit_country_code_fails_validation() {
        let mut config = ZelaConfig::default();
        config.locale.country_code = "+55".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn inactivity_longer_than_ttl_fails_validation() {
        let mut config = ZelaConfig::default();
        config.conversation.ttl_hours = 1;
        config.conversation.inactivity_minutes = 120;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("inactivity_minutes"))));
    }

    #[test]
    fn zero_port_fails_validation() {
        let mut config = ZelaConfig::default();
        config.whatsapp.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn out_of_range_utc_offset_fails_validation() {
        let mut config = ZelaConfig::default();
        config.locale.utc_offset_hours = 15;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn collects_multiple_errors() {
        let mut config = ZelaConfig::default();
        config.whatsapp.port = 0;
        config.locale.country_code = "abc".to_string();
        config.backend.timeout_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.len() >= 3, "expected all errors collected, got {}", errors.len());
    }
}
