// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation.
//!
//! Catches semantic problems serde cannot express: negative prices, an empty
//! telemetry bound, or a configuration that leaves nothing to route to.

use strum::IntoEnumIterator;
use tiergate_core::Backend;

use crate::diagnostic::ConfigError;
use crate::model::TiergateConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every problem instead of stopping at the first one.
pub fn validate_config(config: &TiergateConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut invalid = |message: String| errors.push(ConfigError::Validation { message });

    let level = config.service.log_level.trim().to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        invalid(format!(
            "service.log_level `{}` is not one of {}",
            config.service.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.router.in_perimeter_source.trim().is_empty() {
        invalid("router.in_perimeter_source must not be empty".to_string());
    }

    for backend in Backend::iter() {
        if let Some(cost) = config.backends.get(backend).unit_cost_per_1k
            && (!cost.is_finite() || cost < 0.0)
        {
            invalid(format!(
                "backends.{backend}.unit_cost_per_1k must be a non-negative number, got {cost}"
            ));
        }
    }

    if !Backend::iter().any(|b| config.backends.is_enabled(b)) {
        invalid("at least one backend under [backends] must be enabled".to_string());
    }

    if config.telemetry.max_history == 0 {
        invalid("telemetry.max_history must be at least 1".to_string());
    }

    if config.telemetry.forecast_days == 0 {
        invalid("telemetry.forecast_days must be at least 1".to_string());
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

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&TiergateConfig::default()).is_ok());
    }

    #[test]
    fn negative_price_fails_validation() {
        let mut config = TiergateConfig::default();
        config.backends.api_balanced.unit_cost_per_1k = Some(-0.5);
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "backends.api_balanced.unit_cost_per_1k"));
    }

    #[test]
    fn all_backends_disabled_fails_validation() {
        let mut config = TiergateConfig::default();
        for backend in Backend::iter() {
            config.backends.get_mut(backend).enabled = false;
        }
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "at least one backend"));
    }

    #[test]
    fn zero_history_and_bad_level_are_both_reported() {
        let mut config = TiergateConfig::default();
        config.telemetry.max_history = 0;
        config.service.log_level = "loud".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(has_error(&errors, "max_history"));
        assert!(has_error(&errors, "log_level"));
    }

    #[test]
    fn blank_perimeter_source_fails_validation() {
        let mut config = TiergateConfig::default();
        config.router.in_perimeter_source = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "in_perimeter_source"));
    }
}
