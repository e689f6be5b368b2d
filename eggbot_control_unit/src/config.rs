//! Configuration and pattern file loading.
//!
//! Thin layer over `eggbot_common::config`: parse, validate, and log what
//! was loaded.

use crate::error::ControlError;
use eggbot_common::config::{ConfigError, ConfigLoader, EggbotConfig};
use eggbot_common::control_unit::pattern::Pattern;
use std::path::Path;
use tracing::info;

/// Load and validate `eggbot.toml`.
///
/// # Errors
/// `ControlError::Config` when the file is missing, malformed or invalid.
pub fn load_config(path: &Path) -> Result<EggbotConfig, ControlError> {
    let config = EggbotConfig::load(path)?;
    config.validate()?;
    info!(
        path = %path.display(),
        service = %config.shared.service_name,
        "Configuration loaded"
    );
    Ok(config)
}

/// Parse and validate `eggbot.toml` contents.
pub fn load_config_from_str(content: &str) -> Result<EggbotConfig, ControlError> {
    let config = EggbotConfig::from_toml(content)?;
    config.validate()?;
    Ok(config)
}

/// Load and validate a pattern file.
///
/// # Errors
/// `ControlError::Config` when the file is missing, malformed or has an
/// invalid step.
pub fn load_pattern(path: &Path) -> Result<Pattern, ControlError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::FileNotFound
        } else {
            ConfigError::ParseError(e.to_string())
        }
    })?;
    let pattern = Pattern::from_toml(&content)?;
    info!(
        path = %path.display(),
        pattern = %pattern.name,
        steps = pattern.steps.len(),
        "Pattern loaded"
    );
    Ok(pattern)
}
