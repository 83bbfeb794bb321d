//! Configuration validation.

use crate::config::Config;
use crate::error::{Error, Result};

/// Validate configuration value ranges.
pub fn validate_config(config: &Config) -> Result<()> {
    if !(0.0..=1.0).contains(&config.defaults.confidence_threshold) {
        return Err(Error::ConfigValidation {
            message: format!(
                "defaults.confidence_threshold must be between 0.0 and 1.0, got {}",
                config.defaults.confidence_threshold
            ),
        });
    }

    if config.defaults.top_k == 0 {
        return Err(Error::ConfigValidation {
            message: "defaults.top_k must be >= 1".to_string(),
        });
    }

    if config.defaults.min_frames_required == 0 {
        return Err(Error::ConfigValidation {
            message: "defaults.min_frames_required must be >= 1".to_string(),
        });
    }

    if config.defaults.formats.is_empty() {
        return Err(Error::ConfigValidation {
            message: "defaults.formats must name at least one output format".to_string(),
        });
    }

    config
        .repeat
        .to_options()
        .validate()
        .map_err(|message| Error::ConfigValidation { message })?;

    Ok(())
}
