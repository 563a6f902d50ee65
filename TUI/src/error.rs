use thiserror::Error;

use crate::catalog::VisualizationId;

/// Top-level error type
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration loading/validation error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// A catalog entry references a panel nobody renders.
    #[error("No panel registered for visualization '{0}'")]
    MissingPanel(VisualizationId),

    /// A catalog trigger could not be compiled or is empty.
    #[error("Invalid trigger in entry '{entry}': {reason}")]
    InvalidTrigger { entry: String, reason: String },

    /// Filesystem/terminal IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field has an invalid value and reason.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    /// Filesystem read error.
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error.
    #[error("TOML parse error: {0}")]
    Toml(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_config_error_variant() {
        let err = ConfigError::InvalidValue {
            field: "timing.tick_rate_ms".to_string(),
            reason: "must be positive".to_string(),
        };
        assert!(err.to_string().contains("Invalid value for timing.tick_rate_ms"));
    }

    #[test]
    fn wraps_config_error_into_top_level_error() {
        let err: Error = ConfigError::Toml("expected `=`".to_string()).into();
        assert!(err.to_string().starts_with("Config error"));
    }

    #[test]
    fn missing_panel_names_the_visualization() {
        let err = Error::MissingPanel(VisualizationId::OrgChart);
        assert_eq!(err.to_string(), "No panel registered for visualization 'org-chart'");
    }
}
