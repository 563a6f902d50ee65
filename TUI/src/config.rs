/// Application configuration and constants.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

/// Which shell arrangement the orchestrator drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LayoutProfile {
    /// Sidebar, chat, side slot with the "your day" panel, guided tour.
    #[default]
    Workspace,
    /// Chat and canvas only.
    Split,
}

impl LayoutProfile {
    pub fn shows_sidebar(self) -> bool {
        self == LayoutProfile::Workspace
    }

    pub fn supports_tour(self) -> bool {
        self == LayoutProfile::Workspace
    }
}

impl std::str::FromStr for LayoutProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "workspace" => Ok(LayoutProfile::Workspace),
            "split" => Ok(LayoutProfile::Split),
            other => Err(format!("unknown layout '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name used in the greeting.
    pub user_name: String,

    pub layout: LayoutProfile,

    /// Show the guided tour on start (workspace layout only).
    pub tour_enabled: bool,

    pub timing: TimingConfig,

    pub ui: UiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_name: "YCombinator".to_string(),
            layout: LayoutProfile::default(),
            tour_enabled: true,
            timing: TimingConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Main loop tick rate in milliseconds (target 60 FPS = ~16ms)
    pub tick_rate_ms: u64,

    /// How many ticks to show status messages (180 = ~3s at 60fps)
    pub status_timeout_ticks: u64,

    /// Lower bound of the simulated per-tool-call latency
    pub tool_delay_min_ms: u64,

    /// Upper bound of the simulated per-tool-call latency
    pub tool_delay_max_ms: u64,

    /// Pause between the last tool call and the answer
    pub delivery_delay_ms: u64,

    /// How often the tour looks for its anchor
    pub anchor_poll_ms: u64,

    /// Lookups before a tour step gives up and centers itself
    pub anchor_retry_limit: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 16,
            status_timeout_ticks: 180,
            tool_delay_min_ms: 400,
            tool_delay_max_ms: 700,
            delivery_delay_ms: 300,
            anchor_poll_ms: 100,
            anchor_retry_limit: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Modulo for animation frame counter
    pub animation_frame_mod: usize,

    /// Lines to scroll per key press
    pub scroll_step: usize,

    /// Width of the sidebar in characters
    pub sidebar_width: u16,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            animation_frame_mod: 360,
            scroll_step: 3,
            sidebar_width: 26,
        }
    }
}

impl Config {
    /// Loads configuration from explicit path, fallback locations, and env overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = path.map(Path::to_path_buf).or_else(|| {
            let cwd = std::env::current_dir().ok()?.join("mamba-demo.toml");
            if cwd.exists() {
                return Some(cwd);
            }
            let home_config = home_dir().join(".mamba-demo").join("config.toml");
            home_config.exists().then_some(home_config)
        });
        debug!(path = ?config_path, "Config file resolved");

        let mut config = match config_path {
            Some(path) => {
                let content = std::fs::read_to_string(&path)?;
                Self::from_toml(&content)?
            }
            None => Config::default(),
        };

        if let Ok(name) = std::env::var("MAMBA_USER_NAME") {
            if !name.trim().is_empty() {
                config.user_name = name;
            }
        }
        if let Ok(layout) = std::env::var("MAMBA_LAYOUT") {
            config.layout = layout.parse().map_err(|reason| ConfigError::InvalidValue {
                field: "MAMBA_LAYOUT".to_string(),
                reason,
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Toml(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.timing;
        if t.tool_delay_min_ms > t.tool_delay_max_ms {
            return Err(ConfigError::InvalidValue {
                field: "timing.tool_delay_min_ms".to_string(),
                reason: format!(
                    "{} is greater than tool_delay_max_ms ({})",
                    t.tool_delay_min_ms, t.tool_delay_max_ms
                ),
            });
        }
        if t.tick_rate_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timing.tick_rate_ms".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if t.anchor_poll_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timing.anchor_poll_ms".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if t.anchor_retry_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timing.anchor_retry_limit".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if self.ui.animation_frame_mod == 0 {
            return Err(ConfigError::InvalidValue {
                field: "ui.animation_frame_mod".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// First word of the configured name, for the greeting.
    pub fn first_name(&self) -> &str {
        self.user_name.split_whitespace().next().unwrap_or("there")
    }
}

pub fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
}

/// Global commands list
pub const COMMANDS: &[(&str, &str)] = &[
    ("/help", "Show available commands"),
    ("/tour", "Restart the guided tour"),
    ("/open", "Open a panel by id"),
    ("/close", "Close the current panel"),
    ("/quit", "Exit the demo"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timing.tool_delay_min_ms, 400);
        assert_eq!(config.timing.tool_delay_max_ms, 700);
        assert_eq!(config.first_name(), "YCombinator");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
user_name = "Ada Lovelace"
layout = "split"

[timing]
tool_delay_min_ms = 0
tool_delay_max_ms = 0
"#,
        )
        .unwrap();

        assert_eq!(config.first_name(), "Ada");
        assert_eq!(config.layout, LayoutProfile::Split);
        assert_eq!(config.timing.delivery_delay_ms, 300);
        assert_eq!(config.ui.sidebar_width, 26);
        assert!(config.tour_enabled);
    }

    #[test]
    fn test_inverted_delay_bounds_rejected() {
        let mut config = Config::default();
        config.timing.tool_delay_min_ms = 900;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("tool_delay_min_ms"));
    }

    #[test]
    fn test_bad_toml_reports_parse_error() {
        let err = Config::from_toml("layout = \"diagonal\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_load_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tour_enabled = false\n[ui]\nscroll_step = 5").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert!(!config.tour_enabled);
        assert_eq!(config.ui.scroll_step, 5);
    }

    #[test]
    fn test_zero_anchor_retries_rejected() {
        let mut config = Config::default();
        config.timing.anchor_retry_limit = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("anchor_retry_limit"));
    }

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_invalid_file_fails_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[timing]\ntool_delay_min_ms = 900").unwrap();

        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_blank_name_greets_generically() {
        let config = Config {
            user_name: "   ".to_string(),
            ..Config::default()
        };
        assert_eq!(config.first_name(), "there");
    }

    #[test]
    fn test_layout_parse() {
        assert_eq!("Workspace".parse::<LayoutProfile>(), Ok(LayoutProfile::Workspace));
        assert!("grid".parse::<LayoutProfile>().is_err());
        assert!(LayoutProfile::Workspace.supports_tour());
        assert!(!LayoutProfile::Split.shows_sidebar());
    }
}
