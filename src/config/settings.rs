//! Configuration settings for Sentio.

use crate::api::ProfitInterval;
use config::{Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Prefix of environment overrides, e.g. `SENTIO__API__ENDPOINT`.
const ENV_PREFIX: &str = "SENTIO";
const ENV_SEPARATOR: &str = "__";

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend configuration.
    pub api: ApiConfig,
    /// Poll intervals and paging.
    pub feeds: FeedsConfig,
    /// UI configuration.
    pub ui: UiConfig,
    /// Key bindings.
    pub keybindings: KeyBindings,
}

impl Config {
    /// Load from the default location, layering environment overrides.
    pub fn load_or_default() -> crate::Result<Self> {
        Self::load(None)
    }

    /// Load from `path`, or `<config_dir>/config.toml` when `None`.
    ///
    /// A missing file is not an error; defaults fill every absent key.
    pub fn load(path: Option<PathBuf>) -> crate::Result<Self> {
        let config_path = path.unwrap_or_else(default_path);
        Self::builder(&config_path)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()
            .and_then(config::Config::try_deserialize)
            .map_err(|e| crate::Error::config(e.to_string()))
    }

    /// Load from `path` only, ignoring the environment.
    pub fn load_file(path: &Path) -> crate::Result<Self> {
        Self::builder(path)
            .build()
            .and_then(config::Config::try_deserialize)
            .map_err(|e| crate::Error::config(e.to_string()))
    }

    fn builder(path: &Path) -> config::ConfigBuilder<config::builder::DefaultState> {
        config::Config::builder().add_source(
            File::from(path)
                .format(FileFormat::Toml)
                .required(false),
        )
    }

    /// Save configuration to file.
    pub fn save(&self, path: Option<PathBuf>) -> crate::Result<()> {
        let config_path = path.unwrap_or_else(default_path);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::config(e.to_string()))?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }
}

fn default_path() -> PathBuf {
    super::config_dir()
        .map(|p| p.join("config.toml"))
        .unwrap_or_else(|_| PathBuf::from("config.toml"))
}

/// Backend configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// GraphQL endpoint URL.
    pub endpoint: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/graphql".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Feed scheduling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedsConfig {
    /// Signals poll interval in seconds.
    pub signals_interval_secs: u64,
    /// Positions poll interval in seconds.
    pub positions_interval_secs: u64,
    /// Profit summaries per page.
    pub profits_page_size: usize,
    /// Bucket size of profit summaries: "H1", "D1" or "W1".
    pub profit_interval: String,
    /// Simulated latency of debug fixtures in milliseconds.
    pub fixture_delay_ms: u64,
    /// Seconds between reachability checks while the backend is down.
    pub reconnect_interval_secs: u64,
}

impl FeedsConfig {
    pub fn signals_interval(&self) -> Duration {
        Duration::from_secs(self.signals_interval_secs.max(1))
    }

    pub fn positions_interval(&self) -> Duration {
        Duration::from_secs(self.positions_interval_secs.max(1))
    }

    pub fn reconnect_interval(&self) -> Duration {
        Duration::from_secs(self.reconnect_interval_secs.max(1))
    }

    pub fn fixture_delay(&self) -> Duration {
        Duration::from_millis(self.fixture_delay_ms)
    }

    /// Unknown names fall back to daily buckets.
    pub fn profit_interval(&self) -> ProfitInterval {
        match self.profit_interval.to_ascii_uppercase().as_str() {
            "H1" => ProfitInterval::H1,
            "W1" => ProfitInterval::W1,
            _ => ProfitInterval::D1,
        }
    }
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            signals_interval_secs: 60,
            positions_interval_secs: 15,
            profits_page_size: 20,
            profit_interval: "D1".to_string(),
            fixture_delay_ms: 150,
            reconnect_interval_secs: 15,
        }
    }
}

/// UI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Tick rate in milliseconds for UI updates.
    pub tick_rate_ms: u64,
    /// Show status bar.
    pub show_status_bar: bool,
    /// Show help bar.
    pub show_help_bar: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 250,
            show_status_bar: true,
            show_help_bar: true,
        }
    }
}

/// Key bindings configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Quit the application.
    pub quit: String,
    /// Show help.
    pub help: String,
    /// Navigate up.
    pub up: String,
    /// Navigate down.
    pub down: String,
    /// Previous tab.
    pub left: String,
    /// Next tab.
    pub right: String,
    /// Select/confirm.
    pub select: String,
    /// Cancel/back.
    pub back: String,
    /// Re-check the backend and retry failed feeds.
    pub refresh: String,
    /// Toggle debug fixtures.
    pub debug: String,
    /// Switch to signals view.
    pub signals: String,
    /// Switch to positions view.
    pub positions: String,
    /// Switch to history view.
    pub history: String,
    /// Switch to about view.
    pub about: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: "q".to_string(),
            help: "?".to_string(),
            up: "k".to_string(),
            down: "j".to_string(),
            left: "h".to_string(),
            right: "l".to_string(),
            select: "Enter".to_string(),
            back: "Esc".to_string(),
            refresh: "r".to_string(),
            debug: "d".to_string(),
            signals: "1".to_string(),
            positions: "2".to_string(),
            history: "3".to_string(),
            about: "4".to_string(),
        }
    }
}

/// Choices remembered across launches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Serve fixtures instead of network data.
    #[serde(rename = "signals.debug")]
    pub debug_mode: bool,
    /// Index of the last selected tab.
    #[serde(rename = "selectedTab")]
    pub selected_tab: usize,
}

impl Preferences {
    /// Read preferences; a missing or unreadable file yields defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed preferences");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// `<data_dir>/preferences.toml`
    pub fn default_path() -> crate::Result<PathBuf> {
        super::data_dir().map(|dir| dir.join("preferences.toml"))
    }
}
