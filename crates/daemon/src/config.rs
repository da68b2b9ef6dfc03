//! Configuration and persisted preferences for the Cubedeck daemon.
//!
//! Configuration is loaded from TOML files in the following locations
//! (in order):
//! 1. The platform config directory (`~/.config/cubedeck/config.toml` or
//!    the OS equivalent)
//! 2. `~/.config/cubedeck/config.toml` (Unix-style fallback)
//! 3. `./config.toml` (current directory, for development)
//!
//! User preferences (the footer's open flag and dragged height) live in a
//! separate file in the data directory: they are written by the daemon on
//! every user-driven change, while the config file is only ever read.

use anyhow::{Context, Result};
use cubedeck_core_view::{MAX_FOOTER_SIZE, MIN_FOOTER_SIZE};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Footer height used when no preference has been saved yet.
pub const DEFAULT_FOOTER_HEIGHT: f64 = 300.0;

/// Main configuration structure for the daemon.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial window dimensions.
    pub window: WindowConfig,
    /// IPC server configuration.
    pub server: ServerConfig,
    /// Behavior configuration.
    pub behavior: BehaviorConfig,
}

/// Window dimensions assumed until the frontend reports a real size.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    #[serde(default = "default_window_width")]
    pub width: f64,

    #[serde(default = "default_window_height")]
    pub height: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_window_width(),
            height: default_window_height(),
        }
    }
}

/// IPC server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Loopback address to listen on.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
        }
    }
}

/// Behavior-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

// Default value functions for serde
fn default_window_width() -> f64 {
    1280.0
}

fn default_window_height() -> f64 {
    800.0
}

fn default_listen_addr() -> String {
    cubedeck_ipc::DEFAULT_ADDR.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// A non-fatal problem found while validating the config.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub field: String,
    pub message: String,
}

impl Config {
    /// Load configuration from standard locations.
    ///
    /// Returns default config if no file is found.
    pub fn load() -> Result<Self> {
        let paths = config_paths();

        for path in &paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate and clamp config values, returning warnings for anything
    /// that had to be corrected.
    pub fn validate(&mut self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if !self.window.width.is_finite() || self.window.width <= 0.0 {
            warnings.push(ConfigWarning {
                field: "window.width".to_string(),
                message: format!(
                    "invalid value {}, using default {}",
                    self.window.width,
                    default_window_width()
                ),
            });
            self.window.width = default_window_width();
        }
        if !self.window.height.is_finite() || self.window.height <= 0.0 {
            warnings.push(ConfigWarning {
                field: "window.height".to_string(),
                message: format!(
                    "invalid value {}, using default {}",
                    self.window.height,
                    default_window_height()
                ),
            });
            self.window.height = default_window_height();
        }
        if self.server.listen_addr.is_empty() {
            warnings.push(ConfigWarning {
                field: "server.listen_addr".to_string(),
                message: format!("empty address, using default {}", default_listen_addr()),
            });
            self.server.listen_addr = default_listen_addr();
        }

        warnings
    }
}

/// Get all possible config file paths in priority order.
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // 1. Platform standard config directory
    if let Some(proj_dirs) = ProjectDirs::from("com", "cubedeck", "cubedeck") {
        paths.push(proj_dirs.config_dir().join("config.toml"));
    }

    // 2. Unix-style: ~/.config/cubedeck/config.toml
    if let Some(home) = dirs_home() {
        paths.push(home.join(".config").join("cubedeck").join("config.toml"));
    }

    // 3. Current directory: ./config.toml
    paths.push(PathBuf::from("config.toml"));

    paths
}

/// Get the user's home directory.
fn dirs_home() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf())
}

/// Persisted user preferences.
///
/// Read once at startup and written on each user-driven change. The
/// preferences are a convenience, not state the daemon depends on, so
/// write failures are swallowed and defaults cover a missing or corrupt
/// file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Prefs {
    /// Whether the user last left the footer expanded.
    #[serde(default = "default_footer_open")]
    pub footer_open: bool,

    /// Footer height the user last dragged to, in pixels.
    #[serde(default = "default_footer_height")]
    pub footer_height: f64,
}

fn default_footer_open() -> bool {
    true
}

fn default_footer_height() -> f64 {
    DEFAULT_FOOTER_HEIGHT
}

impl Default for Prefs {
    fn default() -> Self {
        Self {
            footer_open: default_footer_open(),
            footer_height: default_footer_height(),
        }
    }
}

impl Prefs {
    /// Load preferences, falling back to defaults on any failure.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };
        let mut prefs = match fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<Prefs>(&content) {
                Ok(prefs) => prefs,
                Err(e) => {
                    tracing::debug!("Ignoring corrupt prefs file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        };
        if !prefs.footer_height.is_finite() || prefs.footer_height <= 0.0 {
            prefs.footer_height = default_footer_height();
        }
        prefs.footer_height = prefs.footer_height.clamp(MIN_FOOTER_SIZE, MAX_FOOTER_SIZE);
        prefs
    }

    /// Persist preferences, tolerating failure silently.
    pub fn save(&self) {
        let Some(path) = Self::path() else {
            return;
        };
        let Ok(content) = toml::to_string_pretty(self) else {
            return;
        };
        if let Some(parent) = path.parent() {
            if fs::create_dir_all(parent).is_err() {
                tracing::debug!("Could not create prefs directory {}", parent.display());
                return;
            }
        }
        if let Err(e) = fs::write(&path, content) {
            tracing::debug!("Could not write prefs file {}: {}", path.display(), e);
        }
    }

    fn path() -> Option<PathBuf> {
        ProjectDirs::from("com", "cubedeck", "cubedeck")
            .map(|dirs| dirs.data_dir().join("prefs.toml"))
    }
}
