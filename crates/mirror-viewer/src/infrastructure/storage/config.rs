//! TOML-based configuration for the viewer.
//!
//! Settings live in `$XDG_CONFIG_HOME/display-mirror/config.toml`, falling
//! back to `~/.config/display-mirror/config.toml`.  An explicit path may be
//! given instead (`--config` / `MIRROR_CONFIG`).
//!
//! ```toml
//! [viewer]
//! frame_interval_ms = 16
//! exit_key = "Escape"
//! window_title = "Display Mirror"
//! window_scale_divisor = 2
//! release_held_on_exit = true
//! log_level = "info"
//! ```
//!
//! # Serde default values
//!
//! Every field carries `#[serde(default = "some_fn")]`, so a partial file
//! (or an empty one) is valid and a missing file simply means "all
//! defaults".

use std::path::{Path, PathBuf};
use std::time::Duration;

use mirror_core::LocalKey;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::run_session::SessionConfig;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Neither `XDG_CONFIG_HOME` nor `HOME` is set.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub viewer: ViewerConfig,
}

/// Viewer behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewerConfig {
    /// Target period of one loop iteration in milliseconds.  Zero is treated
    /// as one so the loop always sleeps between iterations.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
    /// Local key that ends the session when pressed.
    #[serde(default = "default_exit_key")]
    pub exit_key: LocalKey,
    #[serde(default = "default_window_title")]
    pub window_title: String,
    /// The initial window is the target size divided by this value.
    #[serde(default = "default_scale_divisor")]
    pub window_scale_divisor: u32,
    /// Release keys and buttons still held on the target when the session ends.
    #[serde(default = "default_true")]
    pub release_held_on_exit: bool,
    /// `tracing` filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_frame_interval_ms() -> u64 {
    16
}
fn default_exit_key() -> LocalKey {
    LocalKey::Escape
}
fn default_window_title() -> String {
    "Display Mirror".to_string()
}
fn default_scale_divisor() -> u32 {
    2
}
fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: default_frame_interval_ms(),
            exit_key: default_exit_key(),
            window_title: default_window_title(),
            window_scale_divisor: default_scale_divisor(),
            release_held_on_exit: default_true(),
            log_level: default_log_level(),
        }
    }
}

impl ViewerConfig {
    /// Session settings derived from this config.
    pub fn to_session_config(&self) -> SessionConfig {
        SessionConfig {
            frame_interval: Duration::from_millis(self.frame_interval_ms.max(1)),
            exit_key: self.exit_key,
            release_held_on_exit: self.release_held_on_exit,
        }
    }

    /// Initial window size for a target of `width` x `height`.
    ///
    /// A divisor of zero is treated as one, and neither side drops below one
    /// pixel.
    pub fn window_size_for(&self, width: u32, height: u32) -> (u32, u32) {
        let divisor = self.window_scale_divisor.max(1);
        ((width / divisor).max(1), (height / divisor).max(1))
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Resolves the default config file path.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when neither
/// `XDG_CONFIG_HOME` nor `HOME` is set.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    platform_config_dir()
        .map(|dir| dir.join("config.toml"))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Loads the config from `path`, returning `AppConfig::default()` if the
/// file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Writes `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn platform_config_dir() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
    Some(base.join("display-mirror"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
