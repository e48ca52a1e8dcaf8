use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_media_dir")]
    pub media_dir: String,
    /// Cadence the field app is told to ping at. Advisory only: the server
    /// never rejects or rate-limits pings.
    #[serde(default = "default_ping_interval")]
    pub ping_interval_secs: u32,
    /// Auto-end duty after this many minutes without a ping (0 = never).
    #[serde(default)]
    pub session_timeout_minutes: u32,
    /// A ping from an OFF_DUTY agent switches it back ON_DUTY.
    #[serde(default = "default_true")]
    pub ping_resumes_duty: bool,
}

/// Keys every complete config file carries; used by `config --check`.
pub const KNOWN_KEYS: &[&str] = &[
    "database",
    "media_dir",
    "ping_interval_secs",
    "session_timeout_minutes",
    "ping_resumes_duty",
];

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_media_dir() -> String {
    Config::config_dir().join("media").to_string_lossy().to_string()
}
fn default_ping_interval() -> u32 {
    60
}
fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            media_dir: default_media_dir(),
            ping_interval_secs: default_ping_interval(),
            session_timeout_minutes: 0,
            ping_resumes_duty: true,
        }
    }
}

impl Config {
    /// Return the standard configuration directory (`~/.fixtrack`).
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".fixtrack")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("fixtrack.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("fixtrack.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if !path.exists() {
            debug!(?path, "no config file, using defaults");
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let mut cfg = Self::from_yaml(&content)?;
        cfg.media_dir = expand_tilde(&cfg.media_dir).to_string_lossy().to_string();
        cfg.database = expand_tilde(&cfg.database).to_string_lossy().to_string();
        debug!(?path, "loaded config");
        Ok(cfg)
    }

    pub fn from_yaml(content: &str) -> AppResult<Self> {
        serde_yaml::from_str(content).map_err(|e| AppError::Config(e.to_string()))
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Keys from [`KNOWN_KEYS`] absent in a raw YAML document.
    pub fn missing_keys(content: &str) -> AppResult<Vec<&'static str>> {
        let value: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| AppError::Config(e.to_string()))?;
        let map = value
            .as_mapping()
            .ok_or_else(|| AppError::Config("config root must be a mapping".into()))?;

        Ok(KNOWN_KEYS
            .iter()
            .copied()
            .filter(|k| !map.contains_key(serde_yaml::Value::String((*k).to_string())))
            .collect())
    }

    /// Initialize configuration file, database file and media directory.
    /// Returns the config that was written (or would be, in test mode).
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();

        let mut config = if is_test {
            Config::default()
        } else {
            Self::load()?
        };

        if let Some(name) = custom_db {
            let p = expand_tilde(&name);
            config.database = if p.is_absolute() {
                p.to_string_lossy().to_string()
            } else {
                dir.join(p).to_string_lossy().to_string()
            };
        }

        if !is_test {
            fs::create_dir_all(&dir)?;
            fs::create_dir_all(&config.media_dir)?;
            fs::write(Self::config_file(), config.to_yaml()?)?;
        }

        let db_path = PathBuf::from(&config.database);
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        Ok(config)
    }
}
