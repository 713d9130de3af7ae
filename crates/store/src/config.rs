//! Store configuration from the environment.

use std::env;
use std::path::PathBuf;

/// File holding the [`ScoreRecord`](crate::ScoreRecord) inside the data directory.
pub const SCORE_FILE: &str = "scores.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    /// Keep everything in memory and never touch the disk.
    pub disabled: bool,
    pub log_path: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            disabled: false,
            log_path: None,
        }
    }
}

fn default_data_dir() -> PathBuf {
    env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(env::temp_dir)
        .join(".typing-toucan")
}

fn non_empty(var: &str) -> Option<String> {
    env::var(var)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl StoreConfig {
    /// Read `TOUCAN_DATA_DIR`, `TOUCAN_STORE_DISABLED` and `TOUCAN_LOG_PATH`.
    pub fn from_env() -> Self {
        let data_dir = non_empty("TOUCAN_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);
        let log_path = non_empty("TOUCAN_LOG_PATH").map(PathBuf::from);

        Self {
            data_dir,
            disabled: Self::is_disabled(),
            log_path,
        }
    }

    /// Check if persistence is disabled via environment.
    pub fn is_disabled() -> bool {
        env::var("TOUCAN_STORE_DISABLED")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false)
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn score_path(&self) -> PathBuf {
        self.data_dir.join(SCORE_FILE)
    }

    /// Log file: the explicit override, else `typing-toucan.log` in the data dir.
    pub fn log_file(&self) -> PathBuf {
        self.log_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join("typing-toucan.log"))
    }
}
