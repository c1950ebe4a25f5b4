use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which persistence backend serves `POST /api/leads`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Redis conditional insert (production path).
    #[default]
    Redis,
    /// Append-only JSONL log (local development).
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub backend: Backend,
    /// Required when backend = redis.
    #[serde(default)]
    pub redis_url: Option<String>,
    /// Required when backend = file.
    #[serde(default)]
    pub file_path: Option<PathBuf>,
    /// Requests per client IP per window.
    #[serde(default = "default_rate_limit")]
    pub rate_limit: u32,
    #[serde(default = "default_rate_window_secs")]
    pub rate_window_secs: u64,
    /// Set to "production" for JSON logging, anything else for human-readable.
    #[serde(default)]
    pub env: String,
    /// Sentry DSN for error tracking.
    #[serde(default)]
    pub sentry_dsn: Option<String>,
}

fn default_rate_limit() -> u32 {
    8
}

fn default_rate_window_secs() -> u64 {
    60
}

impl Config {
    pub fn is_production(&self) -> bool {
        self.env == "production"
    }
}
