//! Client configuration model, stored as `config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend root, without a trailing slash.
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// Overrides the platform download directory.
    pub download_dir: Option<PathBuf>,
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub log_level: String,
    /// Initial playback volume in `[0, 1]`.
    pub default_volume: f32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 30,
            download_dir: None,
            log_level: "info".to_string(),
            default_volume: 1.0,
        }
    }
}

impl ClientConfig {
    /// `api_base_url` with trailing slashes removed.
    pub fn base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }
}
