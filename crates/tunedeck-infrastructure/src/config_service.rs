//! Configuration service implementation.
//!
//! Loads the client configuration from `config.toml` in the TuneDeck config
//! directory, creating the file with defaults on first run.

use crate::paths::TunedeckPaths;
use crate::storage::AtomicTomlFile;
use std::sync::{Arc, PoisonError, RwLock};
use tunedeck_core::config::ClientConfig;
use tunedeck_core::{Result, TunedeckError};

/// Environment variable that overrides `api_base_url`.
pub const API_URL_ENV: &str = "TUNEDECK_API_URL";

/// Configuration service that loads and caches the client configuration.
#[derive(Clone)]
pub struct ConfigService {
    /// Cached configuration loaded from file.
    /// Uses RwLock for thread-safe lazy loading.
    config: Arc<RwLock<Option<ClientConfig>>>,
    paths: TunedeckPaths,
}

impl ConfigService {
    /// Creates a new ConfigService.
    ///
    /// The configuration is loaded lazily on first access.
    pub fn new(paths: TunedeckPaths) -> Self {
        Self {
            config: Arc::new(RwLock::new(None)),
            paths,
        }
    }

    pub fn paths(&self) -> &TunedeckPaths {
        &self.paths
    }

    /// Gets the configuration, loading from file if not cached.
    ///
    /// Environment overrides are applied on top of the file contents and are
    /// never written back.
    pub fn get_config(&self) -> Result<ClientConfig> {
        {
            let read_lock = self.config.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let mut loaded = self.load_or_create()?;
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                loaded.api_base_url = url;
            }
        }
        validate(&loaded)?;

        {
            let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    fn load_or_create(&self) -> Result<ClientConfig> {
        let path = self.paths.config_file()?;
        let file = AtomicTomlFile::<ClientConfig>::new(path.clone());

        let (config, created) = file.load_or_init(ClientConfig::default())?;
        if created {
            tracing::info!(path = %path.display(), "Created default config");
        }
        Ok(config)
    }
}

fn validate(config: &ClientConfig) -> Result<()> {
    let url = config.base_url();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(TunedeckError::config(format!(
            "api_base_url must be an http(s) URL, got '{}'",
            config.api_base_url
        )));
    }
    if !(0.0..=1.0).contains(&config.default_volume) {
        return Err(TunedeckError::config(format!(
            "default_volume must be within [0, 1], got {}",
            config.default_volume
        )));
    }
    Ok(())
}
