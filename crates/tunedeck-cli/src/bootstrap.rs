//! Composition root: turns configuration into a wired [`MusicClient`].

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tunedeck_application::{ClientParts, MusicClient};
use tunedeck_core::config::ClientConfig;
use tunedeck_infrastructure::{
    ClockMediaBackend, ConfigService, DirectorySaveTarget, HttpMusicApi, TempFileBlobStore,
    TomlTokenStore, TunedeckPaths,
};

pub struct AppContext {
    pub client: MusicClient,
    pub config: ClientConfig,
    pub download_dir: PathBuf,
}

/// Loads configuration for `paths`.
pub fn load_config(paths: &TunedeckPaths) -> Result<ConfigService> {
    let service = ConfigService::new(paths.clone());
    service
        .get_config()
        .context("Failed to load configuration")?;
    Ok(service)
}

/// Builds the client from configuration.
///
/// `download_override` takes precedence over `download_dir` in the config.
pub fn bootstrap(config_service: &ConfigService, download_override: Option<&Path>) -> Result<AppContext> {
    let config = config_service.get_config()?;
    let paths = config_service.paths();

    let api = HttpMusicApi::from_config(&config).context("Invalid backend URL")?;
    let token_store = TomlTokenStore::from_paths(paths)?;
    let blobs = TempFileBlobStore::new().context("Failed to create blob directory")?;
    let download_dir = paths.download_dir(download_override.or(config.download_dir.as_deref()));

    tracing::debug!(
        api = %config.base_url(),
        download_dir = %download_dir.display(),
        "Bootstrapping client"
    );

    let client = MusicClient::new(ClientParts {
        api: Arc::new(api),
        token_store: Arc::new(token_store),
        blobs: Arc::new(blobs),
        media: Arc::new(ClockMediaBackend::new()),
        save_target: Arc::new(DirectorySaveTarget::new(download_dir.clone())),
        volume: config.default_volume,
    });

    Ok(AppContext {
        client,
        config,
        download_dir,
    })
}
