use super::utils::require_catalog;
use anyhow::{Context, Result};
use colored::Colorize;
use tunedeck_application::MusicClient;
use tunedeck_core::song::AudioFormat;

pub async fn download(client: &MusicClient, song_id: &str, format: AudioFormat) -> Result<()> {
    require_catalog(client).await?;
    let song = client
        .song(song_id)
        .with_context(|| format!("No song with id {} in your library", song_id))?;

    println!("Downloading {} as {}...", song.display_name().bold(), format);
    let path = client
        .download(song_id, format)
        .await
        .with_context(|| format!("Failed to download {}", song.title))?;

    println!("{} Saved {}", "✓".green(), path.display());
    Ok(())
}
