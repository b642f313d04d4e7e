use super::output::song_row;
use super::utils::{require_catalog, require_session};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use tunedeck_application::{MusicClient, UploadMetadata};

pub async fn list(client: &MusicClient, search: Option<&str>) -> Result<()> {
    let songs = require_catalog(client).await?;

    let shown = match search {
        Some(term) => client.catalog().search(term),
        None => songs,
    };

    if shown.is_empty() {
        match search {
            Some(term) => println!("{}", format!("No songs match '{}'", term).yellow()),
            None => println!("{}", "Your library is empty".yellow()),
        }
        return Ok(());
    }

    for song in &shown {
        println!("{}", song_row(song));
    }
    println!("{}", format!("{} song(s)", shown.len()).dimmed());
    Ok(())
}

pub async fn upload(client: &MusicClient, file: &Path, metadata: UploadMetadata) -> Result<()> {
    require_session(client).await?;
    let created = client
        .library()
        .upload_file(file, metadata)
        .await
        .with_context(|| format!("Failed to upload {}", file.display()))?;

    match created {
        Some(song) => println!("{} Uploaded {}", "✓".green(), song_row(&song)),
        None => println!("{} Uploaded {}", "✓".green(), file.display()),
    }
    Ok(())
}

pub async fn upload_link(client: &MusicClient, url: &str) -> Result<()> {
    require_session(client).await?;
    let created = client
        .library()
        .upload_link(url)
        .await
        .context("Failed to import Spotify track")?;

    match created {
        Some(song) => println!("{} Imported {}", "✓".green(), song_row(&song)),
        None => println!("{} Import requested", "✓".green()),
    }
    Ok(())
}

pub async fn delete(client: &MusicClient, song_id: &str) -> Result<()> {
    require_session(client).await?;
    client
        .library()
        .delete(song_id)
        .await
        .with_context(|| format!("Failed to delete song {}", song_id))?;

    println!("{} Deleted {}", "✓".green(), song_id);
    Ok(())
}
