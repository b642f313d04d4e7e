use super::output::progress_line;
use super::utils::require_catalog;
use anyhow::{Context, Result};
use colored::Colorize;
use std::io::{self, Write};
use std::time::Duration;
use tunedeck_application::MusicClient;
use tunedeck_core::media::PlaybackStatus;

const REFRESH_INTERVAL: Duration = Duration::from_millis(250);

/// Plays one song until it ends or Ctrl-C is pressed.
pub async fn play(client: &MusicClient, song_id: &str, volume: Option<f32>) -> Result<()> {
    require_catalog(client).await?;
    if let Some(volume) = volume {
        client.playback().set_volume(volume);
    }

    let result = run(client, song_id).await;
    client.shutdown();
    println!();
    result
}

async fn run(client: &MusicClient, song_id: &str) -> Result<()> {
    client
        .play_by_id(song_id)
        .await
        .with_context(|| format!("Failed to play song {}", song_id))?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut ticker = tokio::time::interval(REFRESH_INTERVAL);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let snapshot = client.playback().sync();
                match snapshot.status {
                    PlaybackStatus::Idle => {
                        print!("\r{}", "Finished".green());
                        break;
                    }
                    PlaybackStatus::Error => {
                        let message = snapshot
                            .last_error
                            .unwrap_or_else(|| "unknown media error".to_string());
                        anyhow::bail!("Playback failed: {}", message);
                    }
                    _ => {
                        print!("\r{}", progress_line(&snapshot));
                        io::stdout().flush().context("Failed to flush stdout")?;
                    }
                }
            }
            _ = &mut ctrl_c => {
                tracing::info!("Interrupted; stopping playback");
                print!("\r{}", "Stopped".yellow());
                break;
            }
        }
    }

    Ok(())
}
