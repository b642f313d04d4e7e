use colored::Colorize;
use tunedeck_core::media::{PlaybackSnapshot, PlaybackStatus};
use tunedeck_core::song::{format_duration, Song};

const BAR_WIDTH: usize = 24;

/// One catalog row: `id  title - artist  m:ss`.
pub fn song_row(song: &Song) -> String {
    let duration = song
        .duration
        .map(format_duration)
        .unwrap_or_else(|| "--:--".to_string());
    format!(
        "{:<26} {:<48} {}",
        song.id.dimmed(),
        song.display_name(),
        duration.cyan()
    )
}

/// Single-line progress readout, redrawn in place while playing.
pub fn progress_line(snapshot: &PlaybackSnapshot) -> String {
    let filled = (snapshot.progress() * BAR_WIDTH as f64).round() as usize;
    let bar = format!(
        "{}{}",
        "█".repeat(filled.min(BAR_WIDTH)),
        "░".repeat(BAR_WIDTH - filled.min(BAR_WIDTH))
    );
    let total = snapshot
        .duration
        .map(format_duration)
        .unwrap_or_else(|| "--:--".to_string());
    let title = snapshot
        .song
        .as_ref()
        .map(Song::display_name)
        .unwrap_or_default();
    let volume = if snapshot.effectively_muted {
        "muted".yellow().to_string()
    } else {
        format!("vol {:>3}%", (snapshot.volume * 100.0).round() as u32)
    };

    format!(
        "{} {} {} {} / {}  {}",
        status_label(snapshot.status),
        title.bold(),
        bar.green(),
        format_duration(snapshot.position),
        total,
        volume
    )
}

pub fn status_label(status: PlaybackStatus) -> String {
    match status {
        PlaybackStatus::Playing => "▶".green().to_string(),
        PlaybackStatus::Paused => "⏸".yellow().to_string(),
        PlaybackStatus::Loading => "…".cyan().to_string(),
        PlaybackStatus::Error => "✗".red().to_string(),
        PlaybackStatus::Idle => "■".dimmed().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_song_row_without_duration() {
        colored::control::set_override(false);
        let row = song_row(&Song::new("1", "X", "x.mp3"));
        assert!(row.contains("X"));
        assert!(row.ends_with("--:--"));
    }

    #[test]
    fn test_progress_line_shows_position_and_mute() {
        colored::control::set_override(false);
        let snapshot = PlaybackSnapshot {
            status: PlaybackStatus::Playing,
            song: Some(Song::new("1", "X", "x.mp3")),
            position: 65.0,
            duration: Some(130.0),
            volume: 0.0,
            muted: false,
            effectively_muted: true,
            seeking: false,
            last_error: None,
        };

        let line = progress_line(&snapshot);

        assert!(line.contains("1:05 / 2:10"));
        assert!(line.contains("muted"));
        assert_eq!(line.matches('█').count(), BAR_WIDTH / 2);
    }
}
