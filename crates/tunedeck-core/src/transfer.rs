//! Download (transfer) domain types.

use crate::error::Result;
use crate::media::MediaResource;
use crate::song::{AudioFormat, Song};
use async_trait::async_trait;
use std::path::PathBuf;

/// A download in flight. Dropped as soon as the save completes.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDownload {
    pub song: Song,
    pub format: AudioFormat,
}

impl PendingDownload {
    pub fn new(song: Song, format: AudioFormat) -> Self {
        Self { song, format }
    }

    /// `<title>.<format>`, with characters that are unsafe in file names replaced.
    ///
    /// Falls back to the song id when the title has nothing usable left.
    pub fn file_name(&self) -> String {
        let mut stem = sanitize_file_stem(&self.song.title);
        if stem.is_empty() {
            stem = sanitize_file_stem(&self.song.id);
        }
        if stem.is_empty() {
            stem = "download".to_string();
        }
        format!("{}.{}", stem, self.format.extension())
    }
}

fn sanitize_file_stem(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    replaced.trim().trim_matches('.').trim().to_string()
}

/// Where finished downloads are written.
#[async_trait]
pub trait SaveTarget: Send + Sync {
    /// Copies the blob behind `resource` to a file called `file_name`.
    ///
    /// Returns the path actually written, which may differ from `file_name`
    /// when a file with that name already exists.
    async fn save(&self, file_name: &str, resource: &MediaResource) -> Result<PathBuf>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(title: &str, format: AudioFormat) -> PendingDownload {
        PendingDownload::new(Song::new("1", title, "x.mp3"), format)
    }

    #[test]
    fn test_file_name_uses_title() {
        assert_eq!(pending("X", AudioFormat::Wav).file_name(), "X.wav");
        assert_eq!(pending("Blue Monday", AudioFormat::Mp3).file_name(), "Blue Monday.mp3");
    }

    #[test]
    fn test_file_name_sanitized() {
        assert_eq!(pending("AC/DC: Live?", AudioFormat::Mp3).file_name(), "AC_DC_ Live_.mp3");
        assert_eq!(pending("../..", AudioFormat::Mp3).file_name(), "_.mp3");
    }

    #[test]
    fn test_file_name_falls_back_to_id() {
        assert_eq!(pending("   ", AudioFormat::Wav).file_name(), "1.wav");
    }
}
