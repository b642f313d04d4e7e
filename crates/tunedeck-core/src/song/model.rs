//! Song domain model.

use serde::{Deserialize, Serialize};

/// A song in the user's library, as returned by `GET /api/songs/list`.
///
/// The backend serialises the identifier as `_id`; both spellings are accepted.
/// The client never mutates a song; a catalog refresh replaces the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    /// Length in seconds.
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub cover_art: Option<String>,
    /// Server-side file key used in the stream path.
    pub file_path: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub bitrate: Option<u32>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Song {
    /// Creates a song with only the fields the client strictly needs.
    pub fn new(id: impl Into<String>, title: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: None,
            album: None,
            duration: None,
            cover_art: None,
            file_path: file_path.into(),
            user_id: None,
            bitrate: None,
            created_at: None,
        }
    }

    /// Case-insensitive substring match on title, artist and album.
    ///
    /// An empty (or whitespace-only) term matches every song.
    pub fn matches(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        [Some(self.title.as_str()), self.artist.as_deref(), self.album.as_deref()]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    /// "Artist - Title" when an artist is known, otherwise the title alone.
    pub fn display_name(&self) -> String {
        match self.artist.as_deref() {
            Some(artist) if !artist.is_empty() => format!("{} - {}", artist, self.title),
            _ => self.title.clone(),
        }
    }
}

/// Formats a position or length in seconds as `m:ss`.
///
/// Negative and non-finite inputs render as `0:00`.
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
