//! Audio track domain type.
//!
//! Represents one track from the catalog with just enough metadata to
//! request, label, and place a download.

use serde::{Deserialize, Serialize};

/// Characters that are unsafe in file names on at least one supported platform.
const UNSAFE_FILENAME_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Extension used when the catalog does not report one.
const DEFAULT_FILE_EXT: &str = "mp3";

/// An audio track as reported by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audio {
    /// Catalog identifier. This is the identity-bearing field: two `Audio`
    /// values with the same `id` describe the same track.
    pub id: String,
    /// Track title.
    pub title: String,
    /// Performing artist.
    pub artist: String,
    /// Album name, if the catalog reports one.
    pub album: Option<String>,
    /// Track duration in seconds.
    pub duration_seconds: u32,
    /// Source URL for the transfer engine. Absent for tracks that cannot be
    /// downloaded (region-locked or removed entries).
    pub download_url: Option<String>,
    /// File extension reported by the catalog (e.g. "mp3", "flac").
    pub file_ext: Option<String>,
}

impl Audio {
    /// Create a new track with the required fields.
    pub fn new(id: impl Into<String>, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            album: None,
            duration_seconds: 0,
            download_url: None,
            file_ext: None,
        }
    }

    /// Set the album name.
    #[must_use]
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    /// Set the track duration.
    #[must_use]
    pub const fn with_duration(mut self, seconds: u32) -> Self {
        self.duration_seconds = seconds;
        self
    }

    /// Set the source URL.
    #[must_use]
    pub fn with_download_url(mut self, url: impl Into<String>) -> Self {
        self.download_url = Some(url.into());
        self
    }

    /// Set the file extension.
    #[must_use]
    pub fn with_file_ext(mut self, ext: impl Into<String>) -> Self {
        self.file_ext = Some(ext.into());
        self
    }

    /// Human-readable name shown in download lists.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.artist, self.title)
    }

    /// File name for the downloaded track, safe for the local filesystem.
    #[must_use]
    pub fn file_name(&self) -> String {
        let ext = self.file_ext.as_deref().unwrap_or(DEFAULT_FILE_EXT);
        format!("{}.{ext}", sanitize(&self.display_name()))
    }
}

/// Replace filesystem-unsafe and control characters with underscores.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if UNSAFE_FILENAME_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        let audio = Audio::new("a1", "Bagtyyarlyk", "Bahar Hojayewa");
        assert_eq!(audio.display_name(), "Bahar Hojayewa - Bagtyyarlyk");
    }

    #[test]
    fn test_file_name_defaults_to_mp3() {
        let audio = Audio::new("a1", "Track", "Artist");
        assert_eq!(audio.file_name(), "Artist - Track.mp3");
    }

    #[test]
    fn test_file_name_uses_reported_ext() {
        let audio = Audio::new("a1", "Track", "Artist").with_file_ext("flac");
        assert_eq!(audio.file_name(), "Artist - Track.flac");
    }

    #[test]
    fn test_file_name_sanitizes_unsafe_chars() {
        let audio = Audio::new("a1", "What: Is/Love?", "AC\\DC");
        assert_eq!(audio.file_name(), "AC_DC - What_ Is_Love_.mp3");
    }
}
