/// Tag reader implementation using lofty
use crate::error::{MetadataError, Result};
use lofty::{Accessor, AudioFile, ItemKey, TaggedFileExt};
use std::path::Path;

/// Tags relevant to the media index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub duration_ms: u64,
}

impl TrackTags {
    /// Key grouping tracks into albums
    ///
    /// Untagged files are grouped by their parent directory.
    pub fn album_key(&self, path: &Path) -> String {
        match &self.album {
            Some(album) => {
                let artist = self
                    .album_artist
                    .as_deref()
                    .or(self.artist.as_deref())
                    .unwrap_or_default();
                format!("{}\u{1f}{}", artist.to_lowercase(), album.to_lowercase())
            }
            None => format!(
                "dir:{}",
                path.parent().map(|p| p.display().to_string()).unwrap_or_default()
            ),
        }
    }
}

/// Metadata reader using the lofty library
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyMetadataReader;

impl LoftyMetadataReader {
    /// Create a new metadata reader
    pub fn new() -> Self {
        Self
    }

    /// Read tags and duration from an audio file
    pub fn read(&self, path: &Path) -> Result<TrackTags> {
        if !path.exists() {
            return Err(MetadataError::FileNotFound(path.to_path_buf()));
        }

        let tagged_file = lofty::read_from_path(path)?;
        let duration_ms =
            u64::try_from(tagged_file.properties().duration().as_millis()).unwrap_or(u64::MAX);

        let tag = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.tags().first());

        let mut tags = tag.map(Self::extract_from_tag).unwrap_or_default();
        tags.duration_ms = duration_ms;

        Ok(tags)
    }

    fn extract_from_tag(tag: &lofty::Tag) -> TrackTags {
        let non_empty = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };

        TrackTags {
            title: tag.title().as_deref().and_then(non_empty),
            artist: tag.artist().as_deref().and_then(non_empty),
            album: tag.album().as_deref().and_then(non_empty),
            album_artist: tag.get_string(&ItemKey::AlbumArtist).and_then(non_empty),
            duration_ms: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_nonexistent_file_returns_error() {
        let reader = LoftyMetadataReader::new();
        let result = reader.read(Path::new("/nonexistent/file.mp3"));
        assert!(matches!(result, Err(MetadataError::FileNotFound(_))));
    }

    #[test]
    fn album_key_prefers_album_artist() {
        let tags = TrackTags {
            artist: Some("Guest".into()),
            album: Some("Discovery".into()),
            album_artist: Some("Daft Punk".into()),
            ..TrackTags::default()
        };
        let other = TrackTags {
            artist: Some("Daft Punk".into()),
            album: Some("DISCOVERY".into()),
            ..TrackTags::default()
        };

        assert_eq!(
            tags.album_key(Path::new("/a/1.mp3")),
            other.album_key(Path::new("/b/2.mp3"))
        );
    }

    #[test]
    fn untagged_album_key_uses_directory() {
        let tags = TrackTags::default();
        assert_eq!(
            tags.album_key(Path::new("/music/x/1.mp3")),
            tags.album_key(Path::new("/music/x/2.mp3"))
        );
        assert_ne!(
            tags.album_key(Path::new("/music/x/1.mp3")),
            tags.album_key(Path::new("/music/y/1.mp3"))
        );
    }
}
