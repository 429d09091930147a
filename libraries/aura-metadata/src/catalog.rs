//! Persistent id catalog
//!
//! Maps file paths to track ids and album keys to album ids. Ids are
//! allocated monotonically and never reused, so a larger id always means
//! the file was discovered later.

use crate::error::{MetadataError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Catalog record for one file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: i64,
    pub date_added: DateTime<Utc>,
}

/// Path and album id assignments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    next_track_id: i64,
    next_album_id: i64,
    tracks: BTreeMap<String, CatalogEntry>,
    albums: BTreeMap<String, i64>,
    #[serde(skip)]
    dirty: bool,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            next_track_id: 1,
            next_album_id: 1,
            tracks: BTreeMap::new(),
            albums: BTreeMap::new(),
            dirty: false,
        }
    }
}

impl Catalog {
    /// Load a catalog, starting empty if the file does not exist yet
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| MetadataError::Catalog(format!("{}: {}", path.display(), e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the catalog atomically (temp file + rename)
    pub fn save(&mut self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let raw = serde_json::to_string_pretty(self)
            .map_err(|e| MetadataError::Catalog(e.to_string()))?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, raw)?;
        std::fs::rename(&tmp, path)?;

        self.dirty = false;
        Ok(())
    }

    /// Entry for `path`, allocating a new id if the path is unknown
    pub fn track_entry(&mut self, path: &Path, now: DateTime<Utc>) -> CatalogEntry {
        let key = path.to_string_lossy().into_owned();
        if let Some(entry) = self.tracks.get(&key) {
            return *entry;
        }

        let entry = CatalogEntry {
            id: self.next_track_id,
            date_added: now,
        };
        self.next_track_id += 1;
        self.tracks.insert(key, entry);
        self.dirty = true;
        entry
    }

    /// Album id for `key`, allocating a new one if the album is unknown
    pub fn album_id(&mut self, key: &str) -> i64 {
        if let Some(id) = self.albums.get(key) {
            return *id;
        }

        let id = self.next_album_id;
        self.next_album_id += 1;
        self.albums.insert(key.to_string(), id);
        self.dirty = true;
        id
    }

    /// Whether allocations happened since the last save
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
