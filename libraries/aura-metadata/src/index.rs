/// Filesystem media index
use crate::catalog::Catalog;
use crate::error::{MetadataError, Result};
use crate::reader::LoftyMetadataReader;
use async_trait::async_trait;
use aura_core::{MediaIndex, MediaQuery, Track, TrackId};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

/// Index configuration
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Supported audio file extensions (lowercase)
    pub extensions: Vec<String>,

    /// Follow symbolic links while walking roots
    pub follow_links: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            extensions: ["mp3", "flac", "ogg", "opus", "wav", "m4a", "aac"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            follow_links: false,
        }
    }
}

/// Media index over local music folders
///
/// Every query walks the roots again; the catalog only pins ids.
pub struct FsMediaIndex {
    roots: Vec<PathBuf>,
    config: IndexConfig,
    reader: LoftyMetadataReader,
    catalog: Arc<Mutex<Catalog>>,
    catalog_path: Option<PathBuf>,
}

impl FsMediaIndex {
    /// Create an index with an in-memory catalog
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            config: IndexConfig::default(),
            reader: LoftyMetadataReader::new(),
            catalog: Arc::new(Mutex::new(Catalog::default())),
            catalog_path: None,
        }
    }

    /// Persist ids in a catalog file, loading it if it exists
    pub fn with_catalog(mut self, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let catalog = Catalog::load(&path)?;
        tracing::debug!(path = %path.display(), entries = catalog.len(), "Loaded catalog");
        self.catalog = Arc::new(Mutex::new(catalog));
        self.catalog_path = Some(path);
        Ok(self)
    }

    /// Replace the index configuration
    #[must_use]
    pub fn with_config(mut self, config: IndexConfig) -> Self {
        self.config = config;
        self
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Scan all roots synchronously
    pub fn scan(&self, query: &MediaQuery) -> Result<Vec<Track>> {
        Scan {
            roots: &self.roots,
            config: &self.config,
            reader: self.reader,
            catalog: &self.catalog,
            catalog_path: self.catalog_path.as_deref(),
        }
        .run(query)
    }

    fn detached(&self) -> Self {
        Self {
            roots: self.roots.clone(),
            config: self.config.clone(),
            reader: self.reader,
            catalog: Arc::clone(&self.catalog),
            catalog_path: self.catalog_path.clone(),
        }
    }
}

#[async_trait]
impl MediaIndex for FsMediaIndex {
    async fn query(&self, query: &MediaQuery) -> aura_core::Result<Vec<Track>> {
        let index = self.detached();
        let query = *query;

        let tracks = tokio::task::spawn_blocking(move || index.scan(&query))
            .await
            .map_err(|e| aura_core::AuraError::metadata(format!("Scan task failed: {}", e)))??;

        Ok(tracks)
    }
}

struct Scan<'a> {
    roots: &'a [PathBuf],
    config: &'a IndexConfig,
    reader: LoftyMetadataReader,
    catalog: &'a Mutex<Catalog>,
    catalog_path: Option<&'a Path>,
}

struct Candidate {
    path: PathBuf,
    modified: SystemTime,
}

impl Scan<'_> {
    fn run(&self, query: &MediaQuery) -> Result<Vec<Track>> {
        let mut candidates = Vec::new();
        for root in self.roots {
            check_root(root)?;
            self.discover(root, &mut candidates);
        }

        // Oldest files first so new ids follow modification order
        candidates.sort_by(|a, b| a.modified.cmp(&b.modified).then_with(|| a.path.cmp(&b.path)));

        let now = Utc::now();
        let mut excluded = 0usize;

        let mut catalog = self.catalog.lock().unwrap_or_else(PoisonError::into_inner);
        let mut added: Vec<(Track, DateTime<Utc>)> = Vec::new();

        for candidate in candidates {
            let tags = match self.reader.read(&candidate.path) {
                Ok(tags) => tags,
                Err(e) if query.music_only => {
                    tracing::debug!(path = %candidate.path.display(), error = %e, "Skipping unreadable file");
                    excluded += 1;
                    continue;
                }
                Err(_) => Default::default(),
            };

            if query.music_only && tags.duration_ms == 0 {
                excluded += 1;
                continue;
            }

            let entry = catalog.track_entry(&candidate.path, now);
            let album_id = catalog.album_id(&tags.album_key(&candidate.path));

            let title = tags.title.clone().unwrap_or_else(|| file_stem(&candidate.path));
            let mut track = Track::new(TrackId::new(entry.id), title, candidate.path)
                .with_duration_ms(tags.duration_ms)
                .with_album_id(album_id);
            if let Some(artist) = tags.artist {
                track = track.with_artist(artist);
            }

            added.push((track, entry.date_added));
        }

        if catalog.is_dirty() {
            if let Some(path) = self.catalog_path {
                catalog.save(path)?;
            }
        }
        drop(catalog);

        // Newest first, ties by descending id
        added.sort_by(|(a, a_added), (b, b_added)| {
            b_added.cmp(a_added).then_with(|| b.id.cmp(&a.id))
        });
        let tracks: Vec<Track> = added.into_iter().map(|(track, _)| track).collect();

        tracing::info!(
            tracks = tracks.len(),
            excluded,
            roots = self.roots.len(),
            "Media scan complete"
        );

        Ok(tracks)
    }

    fn discover(&self, root: &Path, out: &mut Vec<Candidate>) {
        for entry in walkdir::WalkDir::new(root)
            .follow_links(self.config.follow_links)
            .into_iter()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable entry");
                    continue;
                }
            };

            if !entry.file_type().is_file() || !self.is_supported_file(entry.path()) {
                continue;
            }

            let modified = entry
                .metadata()
                .ok()
                .and_then(|m| m.modified().ok())
                .unwrap_or(SystemTime::UNIX_EPOCH);

            out.push(Candidate {
                path: entry.into_path(),
                modified,
            });
        }
    }

    fn is_supported_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.config.extensions.contains(&e.to_lowercase()))
    }
}

fn check_root(root: &Path) -> Result<()> {
    let classify = |e: std::io::Error| match e.kind() {
        std::io::ErrorKind::NotFound => MetadataError::FileNotFound(root.to_path_buf()),
        std::io::ErrorKind::PermissionDenied => MetadataError::AccessDenied(root.to_path_buf()),
        _ => MetadataError::Io(e),
    };

    let metadata = std::fs::metadata(root).map_err(classify)?;
    if metadata.is_dir() {
        // Listing catches roots we can stat but not read
        std::fs::read_dir(root).map_err(classify)?;
    }
    Ok(())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Unknown")
        .to_string()
}
