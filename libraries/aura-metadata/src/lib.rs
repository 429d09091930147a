//! Aura Player Metadata
//!
//! Filesystem-backed media index for Aura Player.
//!
//! This crate provides:
//! - Tag reading from audio files (MP3, FLAC, OGG, WAV, AAC, OPUS)
//! - [`FsMediaIndex`], a [`MediaIndex`](aura_core::MediaIndex) over one or
//!   more music folders
//! - A persistent catalog that keeps track and album ids stable across scans
//!
//! # Example
//!
//! ```rust,no_run
//! use aura_metadata::FsMediaIndex;
//! use aura_core::{MediaIndex, MediaQuery};
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let index = FsMediaIndex::new(vec!["/music".into()])
//!     .with_catalog("/var/lib/aura/catalog.json")?;
//!
//! let tracks = index.query(&MediaQuery::default()).await?;
//! println!("{} tracks", tracks.len());
//! # Ok(())
//! # }
//! ```

mod catalog;
mod error;
mod index;
mod reader;

pub use catalog::{Catalog, CatalogEntry};
pub use error::{MetadataError, Result};
pub use index::{FsMediaIndex, IndexConfig};
pub use reader::{LoftyMetadataReader, TrackTags};
