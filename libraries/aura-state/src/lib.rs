//! Aura Player State
//!
//! Application state coordinator sitting between the media index, the
//! playlist store and the presentation layer.
//!
//! # Example
//!
//! ```rust,no_run
//! use aura_state::AppState;
//! use aura_core::{MediaIndex, PlaylistStore, SortOrder};
//! use std::sync::Arc;
//! # async fn example(index: Arc<dyn MediaIndex>, store: Arc<dyn PlaylistStore>) -> aura_core::Result<()> {
//! let state = AppState::new(index, store).await?;
//! state.load_library().await?;
//!
//! state.set_search_query("beat");
//! state.set_sort_order(SortOrder::Title);
//! for track in state.tracks().borrow().iter() {
//!     println!("{} - {}", track.artist, track.title);
//! }
//! # Ok(())
//! # }
//! ```

mod app_state;
mod view;

pub use app_state::{AppState, DEFAULT_DARK_THEME};
pub use view::{queue_start, visible_tracks};
