//! Visible track list derivation

use aura_core::{SortOrder, Track};

/// Filter `tracks` by `query` and sort by `order`
///
/// The filter is a case-insensitive substring match over title and artist;
/// a blank query keeps every track. Sorting is stable, so equal keys keep
/// their incoming order.
pub fn visible_tracks(tracks: &[Track], query: &str, order: SortOrder) -> Vec<Track> {
    let mut visible: Vec<Track> = if query.trim().is_empty() {
        tracks.to_vec()
    } else {
        let needle = query.to_lowercase();
        tracks
            .iter()
            .filter(|track| track.matches_lowercase(&needle))
            .cloned()
            .collect()
    };

    match order {
        SortOrder::Title => visible.sort_by(|a, b| a.title.cmp(&b.title)),
        SortOrder::Artist => visible.sort_by(|a, b| a.artist.cmp(&b.artist)),
        SortOrder::DateAdded => visible.sort_by(|a, b| b.id.cmp(&a.id)),
    }

    visible
}

/// Position of `track` in `visible` for "play from here"
pub fn queue_start(visible: &[Track], track: aura_core::TrackId) -> Option<usize> {
    visible.iter().position(|t| t.id == track)
}
