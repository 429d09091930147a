//! Property-based tests for the visible list derivation

use aura_core::{SortOrder, Track, TrackId};
use aura_state::visible_tracks;
use proptest::prelude::*;
use std::path::PathBuf;

fn arbitrary_tracks() -> impl Strategy<Value = Vec<Track>> {
    prop::collection::vec(("[A-Za-z ]{0,12}", "[A-Za-z ]{0,12}"), 0..40).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (title, artist))| {
                Track::new(TrackId::new(i as i64 + 1), title, PathBuf::from("/t.mp3"))
                    .with_artist(artist)
            })
            .collect()
    })
}

fn arbitrary_order() -> impl Strategy<Value = SortOrder> {
    prop_oneof![
        Just(SortOrder::Title),
        Just(SortOrder::Artist),
        Just(SortOrder::DateAdded),
    ]
}

proptest! {
    /// Property: every visible track matches the query and nothing matching is dropped
    #[test]
    fn filter_is_exact(tracks in arbitrary_tracks(), query in "[A-Za-z]{1,3}", order in arbitrary_order()) {
        let visible = visible_tracks(&tracks, &query, order);
        let needle = query.to_lowercase();

        prop_assert!(visible.iter().all(|t| t.matches_lowercase(&needle)));
        let expected = tracks.iter().filter(|t| t.matches_lowercase(&needle)).count();
        prop_assert_eq!(visible.len(), expected);
    }

    /// Property: blank queries never filter
    #[test]
    fn blank_query_is_identity_set(tracks in arbitrary_tracks(), spaces in " {0,4}", order in arbitrary_order()) {
        let visible = visible_tracks(&tracks, &spaces, order);
        prop_assert_eq!(visible.len(), tracks.len());
    }

    /// Property: output is ordered by the sort key
    #[test]
    fn output_is_sorted(tracks in arbitrary_tracks(), order in arbitrary_order()) {
        let visible = visible_tracks(&tracks, "", order);
        for pair in visible.windows(2) {
            match order {
                SortOrder::Title => prop_assert!(pair[0].title <= pair[1].title),
                SortOrder::Artist => prop_assert!(pair[0].artist <= pair[1].artist),
                SortOrder::DateAdded => prop_assert!(pair[0].id > pair[1].id),
            }
        }
    }

    /// Property: equal sort keys keep incoming order
    #[test]
    fn sort_is_stable(tracks in arbitrary_tracks()) {
        let visible = visible_tracks(&tracks, "", SortOrder::Title);
        for pair in visible.windows(2) {
            if pair[0].title == pair[1].title {
                prop_assert!(pair[0].id < pair[1].id);
            }
        }
    }
}
