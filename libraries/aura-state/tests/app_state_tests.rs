//! Integration tests for the application state coordinator
//!
//! The store is a real SQLite file; the media index is an in-memory fake.

use async_trait::async_trait;
use aura_core::types::*;
use aura_core::{AuraError, MediaIndex, PlaylistStore, SETTING_DARK_THEME};
use aura_state::AppState;
use aura_storage::LocalStorageContext;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const WAIT: Duration = Duration::from_secs(5);

struct FakeIndex {
    result: std::result::Result<Vec<Track>, String>,
}

#[async_trait]
impl MediaIndex for FakeIndex {
    async fn query(&self, _query: &MediaQuery) -> aura_core::Result<Vec<Track>> {
        self.result
            .clone()
            .map_err(AuraError::permission_denied)
    }
}

fn track(id: i64, title: &str, artist: &str) -> Track {
    Track::new(TrackId::new(id), title, PathBuf::from(format!("/music/{}.mp3", id)))
        .with_artist(artist)
        .with_duration_ms(200_000)
}

fn library() -> Vec<Track> {
    vec![
        track(3, "Let It Be", "Beatles"),
        track(2, "Today", "Tame Impala"),
        track(1, "Yesterday", "Beatles"),
    ]
}

struct Fixture {
    state: AppState,
    store: Arc<LocalStorageContext>,
    _temp_dir: TempDir,
}

async fn fixture(index: FakeIndex) -> Fixture {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let url = format!("sqlite://{}", temp_dir.path().join("state.db").display());
    let pool = aura_storage::create_pool(&url).await.unwrap();
    aura_storage::run_migrations(&pool).await.unwrap();
    let store = Arc::new(LocalStorageContext::new(pool));

    let state = AppState::new(Arc::new(index), store.clone()).await.unwrap();
    Fixture {
        state,
        store,
        _temp_dir: temp_dir,
    }
}

fn ids(tracks: &[Track]) -> Vec<i64> {
    tracks.iter().map(|t| t.id.get()).collect()
}

#[tokio::test]
async fn test_load_library_publishes_and_caches() {
    let f = fixture(FakeIndex { result: Ok(library()) }).await;
    assert_eq!(*f.state.library_status().borrow(), LibraryStatus::Loading);

    let status = f.state.load_library().await.unwrap();

    assert_eq!(status, LibraryStatus::Ready { count: 3 });
    assert_eq!(*f.state.library_status().borrow(), status);
    assert_eq!(ids(&f.state.tracks().borrow()), vec![3, 2, 1]);
    assert_eq!(
        aura_storage::tracks::count(f.store.pool()).await.unwrap(),
        3
    );
}

#[tokio::test]
async fn test_index_failure_requires_permission() {
    let f = fixture(FakeIndex {
        result: Err("storage access denied".into()),
    })
    .await;

    let status = f.state.load_library().await.unwrap();

    assert_eq!(status, LibraryStatus::PermissionRequired);
    assert!(f.state.tracks().borrow().is_empty());
}

#[tokio::test]
async fn test_search_and_sort_rederive() {
    let f = fixture(FakeIndex { result: Ok(library()) }).await;
    f.state.load_library().await.unwrap();
    let tracks = f.state.tracks();

    f.state.set_search_query("beatles");
    assert_eq!(ids(&tracks.borrow()), vec![3, 1]);

    f.state.set_sort_order(SortOrder::Title);
    assert_eq!(ids(&tracks.borrow()), vec![3, 1]);

    f.state.set_search_query("to");
    assert_eq!(ids(&tracks.borrow()), vec![2]);

    f.state.set_search_query("");
    assert_eq!(ids(&tracks.borrow()), vec![3, 2, 1]);
    assert_eq!(*f.state.sort_order().borrow(), SortOrder::Title);
}

#[tokio::test]
async fn test_concurrent_inputs_leave_consistent_view() {
    let Fixture {
        state,
        store: _store,
        _temp_dir,
    } = fixture(FakeIndex { result: Ok(library()) }).await;
    state.load_library().await.unwrap();
    let state = Arc::new(state);

    let queries = ["beatles", "to", "", "let", "impala"];
    let orders = [SortOrder::Title, SortOrder::Artist, SortOrder::DateAdded];

    for round in 0..50 {
        std::thread::scope(|scope| {
            let searcher = Arc::clone(&state);
            scope.spawn(move || {
                for query in queries {
                    searcher.set_search_query(query);
                }
            });
            let sorter = Arc::clone(&state);
            scope.spawn(move || {
                for order in orders.iter().cycle().skip(round % 3).take(4) {
                    sorter.set_sort_order(*order);
                }
            });
        });

        let expected = aura_state::visible_tracks(
            &library(),
            &state.search_query().borrow(),
            *state.sort_order().borrow(),
        );
        assert_eq!(*state.tracks().borrow(), expected, "round {}", round);
    }
}

#[tokio::test]
async fn test_queue_from_uses_visible_list() {
    let f = fixture(FakeIndex { result: Ok(library()) }).await;
    f.state.load_library().await.unwrap();
    f.state.set_sort_order(SortOrder::Artist);

    let (queue, start) = f.state.queue_from(TrackId::new(2)).unwrap();
    assert_eq!(ids(&queue), vec![3, 1, 2]);
    assert_eq!(start, 2);

    f.state.set_search_query("zzz");
    assert!(f.state.queue_from(TrackId::new(2)).is_none());
}

#[tokio::test]
async fn test_theme_defaults_dark_and_persists() {
    let f = fixture(FakeIndex { result: Ok(Vec::new()) }).await;
    assert!(*f.state.dark_theme().borrow());

    assert!(!f.state.toggle_theme().await.unwrap());
    assert!(!*f.state.dark_theme().borrow());
    assert_eq!(
        f.store.get_flag(SETTING_DARK_THEME).await.unwrap(),
        Some(false)
    );

    // A new coordinator over the same store sees the stored flag
    let again = AppState::new(
        Arc::new(FakeIndex { result: Ok(Vec::new()) }),
        f.store.clone(),
    )
    .await
    .unwrap();
    assert!(!*again.dark_theme().borrow());
}

#[tokio::test]
async fn test_playlist_mutations_flow_to_observables() {
    let f = fixture(FakeIndex { result: Ok(library()) }).await;
    f.state.load_library().await.unwrap();

    let playlist = f.state.create_playlist("  Road Trip ").await.unwrap();
    assert_eq!(playlist.name, "Road Trip");

    let mut playlists = f.state.playlists();
    tokio::time::timeout(WAIT, playlists.wait_for(|p| p.len() == 1))
        .await
        .expect("playlist list refresh")
        .unwrap();

    let mut detail = f.state.playlist(playlist.id);
    f.state
        .add_tracks_to_playlist(playlist.id, &[TrackId::new(1), TrackId::new(3)])
        .await
        .unwrap();
    f.state
        .add_track_to_playlist(playlist.id, TrackId::new(1))
        .await
        .unwrap();
    f.state
        .remove_track_from_playlist(playlist.id, TrackId::new(3))
        .await
        .unwrap();

    let current = tokio::time::timeout(
        WAIT,
        detail.wait_for(|p| p.as_ref().is_some_and(|p| p.tracks.len() == 1)),
    )
    .await
    .expect("playlist detail refresh")
    .unwrap()
    .unwrap();
    assert_eq!(current.tracks[0].title, "Yesterday");

    f.state.rename_playlist(playlist.id, "Commute").await.unwrap();
    f.state.delete_playlist(playlist.id).await.unwrap();
    tokio::time::timeout(WAIT, playlists.wait_for(Vec::is_empty))
        .await
        .expect("playlist removal")
        .unwrap();
}

#[tokio::test]
async fn test_blank_playlist_names_rejected() {
    let f = fixture(FakeIndex { result: Ok(Vec::new()) }).await;

    assert!(matches!(
        f.state.create_playlist("   ").await,
        Err(AuraError::InvalidInput(_))
    ));

    let playlist = f.state.create_playlist("Keep").await.unwrap();
    assert!(matches!(
        f.state.rename_playlist(playlist.id, "").await,
        Err(AuraError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn test_store_errors_are_returned() {
    let f = fixture(FakeIndex { result: Ok(Vec::new()) }).await;

    let result = f.state.delete_playlist(PlaylistId::new(999)).await;
    assert!(matches!(result, Err(AuraError::PlaylistNotFound(_))));
}
