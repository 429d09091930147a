mod ids;
mod library;
mod playback_state;
mod playlist;
mod track;

pub use ids::{PlaylistId, TrackId};
pub use library::{LibraryStatus, MediaOrder, MediaQuery, SortOrder};
pub use playback_state::{format_time, PlaybackSnapshot, RepeatMode};
pub use playlist::{Playlist, PlaylistTrack, PlaylistWithTracks};
pub use track::{album_art_for, Track, ALBUM_ART_BASE, UNKNOWN_ARTIST};
