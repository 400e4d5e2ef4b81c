//! Record validation and duplicate collapsing.
//!
//! Catalog responses routinely contain rows without a preview or with
//! blank names. Those are dropped silently; they are not errors.

use crate::track::RawTrack;
use std::collections::HashSet;

/// A track can be shortlisted only when it has a title, an artist and a
/// preview to play.
#[must_use]
pub fn is_playable(track: &RawTrack) -> bool {
    !track.title.is_empty() && !track.artist.is_empty() && track.preview().is_some()
}

/// Playable tracks only, with (title, artist) duplicates collapsed.
///
/// Order of first appearance is preserved and the first copy wins.
/// Identity comparison is case-insensitive and ignores surrounding
/// whitespace. Filtering happens first, so a broken row never shadows a
/// later playable copy of the same song.
///
/// # Examples
///
/// ```
/// use mixtape::track::RawTrack;
/// use mixtape::validate::deduplicate;
///
/// let playable = |id: u64, title: &str, artist: &str| RawTrack {
///     preview_url: Some(format!("https://example.com/{id}.m4a")),
///     ..RawTrack::new(id, title, artist)
/// };
/// let tracks = vec![
///     playable(1, "So What", "Miles Davis"),
///     playable(2, " so what", "MILES DAVIS"),
///     RawTrack::new(3, "Freddie Freeloader", "Miles Davis"),
///     playable(4, "Blue in Green", "Miles Davis"),
/// ];
/// let unique = deduplicate(&tracks);
/// assert_eq!(unique.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 4]);
/// ```
#[must_use]
pub fn deduplicate(tracks: &[RawTrack]) -> Vec<RawTrack> {
    let mut seen = HashSet::new();
    let unique: Vec<RawTrack> = tracks
        .iter()
        .filter(|track| is_playable(track))
        .filter(|track| seen.insert(track.identity()))
        .cloned()
        .collect();

    log::debug!("Kept {} of {} catalog records as unique and playable", unique.len(), tracks.len());
    unique
}
