//! # Shortlist Selection
//!
//! Picks the final handful of tracks from a ranked list.
//!
//! ## Strategies
//!
//! - [`TopN`]: quality floor, then the first `max_results` in rank order
//! - [`DiverseGreedy`]: quality floor, always the best three, then only
//!   tracks that keep artists, genres and albums from piling up; any
//!   shortfall is backfilled in rank order with the caps lifted
//!
//! [`strategy_for`] picks one from the [`SelectionConfig`].

use crate::config::SelectionConfig;
use crate::track::ScoredTrack;
use std::collections::HashMap;

/// The best tracks are accepted no matter what they repeat.
pub const ALWAYS_TAKE: usize = 3;
pub const MAX_PER_ARTIST: usize = 2;
pub const MAX_PER_GENRE: usize = 3;
pub const MAX_PER_ALBUM: usize = 2;

/// Shortlist selection strategy over an already ranked list.
pub trait SelectionStrategy {
    /// Select at most `config.max_results` tracks from `ranked`.
    fn select(&self, ranked: Vec<ScoredTrack>, config: &SelectionConfig) -> Vec<ScoredTrack>;
}

/// Choose the strategy the config asks for.
#[must_use]
pub fn strategy_for(config: &SelectionConfig) -> &'static dyn SelectionStrategy {
    match config.ensure_genre_diversity {
        true => &DiverseGreedy,
        false => &TopN,
    }
}

fn passes_quality_floor(track: &ScoredTrack, config: &SelectionConfig) -> bool {
    track.quality >= config.min_quality_score
}

/// Plain prefix take.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopN;

impl SelectionStrategy for TopN {
    fn select(&self, ranked: Vec<ScoredTrack>, config: &SelectionConfig) -> Vec<ScoredTrack> {
        ranked
            .into_iter()
            .filter(|track| passes_quality_floor(track, config))
            .take(config.max_results)
            .collect()
    }
}

/// Occurrence counts among accepted tracks, keyed case-insensitively.
#[derive(Debug, Default)]
struct UsageCounts {
    artists: HashMap<String, usize>,
    genres: HashMap<String, usize>,
    albums: HashMap<String, usize>,
}

fn count_of(counts: &HashMap<String, usize>, key: Option<&String>) -> usize {
    key.and_then(|key| counts.get(key)).copied().unwrap_or(0)
}

impl UsageCounts {
    fn keys(track: &ScoredTrack) -> (String, Option<String>, Option<String>) {
        (
            track.track.artist.to_lowercase(),
            track.track.genre_name().map(str::to_lowercase),
            track.track.album_name().map(str::to_lowercase),
        )
    }

    /// A track without a genre or album never hits those caps.
    fn within_caps(&self, track: &ScoredTrack) -> bool {
        let (artist, genre, album) = Self::keys(track);
        count_of(&self.artists, Some(&artist)) < MAX_PER_ARTIST
            && count_of(&self.genres, genre.as_ref()) < MAX_PER_GENRE
            && count_of(&self.albums, album.as_ref()) < MAX_PER_ALBUM
    }

    fn record(&mut self, track: &ScoredTrack) {
        let (artist, genre, album) = Self::keys(track);
        *self.artists.entry(artist).or_insert(0) += 1;
        if let Some(genre) = genre {
            *self.genres.entry(genre).or_insert(0) += 1;
        }
        if let Some(album) = album {
            *self.albums.entry(album).or_insert(0) += 1;
        }
    }
}

/// Capped greedy scan with backfill.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiverseGreedy;

impl SelectionStrategy for DiverseGreedy {
    fn select(&self, ranked: Vec<ScoredTrack>, config: &SelectionConfig) -> Vec<ScoredTrack> {
        let candidates: Vec<ScoredTrack> = ranked
            .into_iter()
            .filter(|track| passes_quality_floor(track, config))
            .collect();

        let mut picks: Vec<usize> = Vec::with_capacity(config.max_results);
        let mut usage = UsageCounts::default();

        for (index, track) in candidates.iter().enumerate() {
            if picks.len() >= config.max_results {
                break;
            }
            if picks.len() < ALWAYS_TAKE || usage.within_caps(track) {
                usage.record(track);
                picks.push(index);
            } else {
                log::trace!(
                    "Skipping '{}' by {}: diversity caps reached",
                    track.track.title,
                    track.track.artist
                );
            }
        }

        let shortfall = config.max_results.saturating_sub(picks.len());
        if shortfall > 0 {
            let backfill: Vec<usize> = (0..candidates.len())
                .filter(|index| !picks.contains(index))
                .take(shortfall)
                .collect();
            if !backfill.is_empty() {
                log::debug!("Backfilling {} track(s) with diversity caps lifted", backfill.len());
            }
            picks.extend(backfill);
        }
        picks.truncate(config.max_results);

        let mut slots: Vec<Option<ScoredTrack>> = candidates.into_iter().map(Some).collect();
        picks
            .into_iter()
            .filter_map(|index| slots[index].take())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::RawTrack;

    fn ranked(id: u64, artist: &str, genre: Option<&str>, album: Option<&str>, quality: f64) -> ScoredTrack {
        ScoredTrack {
            track: RawTrack {
                genre: genre.map(String::from),
                album: album.map(String::from),
                ..RawTrack::new(id, &format!("Song {id}"), artist)
            },
            quality,
            relevance: 1.0,
            diversity: 1.0,
            score: 1.0,
        }
    }

    fn ids(tracks: &[ScoredTrack]) -> Vec<u64> {
        tracks.iter().map(|t| t.track.id).collect()
    }

    fn config(max_results: usize, ensure_genre_diversity: bool) -> SelectionConfig {
        SelectionConfig {
            max_results,
            ensure_genre_diversity,
            ..SelectionConfig::default()
        }
    }

    #[test]
    fn test_top_n_is_prefix_after_quality_floor() {
        let tracks = vec![
            ranked(1, "A", None, None, 0.9),
            ranked(2, "A", None, None, 0.1),
            ranked(3, "A", None, None, 0.3),
            ranked(4, "A", None, None, 0.8),
        ];
        let picked = TopN.select(tracks, &config(2, false));
        assert_eq!(ids(&picked), vec![1, 3]);
    }

    #[test]
    fn test_single_artist_pool_is_backfilled() {
        let tracks: Vec<ScoredTrack> = (1..=10).map(|id| ranked(id, "Same", None, None, 1.0)).collect();
        let picked = DiverseGreedy.select(tracks, &config(6, true));
        assert_eq!(ids(&picked), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_artist_cap_skips_then_backfills_in_rank_order() {
        let tracks = vec![
            ranked(1, "A", None, None, 1.0),
            ranked(2, "A", None, None, 1.0),
            ranked(3, "A", None, None, 1.0),
            ranked(4, "A", None, None, 1.0),
            ranked(5, "B", None, None, 1.0),
            ranked(6, "C", None, None, 1.0),
        ];
        let picked = DiverseGreedy.select(tracks, &config(5, true));
        // best three unconditionally, 4 skipped (A already has 3), B and C fit
        assert_eq!(ids(&picked), vec![1, 2, 3, 5, 6]);

        let tracks = vec![
            ranked(1, "A", None, None, 1.0),
            ranked(2, "A", None, None, 1.0),
            ranked(3, "A", None, None, 1.0),
            ranked(4, "A", None, None, 1.0),
            ranked(5, "B", None, None, 1.0),
        ];
        let picked = DiverseGreedy.select(tracks, &config(5, true));
        // scan winners first, then the skipped track as backfill
        assert_eq!(ids(&picked), vec![1, 2, 3, 5, 4]);
    }

    #[test]
    fn test_genre_and_album_caps() {
        let tracks = vec![
            ranked(1, "A", Some("Jazz"), Some("X"), 1.0),
            ranked(2, "B", Some("Jazz"), Some("X"), 1.0),
            ranked(3, "C", Some("jazz"), None, 1.0),
            ranked(4, "D", Some("Jazz"), None, 1.0),
            ranked(5, "E", Some("Rock"), Some("x"), 1.0),
            ranked(6, "F", Some("Rock"), Some("Y"), 1.0),
        ];
        let picked = DiverseGreedy.select(tracks, &config(4, true));
        // 4 hits the genre cap, 5 hits the album cap
        assert_eq!(ids(&picked), vec![1, 2, 3, 6]);
    }

    #[test]
    fn test_missing_genre_never_capped() {
        let tracks: Vec<ScoredTrack> = (1..=6)
            .map(|id| ranked(id, &format!("Artist {id}"), None, None, 1.0))
            .collect();
        let picked = DiverseGreedy.select(tracks, &config(6, true));
        assert_eq!(ids(&picked), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_quality_floor_applies_to_backfill() {
        let tracks = vec![
            ranked(1, "A", None, None, 1.0),
            ranked(2, "A", None, None, 1.0),
            ranked(3, "A", None, None, 1.0),
            ranked(4, "A", None, None, 0.1),
        ];
        let picked = DiverseGreedy.select(tracks, &config(6, true));
        assert_eq!(ids(&picked), vec![1, 2, 3]);
    }

    #[test]
    fn test_nothing_passes_floor() {
        let tracks = vec![ranked(1, "A", None, None, 0.2)];
        assert!(DiverseGreedy.select(tracks.clone(), &config(6, true)).is_empty());
        assert!(TopN.select(tracks, &config(6, false)).is_empty());
    }

    #[test]
    fn test_zero_max_results() {
        let tracks = vec![ranked(1, "A", None, None, 1.0)];
        assert!(DiverseGreedy.select(tracks.clone(), &config(0, true)).is_empty());
        assert!(TopN.select(tracks, &config(0, false)).is_empty());
    }

    #[test]
    fn test_strategy_for_follows_config() {
        let tracks: Vec<ScoredTrack> = (1..=5).map(|id| ranked(id, "Same", None, None, 1.0)).collect();
        let capped = strategy_for(&config(4, true)).select(tracks.clone(), &config(4, true));
        let plain = strategy_for(&config(4, false)).select(tracks, &config(4, false));
        assert_eq!(ids(&capped), ids(&plain));
        assert_eq!(capped.len(), 4);
    }
}
