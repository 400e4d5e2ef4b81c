//! Track scoring algorithms for shortlist selection.
//!
//! Three independent scores, each in `[0, 1]`:
//!
//! - **quality**: how complete and song-shaped the catalog metadata is
//! - **relevance**: how strongly the query text matches the track
//! - **diversity**: how little the track repeats artists, genres and albums
//!   of tracks ranked ahead of it
//!
//! [`WeightConfig::combine`] folds them into a single total.

use crate::track::{RawTrack, ScoredTrack};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Raw quality points are normalized against this ceiling.
const QUALITY_CEILING: f64 = 100.0;
/// Raw relevance points are normalized against this ceiling.
const RELEVANCE_CEILING: f64 = 100.0;
/// Query words this short or shorter are ignored.
const MIN_TOKEN_CHARS: usize = 2;
const MILLIS_PER_YEAR: f64 = 1000.0 * 60.0 * 60.0 * 24.0 * 365.0;

/// Convex weights for combining the three sub-scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightConfig {
    pub quality: f64,
    pub relevance: f64,
    pub diversity: f64,
}

impl WeightConfig {
    /// Quality and relevance count the same.
    pub const POPULARITY: Self = Self {
        quality: 0.4,
        relevance: 0.4,
        diversity: 0.2,
    };

    /// Relevance dominates.
    pub const RELEVANCE: Self = Self {
        quality: 0.3,
        relevance: 0.5,
        diversity: 0.2,
    };

    #[must_use]
    pub const fn for_popularity(prioritize_popularity: bool) -> Self {
        match prioritize_popularity {
            true => Self::POPULARITY,
            false => Self::RELEVANCE,
        }
    }

    #[inline]
    #[must_use]
    pub fn combine(&self, quality: f64, relevance: f64, diversity: f64) -> f64 {
        quality * self.quality + relevance * self.relevance + diversity * self.diversity
    }
}

/// Immutable inputs shared by every score computed during one run.
#[derive(Debug, Clone)]
pub struct ScoringContext {
    /// Reference instant for release-date ages.
    pub now: DateTime<Utc>,
    pub weights: WeightConfig,
}

impl ScoringContext {
    #[must_use]
    pub fn new(now: DateTime<Utc>, prioritize_popularity: bool) -> Self {
        Self {
            now,
            weights: WeightConfig::for_popularity(prioritize_popularity),
        }
    }
}

impl Default for ScoringContext {
    fn default() -> Self {
        Self::new(Utc::now(), true)
    }
}

/// Metadata completeness score.
///
/// Sums fixed bonuses and divides by 100:
///
/// ```text
/// preview             +20
/// title and artist    +15
/// album               +10
/// genre               +10
/// duration            +15 (2-6 min) | +10 (1-10 min) | +5 otherwise
/// artwork             +10
/// track number > 0    +5
/// release date        +15 (5-30 years old) | +10 (0-50 years old)
/// ```
///
/// # Examples
///
/// ```
/// use mixtape::algorithm::{quality_score, ScoringContext};
/// use mixtape::track::RawTrack;
///
/// let track = RawTrack {
///     preview_url: Some("https://example.com/p.m4a".to_string()),
///     ..RawTrack::new(1, "So What", "Miles Davis")
/// };
/// let score = quality_score(&track, &ScoringContext::default());
/// assert!((score - 0.35).abs() < 1e-9);
/// ```
#[must_use]
pub fn quality_score(track: &RawTrack, context: &ScoringContext) -> f64 {
    let bonuses = [
        bonus(track.preview().is_some(), 20),
        bonus(!track.title.is_empty() && !track.artist.is_empty(), 15),
        bonus(track.album_name().is_some(), 10),
        bonus(track.genre_name().is_some(), 10),
        duration_points(track.duration_ms),
        bonus(track.artwork().is_some(), 10),
        bonus(track.track_number.is_some_and(|n| n > 0), 5),
        release_points(track.release_date.as_deref(), context.now),
    ];

    let raw: u32 = bonuses.iter().sum();
    log::trace!("Quality points {} for '{}'", raw, track.title);
    (f64::from(raw) / QUALITY_CEILING).min(1.0)
}

#[inline]
const fn bonus(condition: bool, points: u32) -> u32 {
    match condition {
        true => points,
        false => 0,
    }
}

/// Typical songs run two to six minutes. Unknown (or zero) length scores nothing.
fn duration_points(duration_ms: Option<u64>) -> u32 {
    match duration_ms {
        None | Some(0) => 0,
        Some(ms) => {
            #[allow(clippy::cast_precision_loss)]
            let minutes = ms as f64 / 60_000.0;
            if (2.0..=6.0).contains(&minutes) {
                15
            } else if (1.0..=10.0).contains(&minutes) {
                10
            } else {
                5
            }
        }
    }
}

/// Releases between five and thirty years old get the "classic era" bonus.
fn release_points(release_date: Option<&str>, now: DateTime<Utc>) -> u32 {
    let Some(released) = release_date.and_then(parse_release_date) else {
        return 0;
    };

    #[allow(clippy::cast_precision_loss)]
    let years = (now - released).num_milliseconds() as f64 / MILLIS_PER_YEAR;
    match years {
        y if (5.0..=30.0).contains(&y) => 15,
        y if (0.0..=50.0).contains(&y) => 10,
        _ => 0,
    }
}

/// Parse the date formats seen in catalog responses.
///
/// Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS`, plain
/// `YYYY-MM-DD` and bare four-digit years. Anything else is `None`.
#[must_use]
pub fn parse_release_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| Utc.from_utc_datetime(&naive));
    }
    if raw.len() == 4 {
        let year = raw.parse::<i32>().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Utc.from_utc_datetime(&naive));
    }

    None
}

/// Query words that take part in per-word matching.
#[must_use]
pub fn query_tokens(query_lower: &str) -> Vec<&str> {
    query_lower
        .split_whitespace()
        .filter(|word| word.chars().count() > MIN_TOKEN_CHARS)
        .collect()
}

/// Points for one field: `whole` when the full query appears in it,
/// otherwise `per_token` for every query word it contains.
fn field_points(field: &str, query: &str, tokens: &[&str], whole: u32, per_token: u32) -> u32 {
    if field.contains(query) {
        whole
    } else {
        token_points(field, tokens, per_token)
    }
}

fn token_points(field: &str, tokens: &[&str], per_token: u32) -> u32 {
    let hits = tokens.iter().filter(|token| field.contains(*token)).count();
    u32::try_from(hits).unwrap_or(u32::MAX).saturating_mul(per_token)
}

/// Textual match strength between `query` and the track.
///
/// An empty query is neutral (0.5). Otherwise, case-insensitively:
///
/// ```text
/// title   whole query +40, else +15 per word
/// artist  whole query +20, else +10 per word
/// genre   whole query +15, else +5 per word
/// album   +3 per word
/// ```
///
/// Only words longer than two characters count; the sum is divided by 100.
///
/// # Examples
///
/// ```
/// use mixtape::algorithm::relevance_score;
/// use mixtape::track::RawTrack;
///
/// let track = RawTrack::new(1, "Smooth Jazz Nights", "Unknown");
/// assert!((relevance_score(&track, "jazz") - 0.40).abs() < 1e-9);
/// assert!((relevance_score(&track, "cool jazz") - 0.15).abs() < 1e-9);
/// assert!((relevance_score(&track, "") - 0.5).abs() < 1e-9);
/// ```
#[must_use]
pub fn relevance_score(track: &RawTrack, query: &str) -> f64 {
    if query.is_empty() {
        return 0.5;
    }

    let query = query.to_lowercase();
    let tokens = query_tokens(&query);
    let title = track.title.to_lowercase();
    let artist = track.artist.to_lowercase();
    let genre = track.genre_name().unwrap_or_default().to_lowercase();
    let album = track.album_name().unwrap_or_default().to_lowercase();

    let raw = field_points(&title, &query, &tokens, 40, 15)
        + field_points(&artist, &query, &tokens, 20, 10)
        + field_points(&genre, &query, &tokens, 15, 5)
        + token_points(&album, &tokens, 3);

    log::trace!("Relevance points {} for '{}' against '{}'", raw, track.title, query);
    (f64::from(raw) / RELEVANCE_CEILING).min(1.0)
}

fn same_text(a: Option<&str>, b: &str) -> bool {
    a.is_some_and(|a| a.to_lowercase() == b)
}

/// How little `track` repeats the tracks in `selected`.
///
/// Starts at 1.0 and loses 0.3 per earlier track by the same artist, 0.2 per
/// earlier track in the same genre and 0.25 per earlier track from the same
/// album. Tracks in a genre that is rare within `pool` earn up to 0.2 back.
/// An empty `selected` always yields exactly 1.0.
///
/// # Examples
///
/// ```
/// use mixtape::algorithm::diversity_score;
/// use mixtape::track::RawTrack;
///
/// let track = RawTrack::new(1, "Song", "Artist");
/// assert_eq!(diversity_score(&track, &[], &[]), 1.0);
/// ```
#[must_use]
pub fn diversity_score(track: &RawTrack, selected: &[ScoredTrack], pool: &[ScoredTrack]) -> f64 {
    if selected.is_empty() {
        return 1.0;
    }

    let artist = track.artist.to_lowercase();
    let same_artist = selected
        .iter()
        .filter(|t| t.track.artist.to_lowercase() == artist)
        .count();

    let mut score = 1.0 - 0.3 * count_f64(same_artist);

    if let Some(genre) = track.genre_name().map(str::to_lowercase) {
        let same_genre = selected
            .iter()
            .filter(|t| same_text(t.track.genre_name(), &genre))
            .count();
        score -= 0.2 * count_f64(same_genre);
    }

    if let Some(album) = track.album_name().map(str::to_lowercase) {
        let same_album = selected
            .iter()
            .filter(|t| same_text(t.track.album_name(), &album))
            .count();
        score -= 0.25 * count_f64(same_album);
    }

    if let Some(genre) = track.genre_name().map(str::to_lowercase) {
        if !pool.is_empty() {
            let frequency = pool
                .iter()
                .filter(|t| same_text(t.track.genre_name(), &genre))
                .count();
            let rarity = 1.0 - count_f64(frequency) / count_f64(pool.len());
            score += 0.2 * rarity;
        }
    }

    score.clamp(0.0, 1.0)
}

#[inline]
#[allow(clippy::cast_precision_loss)]
fn count_f64(count: usize) -> f64 {
    count as f64
}

/// Score a track for the first ranking pass, with diversity held at 1.0.
#[must_use]
pub fn score_track(track: RawTrack, query: &str, context: &ScoringContext) -> ScoredTrack {
    let quality = quality_score(&track, context);
    let relevance = relevance_score(&track, query);
    let diversity = 1.0;

    ScoredTrack {
        score: context.weights.combine(quality, relevance, diversity),
        track,
        quality,
        relevance,
        diversity,
    }
}
