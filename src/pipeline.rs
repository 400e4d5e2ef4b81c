//! End-to-end shortlist pipeline.
//!
//! validate → score → rank (two passes) → select → strip scores.
//!
//! Every function here is total: malformed input, an empty pool or a
//! `max_results` of zero all produce an empty shortlist.

use crate::algorithm::ScoringContext;
use crate::config::SelectionConfig;
use crate::ranking;
use crate::shortlist::strategy_for;
use crate::track::{RawTrack, ScoredTrack};
use crate::validate;
use chrono::{DateTime, Utc};

/// Shortlist `tracks` for `query`, dating releases against the current clock.
///
/// # Examples
///
/// ```
/// use mixtape::config::SelectionConfig;
/// use mixtape::pipeline::select_tracks;
///
/// assert!(select_tracks(&[], "jazz", &SelectionConfig::default()).is_empty());
/// ```
#[must_use]
pub fn select_tracks(tracks: &[RawTrack], query: &str, config: &SelectionConfig) -> Vec<RawTrack> {
    select_tracks_at(tracks, query, config, Utc::now())
}

/// Same as [`select_tracks`] with an explicit reference instant, so the
/// result depends on nothing but the arguments.
#[must_use]
pub fn select_tracks_at(
    tracks: &[RawTrack],
    query: &str,
    config: &SelectionConfig,
    now: DateTime<Utc>,
) -> Vec<RawTrack> {
    if config.max_results == 0 {
        log::debug!("max_results is zero, nothing to select");
        return Vec::new();
    }

    let ranked = score_tracks_at(tracks, query, config, now);
    let selected = strategy_for(config).select(ranked, config);

    log::info!(
        "Shortlisted {} of {} catalog records for '{}'",
        selected.len(),
        tracks.len(),
        query
    );

    selected.into_iter().map(RawTrack::from).collect()
}

/// Every valid track in final rank order, scores attached.
///
/// Diagnostic view of the pipeline before selection; used by the `score`
/// command.
#[must_use]
pub fn score_tracks_at(
    tracks: &[RawTrack],
    query: &str,
    config: &SelectionConfig,
    now: DateTime<Utc>,
) -> Vec<ScoredTrack> {
    let valid = validate::deduplicate(tracks);
    if valid.is_empty() {
        return Vec::new();
    }

    let context = ScoringContext::new(now, config.prioritize_popularity);
    ranking::rank(valid, query, &context)
}
