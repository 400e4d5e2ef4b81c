//! Two-pass ranking of scored tracks.
//!
//! Pass one scores every track with diversity held at 1.0 and orders them.
//! Pass two walks that order, recomputes each track's diversity against the
//! tracks ranked ahead of it, recombines the total and orders again.
//!
//! Ordering is not a plain sort by total: totals within 0.1 of each other
//! fall through to quality, then relevance (each within 0.05), then
//! diversity. That comparator is not transitive, so ordering uses
//! [`stable_sort_by`] rather than the standard library sorts, which are
//! allowed to panic on such comparators.

use crate::algorithm::{self, ScoringContext};
use crate::track::{RawTrack, ScoredTrack};
use std::cmp::Ordering;

pub const SCORE_EPSILON: f64 = 0.1;
pub const QUALITY_EPSILON: f64 = 0.05;
pub const RELEVANCE_EPSILON: f64 = 0.05;

/// Descending on `a` vs `b`, but only when they differ by more than `epsilon`.
#[inline]
fn descending_beyond(a: f64, b: f64, epsilon: f64) -> Option<Ordering> {
    match (a - b).abs() > epsilon {
        true => Some(b.partial_cmp(&a).unwrap_or(Ordering::Equal)),
        false => None,
    }
}

/// Tie-break chain: total, quality, relevance, diversity (all descending).
#[must_use]
pub fn compare_scored(a: &ScoredTrack, b: &ScoredTrack) -> Ordering {
    descending_beyond(a.score, b.score, SCORE_EPSILON)
        .or_else(|| descending_beyond(a.quality, b.quality, QUALITY_EPSILON))
        .or_else(|| descending_beyond(a.relevance, b.relevance, RELEVANCE_EPSILON))
        .unwrap_or_else(|| b.diversity.partial_cmp(&a.diversity).unwrap_or(Ordering::Equal))
}

/// Stable sort that tolerates non-transitive comparators.
///
/// Extends the leading run (reversing it when strictly descending), then
/// binary-inserts the remaining items one by one. Equal items keep their
/// input order. Quadratic moves in the worst case; catalog pages are a few
/// dozen entries.
pub fn stable_sort_by<T, F>(items: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    if items.len() < 2 {
        return;
    }

    let run = leading_run(items, &mut compare);
    for i in run..items.len() {
        let (mut left, mut right) = (0, i);
        while left < right {
            let mid = left + (right - left) / 2;
            match compare(&items[i], &items[mid]) {
                Ordering::Less => right = mid,
                _ => left = mid + 1,
            }
        }
        items[left..=i].rotate_right(1);
    }
}

fn leading_run<T, F>(items: &mut [T], compare: &mut F) -> usize
where
    F: FnMut(&T, &T) -> Ordering,
{
    let descending = compare(&items[1], &items[0]) == Ordering::Less;
    let mut run = 2;

    while run < items.len() {
        let order = compare(&items[run], &items[run - 1]);
        let breaks = match descending {
            true => order != Ordering::Less,
            false => order == Ordering::Less,
        };
        if breaks {
            break;
        }
        run += 1;
    }

    if descending {
        items[..run].reverse();
    }
    run
}

/// Order scored tracks with [`compare_scored`].
#[must_use]
pub fn sort_scored(mut tracks: Vec<ScoredTrack>) -> Vec<ScoredTrack> {
    stable_sort_by(&mut tracks, compare_scored);
    tracks
}

/// Recompute diversity for each track against the ones ranked ahead of it.
///
/// Measured against rank precedence, not against what is finally picked.
#[must_use]
pub fn rescore_diversity(ranked: &[ScoredTrack], context: &ScoringContext) -> Vec<ScoredTrack> {
    ranked
        .iter()
        .enumerate()
        .map(|(index, scored)| {
            let diversity = algorithm::diversity_score(&scored.track, &ranked[..index], ranked);
            ScoredTrack {
                diversity,
                score: context.weights.combine(scored.quality, scored.relevance, diversity),
                ..scored.clone()
            }
        })
        .collect()
}

/// Full two-pass ranking of already validated tracks.
#[must_use]
pub fn rank(tracks: Vec<RawTrack>, query: &str, context: &ScoringContext) -> Vec<ScoredTrack> {
    let first_pass = sort_scored(
        tracks
            .into_iter()
            .map(|track| algorithm::score_track(track, query, context))
            .collect(),
    );

    let ranked = sort_scored(rescore_diversity(&first_pass, context));

    if log::log_enabled!(log::Level::Trace) {
        for (position, scored) in ranked.iter().enumerate() {
            log::trace!(
                "#{} {} - {} (total {:.3}, q {:.2}, r {:.2}, d {:.2})",
                position + 1,
                scored.track.artist,
                scored.track.title,
                scored.score,
                scored.quality,
                scored.relevance,
                scored.diversity
            );
        }
    }

    ranked
}
