//! # Search Flow
//!
//! Wires the shortlist pipeline to its collaborators:
//!
//! 1. an optional [`QueryRewriter`] turns a long "vibe" description into a
//!    short catalog search term
//! 2. a [`TrackSource`] fetches raw catalog records for that term
//! 3. playable tracks are narrowed to one per cleaned display title, then
//!    [`select_tracks`] shortlists them against the user's original query
//! 4. [`present`] maps the winners to display records
//!
//! Both collaborators are injected, so nothing here reads process-wide
//! configuration or touches the network by itself.

use crate::config::SelectionConfig;
use crate::pipeline::select_tracks;
use crate::present::{self, Song};
use crate::track::RawTrack;
use crate::validate::deduplicate;
use anyhow::{Context, Result};

/// Queries with more words than this are sent through the rewriter.
pub const REWRITE_MIN_WORDS: usize = 3;

/// Fetches raw catalog records for a search term.
pub trait TrackSource {
    /// # Errors
    ///
    /// Implementations report transport or decoding failures.
    fn fetch(&self, term: &str) -> Result<Vec<RawTrack>>;
}

/// Turns a free-form description ("rainy day") into a short search term
/// ("acoustic").
pub trait QueryRewriter {
    /// # Errors
    ///
    /// Failures are not fatal; the raw query is used instead.
    fn rewrite(&self, query: &str) -> Result<String>;
}

impl<F> TrackSource for F
where
    F: Fn(&str) -> Result<Vec<RawTrack>>,
{
    fn fetch(&self, term: &str) -> Result<Vec<RawTrack>> {
        self(term)
    }
}

/// Always answers with the query it was given.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRewrite;

impl QueryRewriter for NoRewrite {
    fn rewrite(&self, query: &str) -> Result<String> {
        Ok(query.to_string())
    }
}

/// Search term to send to the catalog for `query`.
///
/// Short queries pass through untouched. Longer ones go to `rewriter`; a
/// failed or blank rewrite falls back to the raw query.
#[must_use]
pub fn effective_search_term(query: &str, rewriter: &dyn QueryRewriter) -> String {
    if query.split(' ').count() <= REWRITE_MIN_WORDS {
        return query.to_string();
    }

    match rewriter.rewrite(query) {
        Ok(term) if !term.trim().is_empty() => {
            let term = term.trim().to_string();
            log::info!("Rewrote query '{query}' to search term '{term}'");
            term
        }
        Ok(_) => {
            log::warn!("Query rewriter returned nothing for '{query}', using raw query");
            query.to_string()
        }
        Err(e) => {
            log::warn!("Query rewrite failed ({e:#}), using raw query");
            query.to_string()
        }
    }
}

/// Run a full search and return display-ready songs.
///
/// # Errors
///
/// Returns an error if the query is blank or the source fails to fetch.
/// An empty catalog answer is not an error; it yields an empty list.
pub fn search_music(
    query: &str,
    source: &dyn TrackSource,
    rewriter: &dyn QueryRewriter,
    config: &SelectionConfig,
) -> Result<Vec<Song>> {
    validate_input(query)?;

    let term = effective_search_term(query, rewriter);
    let tracks = source
        .fetch(&term)
        .with_context(|| format!("Failed to fetch catalog results for '{term}'"))?;

    // display titles must be unique among playable tracks, before selection
    // so the shortlist still fills up
    let candidates = present::distinct_titles(deduplicate(&tracks));

    Ok(select_tracks(&candidates, query, config)
        .iter()
        .map(present::present)
        .collect())
}

fn validate_input(query: &str) -> Result<()> {
    if query.trim().is_empty() {
        anyhow::bail!("Search query cannot be empty");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct FixedRewriter(&'static str);

    impl QueryRewriter for FixedRewriter {
        fn rewrite(&self, _query: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingRewriter;

    impl QueryRewriter for FailingRewriter {
        fn rewrite(&self, _query: &str) -> Result<String> {
            anyhow::bail!("no API key")
        }
    }

    struct RecordingSource {
        terms: RefCell<Vec<String>>,
        tracks: Vec<RawTrack>,
    }

    impl TrackSource for RecordingSource {
        fn fetch(&self, term: &str) -> Result<Vec<RawTrack>> {
            self.terms.borrow_mut().push(term.to_string());
            Ok(self.tracks.clone())
        }
    }

    fn playable(id: u64, title: &str, artist: &str) -> RawTrack {
        RawTrack {
            preview_url: Some(format!("https://example.com/{id}.m4a")),
            ..RawTrack::new(id, title, artist)
        }
    }

    #[test]
    fn test_short_queries_are_not_rewritten() {
        assert_eq!(effective_search_term("rainy day", &FixedRewriter("acoustic")), "rainy day");
        assert_eq!(
            effective_search_term("one two three", &FixedRewriter("acoustic")),
            "one two three"
        );
    }

    #[test]
    fn test_long_queries_are_rewritten() {
        let term = effective_search_term("music for a rainy day", &FixedRewriter("  acoustic \n"));
        assert_eq!(term, "acoustic");
    }

    #[test]
    fn test_rewrite_failures_fall_back() {
        let query = "music for a rainy day";
        assert_eq!(effective_search_term(query, &FailingRewriter), query);
        assert_eq!(effective_search_term(query, &FixedRewriter("   ")), query);
        assert_eq!(effective_search_term(query, &NoRewrite), query);
    }

    #[test]
    fn test_search_uses_rewritten_term_but_original_query() {
        let source = RecordingSource {
            terms: RefCell::new(Vec::new()),
            tracks: vec![playable(1, "Acoustic Morning", "Guitarist"), playable(2, "", "Nobody")],
        };

        let songs = search_music(
            "something calm for a rainy day",
            &source,
            &FixedRewriter("acoustic"),
            &SelectionConfig::default(),
        )
        .unwrap();

        assert_eq!(source.terms.borrow().as_slice(), ["acoustic"]);
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].id, "itunes-1");
    }

    #[test]
    fn test_search_drops_repeated_display_titles() {
        let source = RecordingSource {
            terms: RefCell::new(Vec::new()),
            tracks: vec![
                playable(1, "Sultry Jazz Nights for Cooking", "Cafe Trio"),
                RawTrack::new(2, "Take Five", "Dave Brubeck"),
                playable(3, "Jazz Nights", "Late Quartet"),
                playable(4, "Take Five", "Dave Brubeck"),
            ],
        };

        let songs = search_music("jazz", &source, &NoRewrite, &SelectionConfig::default()).unwrap();

        let mut titles: Vec<&str> = songs.iter().map(|song| song.title.as_str()).collect();
        titles.sort_unstable();
        assert_eq!(titles, ["Jazz Nights", "Take Five"]);
        assert!(songs.iter().any(|song| song.id == "itunes-4"));
    }

    #[test]
    fn test_closure_source_and_errors() {
        let failing = |_: &str| -> Result<Vec<RawTrack>> { anyhow::bail!("offline") };
        let err = search_music("jazz", &failing, &NoRewrite, &SelectionConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("offline"));

        let empty = |_: &str| -> Result<Vec<RawTrack>> { Ok(Vec::new()) };
        let songs = search_music("jazz", &empty, &NoRewrite, &SelectionConfig::default()).unwrap();
        assert!(songs.is_empty());
    }

    #[test]
    fn test_blank_query_rejected() {
        let empty = |_: &str| -> Result<Vec<RawTrack>> { Ok(Vec::new()) };
        assert!(search_music("  ", &empty, &NoRewrite, &SelectionConfig::default()).is_err());
    }
}
