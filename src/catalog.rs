//! Catalog search responses.
//!
//! Decodes the JSON a music catalog search returns and builds the search
//! URL for a term. Fetching is left to a [`crate::search::TrackSource`].

use crate::track::RawTrack;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

pub const SEARCH_ENDPOINT: &str = "https://itunes.apple.com/search";
/// Results requested per search; enough variety for the diversity caps.
pub const DEFAULT_SEARCH_LIMIT: usize = 50;

/// Envelope around catalog search hits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    #[serde(default)]
    pub result_count: usize,
    #[serde(default)]
    pub results: Vec<RawTrack>,
}

impl From<Vec<RawTrack>> for CatalogResponse {
    fn from(results: Vec<RawTrack>) -> Self {
        Self {
            result_count: results.len(),
            results,
        }
    }
}

/// Decode either a full search response or a bare array of records.
///
/// # Errors
///
/// Returns an error when the input is not JSON of either shape.
///
/// # Examples
///
/// ```
/// use mixtape::catalog::parse_catalog;
///
/// let tracks = parse_catalog(r#"{"resultCount": 1, "results": [{"trackId": 9, "trackName": "A", "artistName": "B"}]}"#)?;
/// assert_eq!(tracks[0].id, 9);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn parse_catalog(json: &str) -> Result<Vec<RawTrack>> {
    let raw: Value = serde_json::from_str(json).context("Catalog response is not valid JSON")?;

    let tracks = match raw {
        Value::Object(_) => {
            let response: CatalogResponse =
                serde_json::from_value(raw).context("Catalog response envelope is malformed")?;
            if response.result_count != response.results.len() {
                log::debug!(
                    "Catalog reported {} results but carried {}",
                    response.result_count,
                    response.results.len()
                );
            }
            response.results
        }
        Value::Array(_) => serde_json::from_value(raw).context("Catalog track list is malformed")?,
        _ => anyhow::bail!("Catalog response is neither a search envelope nor an array of tracks"),
    };

    log::debug!("Decoded {} catalog records", tracks.len());
    Ok(tracks)
}

/// Read and decode a catalog response from `input`, or stdin when `None`.
///
/// # Errors
///
/// Fails when the input cannot be read or decoded.
pub fn read_catalog(input: Option<&Path>) -> Result<Vec<RawTrack>> {
    let json = match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog response {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read catalog response from stdin")?;
            buffer
        }
    };

    parse_catalog(&json)
}

/// Serialize tracks back into a search envelope.
///
/// # Errors
///
/// Fails only if a passthrough field cannot be serialized.
pub fn to_catalog_json(tracks: Vec<RawTrack>) -> Result<String> {
    serde_json::to_string_pretty(&CatalogResponse::from(tracks)).context("Failed to encode catalog JSON")
}

/// Music search URL for `term`.
///
/// ```
/// use mixtape::catalog::search_url;
///
/// assert_eq!(
///     search_url("rainy day", 50),
///     "https://itunes.apple.com/search?term=rainy%20day&media=music&limit=50"
/// );
/// ```
#[must_use]
pub fn search_url(term: &str, limit: usize) -> String {
    format!(
        "{SEARCH_ENDPOINT}?term={}&media=music&limit={limit}",
        urlencoding::encode(term)
    )
}
