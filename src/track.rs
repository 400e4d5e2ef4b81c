//! Track records as they arrive from the catalog, and their scored form.
//!
//! [`RawTrack`] mirrors one catalog search hit. Field names on the wire are
//! the catalog's camelCase names; anything the catalog sends that is not
//! listed here is kept untouched in [`RawTrack::extra`] so a caller can hand
//! the record back out without losing data.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One catalog search hit.
///
/// The ranking core only ever reads these. Optional text fields that are
/// present but empty are treated the same as absent (see the `*_name`
/// accessors).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTrack {
    #[serde(rename = "trackId", default, deserialize_with = "lenient_id")]
    pub id: u64,
    #[serde(rename = "trackName", default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(rename = "artistName", default, deserialize_with = "lenient_text")]
    pub artist: String,
    #[serde(
        rename = "collectionName",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub album: Option<String>,
    #[serde(
        rename = "primaryGenreName",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub genre: Option<String>,
    #[serde(
        rename = "trackTimeMillis",
        default,
        deserialize_with = "lenient_u64",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration_ms: Option<u64>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(
        rename = "artworkUrl100",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub artwork_url_100: Option<String>,
    #[serde(
        rename = "artworkUrl60",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub artwork_url_60: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64", skip_serializing_if = "Option::is_none")]
    pub track_number: Option<i64>,
    /// Catalog fields the core never inspects.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// Catalog rows are not trusted to be well typed. A field holding the wrong
// kind of value reads as absent so one bad row cannot fail the whole
// response; validation drops the row later if it matters.

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|value| value.is_finite() && *value >= 0.0)
                .map(|value| value as u64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_u64(deserializer)?.unwrap_or_default())
}

#[allow(clippy::cast_possible_truncation)]
fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|value| value.is_finite()).map(|value| value as i64)),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    })
}

fn non_empty(field: Option<&String>) -> Option<&str> {
    field.map(String::as_str).filter(|value| !value.is_empty())
}

impl RawTrack {
    /// Convenience constructor used mostly by tests and benches.
    #[must_use]
    pub fn new(id: u64, title: &str, artist: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            artist: artist.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn album_name(&self) -> Option<&str> {
        non_empty(self.album.as_ref())
    }

    #[must_use]
    pub fn genre_name(&self) -> Option<&str> {
        non_empty(self.genre.as_ref())
    }

    #[must_use]
    pub fn preview(&self) -> Option<&str> {
        non_empty(self.preview_url.as_ref())
    }

    /// Largest artwork reference available, if any.
    #[must_use]
    pub fn artwork(&self) -> Option<&str> {
        non_empty(self.artwork_url_100.as_ref()).or_else(|| non_empty(self.artwork_url_60.as_ref()))
    }

    /// Identity used for duplicate detection: lowercased, trimmed (title, artist).
    #[must_use]
    pub fn identity(&self) -> (String, String) {
        (
            self.title.trim().to_lowercase(),
            self.artist.trim().to_lowercase(),
        )
    }
}

/// A track plus the scores computed for it during one pipeline run.
///
/// Every component lies in `[0, 1]`; `score` is their weighted sum.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTrack {
    pub track: RawTrack,
    pub quality: f64,
    pub relevance: f64,
    pub diversity: f64,
    pub score: f64,
}

/// Strip the scores again. This is the only way scored data leaves the core.
impl From<ScoredTrack> for RawTrack {
    fn from(scored: ScoredTrack) -> Self {
        scored.track
    }
}
