//! Display records for shortlisted tracks.
//!
//! Catalog titles are often stuffed with playlist filler ("Background Music
//! for Cooking"), so titles are cleaned before display. Each song also gets
//! a body colour and a label tint derived from its text, so the same song
//! always looks the same.

use crate::track::RawTrack;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Preview clips are thirty seconds long.
pub const PREVIEW_DURATION: &str = "0:30";

/// Filler removed from catalog titles, applied in this order.
const GENERIC_PHRASES: &[&str] = &[
    "Jazz Classics",
    "Background for",
    "Music for",
    "Ambiance for",
    "Mood for",
    "Vibe for",
    "Soundtrack for",
    "Backdrops for",
    "Ambience for",
    "Moods for",
    "Music for Cooking",
    "Background Music",
    "Chilled Music",
    "Relaxed Music",
    "Lively Music",
    "Sophisticated",
    "Charming",
    "Delightful",
    "Sensational",
    "Bright",
    "Sprightly",
    "Pulsating",
    "Inspiring",
    "Happy",
    "Simplistic",
    "Sultry",
    "Stylish",
    "No Drums Jazz",
    "for Lockdowns",
    "for Quarantine",
    "for Work from Home",
    "for Preparing Dinner",
    "for Cooking Dinner",
    "for Cooking",
    " - ",
];

/// Words kept lowercase in title case, except at the start.
const MINOR_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
];

const LABEL_TONES: &[&str] = &[
    "#f8fafc", "#fffbeb", "#f0f9ff", "#fff1f2", "#f0fdf4", "#fafafa", "#fdf4ff", "#ecfeff",
];

/// A shortlisted track ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub color: String,
    pub accent_color: String,
    pub duration: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

/// Map a catalog record to its display record.
#[must_use]
pub fn present(track: &RawTrack) -> Song {
    let genre = track.genre_name().unwrap_or_default();
    Song {
        id: format!("itunes-{}", track.id),
        title: clean_title(&track.title),
        artist: track.artist.trim().to_string(),
        color: string_to_color(&format!("{genre}{}v2", track.artist), false),
        accent_color: string_to_color(&track.title, true),
        duration: PREVIEW_DURATION.to_string(),
        audio_url: track.preview().map(String::from),
    }
}

/// Remove every ASCII-case-insensitive occurrence of `phrase`.
fn remove_phrase(haystack: &str, phrase: &str) -> String {
    let lower = haystack.to_ascii_lowercase();
    let needle = phrase.to_ascii_lowercase();
    let mut out = String::with_capacity(haystack.len());
    let mut last = 0;

    for (start, _) in lower.match_indices(&needle) {
        out.push_str(&haystack[last..start]);
        last = start + needle.len();
    }
    out.push_str(&haystack[last..]);
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

/// Strip catalog filler and title-case what is left.
///
/// If cleaning leaves fewer than three characters the original title is
/// used (still normalized).
///
/// # Examples
///
/// ```
/// use mixtape::present::clean_title;
///
/// assert_eq!(clean_title("Sultry Autumn Leaves for Cooking"), "Autumn Leaves");
/// assert_eq!(clean_title("the end OF the night"), "The End of the Night");
/// ```
#[must_use]
pub fn clean_title(title: &str) -> String {
    let mut cleaned = title.trim().to_string();
    for phrase in GENERIC_PHRASES {
        cleaned = remove_phrase(&cleaned, phrase).trim().to_string();
    }

    if cleaned.chars().count() < 3 {
        cleaned = title.trim().to_string();
    }

    let titled = cleaned
        .split_whitespace()
        .enumerate()
        .map(|(index, word)| {
            let lower = word.to_lowercase();
            if index > 0 && MINOR_WORDS.contains(&lower.as_str()) {
                lower
            } else {
                capitalize(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    match titled.is_empty() {
        true => title.to_string(),
        false => titled,
    }
}

/// Keep the first track for each cleaned display title.
///
/// Catalog filler often hides the same song under several titles ("Jazz
/// Nights" and "Sultry Jazz Nights for Cooking"), which would look like
/// repeats once cleaned. Comparison is case-insensitive and ignores the
/// artist.
#[must_use]
pub fn distinct_titles(tracks: Vec<RawTrack>) -> Vec<RawTrack> {
    let mut seen = HashSet::new();
    let total = tracks.len();
    let distinct: Vec<RawTrack> = tracks
        .into_iter()
        .filter(|track| seen.insert(clean_title(&track.title).to_lowercase()))
        .collect();

    if distinct.len() < total {
        log::debug!("Dropped {} track(s) with repeated display titles", total - distinct.len());
    }
    distinct
}

/// 32-bit rolling string hash over UTF-16 code units (`h * 31 + c`).
fn string_hash(s: &str) -> i64 {
    s.encode_utf16().fold(0_i64, |hash, unit| {
        // the shift wraps at 32 bits; the subtraction does not
        let shifted = i64::from((hash as i32).wrapping_shl(5));
        i64::from(unit) + (shifted - hash)
    })
}

/// HSL (degrees, percent, percent) to `#rrggbb`.
#[must_use]
pub fn hsl_to_hex(h: f64, s: f64, l: f64) -> String {
    let l = l / 100.0;
    let a = s * l.min(1.0 - l) / 100.0;
    let channel = |n: f64| {
        let k = (n + h / 30.0) % 12.0;
        let color = l - a * (k - 3.0).min(9.0 - k).min(1.0).max(-1.0);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let byte = (255.0 * color).round().clamp(0.0, 255.0) as u8;
        format!("{byte:02x}")
    };
    format!("#{}{}{}", channel(0.0), channel(8.0), channel(4.0))
}

/// Stable colour for a piece of text.
///
/// Body colours are saturated mid-tones (saturation 60-90%, lightness
/// 25-55%). Labels pick one of eight pale paper tones.
#[must_use]
pub fn string_to_color(s: &str, label: bool) -> String {
    let hash = string_hash(s).unsigned_abs();

    if label {
        #[allow(clippy::cast_possible_truncation)]
        return LABEL_TONES[(hash % LABEL_TONES.len() as u64) as usize].to_string();
    }

    #[allow(clippy::cast_precision_loss)]
    let (h, s, l) = ((hash % 360) as f64, (60 + hash % 31) as f64, (25 + hash % 31) as f64);
    hsl_to_hex(h, s, l)
}

/// `m:ss` for a duration in milliseconds.
#[must_use]
pub fn format_duration(duration_ms: u64) -> String {
    let seconds = duration_ms / 1000;
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
