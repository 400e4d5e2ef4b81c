//! Picks a small, varied shortlist of playable tracks from a music catalog
//! search.
//!
//! Core modules:
//! - [`track`] - Catalog records and their scored form
//! - [`validate`] - Playability filter and duplicate removal
//! - [`algorithm`] - Quality, relevance and diversity scoring
//! - [`ranking`] - Tolerance-based ordering and the diversity re-score
//! - [`shortlist`] - Selection strategies (top-N, diverse greedy)
//! - [`pipeline`] - The end-to-end `select_tracks` entry point
//!
//! ### Supporting Modules
//!
//! - [`catalog`] - Search response decoding and search URLs
//! - [`search`] - Query rewriting and track sources around the pipeline
//! - [`present`] - Display records: cleaned titles, stable colours
//! - [`config`] - Selection tuning and its config file
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation
//!
//! ## Quick Start Example
//!
//! ```
//! use mixtape::config::SelectionConfig;
//! use mixtape::track::RawTrack;
//!
//! let tracks: Vec<RawTrack> = (1..=8)
//!     .map(|id| RawTrack {
//!         preview_url: Some(format!("https://example.com/{id}.m4a")),
//!         genre: Some("Jazz".to_string()),
//!         ..RawTrack::new(id, &format!("Jazz Standard {id}"), &format!("Artist {}", id % 4))
//!     })
//!     .collect();
//!
//! let shortlist = mixtape::select_tracks(&tracks, "jazz", &SelectionConfig::default());
//! assert!(!shortlist.is_empty());
//! assert!(shortlist.len() <= 6);
//! ```
//!
//! ## Scoring
//!
//! Each track gets three scores in `[0, 1]`:
//!
//! - **Quality**: how complete its metadata is (artwork, album, genre,
//!   duration, release date)
//! - **Relevance**: how well title, artist, album and genre match the query
//! - **Diversity**: how different it is from the tracks ranked above it
//!
//! They are combined with weights that favour either quality or relevance.
//! Scores within a small tolerance count as ties, so ordering falls through
//! to the next criterion instead of hinging on noise.
//!
//! ## Selection
//!
//! With diversity on, the top three tracks are always taken and later ones
//! must respect per-artist, per-genre and per-album caps. Short pools are
//! backfilled in rank order, so the shortlist only comes up short when there
//! are not enough valid tracks.
//!
//! ## Error Handling
//!
//! The selection pipeline is total: bad records are dropped, never
//! reported. Fallible edges (config files, catalog decoding, track sources)
//! return `anyhow::Result` with context.

pub mod algorithm;
pub mod catalog;
pub mod cli;
pub mod completion;
pub mod config;
pub mod pipeline;
pub mod present;
pub mod ranking;
pub mod search;
pub mod shortlist;
pub mod track;
pub mod validate;

pub use pipeline::select_tracks;
pub use validate::deduplicate;
