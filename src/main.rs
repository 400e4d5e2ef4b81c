//! # Mixtape
//!
//! Turns a music catalog search response into a short, varied list of
//! playable tracks. The catalog itself is never contacted here: `url` prints
//! the search URL, and `select`/`score`/`dedup` read the response JSON from
//! a file or stdin.
//!
//! ## Usage
//!
//! ```bash
//! # Shortlist a search
//! curl -s "$(mixtape url 'kind of blue')" | mixtape select --query "kind of blue"
//!
//! # Inspect the ranking behind it
//! mixtape score --query "kind of blue" --input results.json
//!
//! # Drop duplicate records
//! mixtape dedup --input results.json > clean.json
//! ```

use anyhow::Result;
use clap::{CommandFactory, Parser};
use log::{debug, info};
use mixtape::catalog;
use mixtape::present::{format_duration, Song};
use mixtape::search::{self, NoRewrite};
use mixtape::track::ScoredTrack;
use mixtape::{cli, completion, pipeline, validate};
use std::io::{self, Write};

/// Main entry point for the Mixtape CLI.
///
/// Logging is controlled via `RUST_LOG`:
/// - `RUST_LOG=debug mixtape select ...` - pipeline stage counts
/// - `RUST_LOG=mixtape::ranking=trace mixtape score ...` - every comparison pass
fn main() -> Result<()> {
    env_logger::init();

    let args = cli::Args::parse();

    match args.command {
        cli::Command::Select { query, input, tuning, json } => {
            let config = tuning.resolve()?;
            debug!("Selection config: {config:?}");

            let source = |term: &str| {
                debug!("Reading catalog response for '{term}'");
                catalog::read_catalog(input.as_deref())
            };
            let songs = search::search_music(&query, &source, &NoRewrite, &config)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&songs)?);
            } else {
                print_songs(&songs);
            }
        }
        cli::Command::Score { query, input, tuning } => {
            let config = tuning.resolve()?;
            let tracks = catalog::read_catalog(input.as_deref())?;
            let ranked = pipeline::score_tracks_at(&tracks, &query, &config, chrono::Utc::now());
            info!("Scored {} of {} catalog records", ranked.len(), tracks.len());
            print_scores(&ranked);
        }
        cli::Command::Dedup { input } => {
            let tracks = catalog::read_catalog(input.as_deref())?;
            let unique = validate::deduplicate(&tracks);
            info!("Kept {} of {} catalog records", unique.len(), tracks.len());
            println!("{}", catalog::to_catalog_json(unique)?);
        }
        cli::Command::Url { term, limit } => {
            println!("{}", catalog::search_url(&term, limit));
        }
        cli::Command::Completion { shell } => {
            let mut cmd = cli::Args::command();
            let mut stdout = io::stdout();
            completion::generate_completions(
                completion::shell_to_completion_shell(shell),
                &mut cmd,
                &mut stdout,
            );
            stdout.flush()?;
        }
    }

    Ok(())
}

fn print_songs(songs: &[Song]) {
    if songs.is_empty() {
        println!("No playable tracks found");
        return;
    }

    for (index, song) in songs.iter().enumerate() {
        println!("{:2}. {} - {} [{}]", index + 1, song.artist, song.title, song.duration);
        if let Some(url) = &song.audio_url {
            println!("    {url}");
        }
    }
}

fn print_scores(ranked: &[ScoredTrack]) {
    if ranked.is_empty() {
        println!("No valid tracks to score");
        return;
    }

    println!(
        "{:>4}  {:>6}  {:>7}  {:>9}  {:>9}  {:>6}  Track",
        "#", "score", "quality", "relevance", "diversity", "length"
    );
    for (index, scored) in ranked.iter().enumerate() {
        let length = scored
            .track
            .duration_ms
            .map_or_else(|| "-".to_string(), format_duration);
        println!(
            "{:>4}  {:>6.3}  {:>7.3}  {:>9.3}  {:>9.3}  {:>6}  {} - {}",
            index + 1,
            scored.score,
            scored.quality,
            scored.relevance,
            scored.diversity,
            length,
            scored.track.artist,
            scored.track.title
        );
    }
}
