//! # Command-Line Interface Module
//!
//! Defines the `mixtape` command line with Clap derive macros.
//!
//! ## Commands
//!
//! - `select`: shortlist a catalog search response for a query
//! - `score`: show every valid track with its scores, in rank order
//! - `dedup`: drop unplayable records and collapse duplicate (title, artist) records
//! - `url`: print the catalog search URL for a term
//! - `completion`: generate shell completions
//!
//! Catalog input is the JSON a search returns, read from `--input` or stdin.
//!
//! ## Examples
//!
//! ```bash
//! curl -s "$(mixtape url 'smooth jazz')" | mixtape select --query "smooth jazz"
//! mixtape score --query jazz --input results.json --no-diversity
//! ```

use crate::config::{self, SelectionConfig};
use anyhow::Result;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Main application arguments structure.
#[derive(Parser, Debug)]
#[command(name = "mixtape")]
#[command(about = "Mixtape: a small, diverse shortlist of playable tracks from a catalog search")]
#[command(version)]
pub struct Args {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Selection tuning shared by `select` and `score`.
///
/// Values come from the config file first; flags override them.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct TuningArgs {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "MIXTAPE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Maximum number of tracks to shortlist
    #[arg(short = 'n', long)]
    pub max_results: Option<usize>,

    /// Minimum quality score (0-1) a track needs to be picked
    #[arg(long)]
    pub min_quality: Option<f64>,

    /// Favour query relevance over metadata quality
    #[arg(long)]
    pub no_popularity: bool,

    /// Skip the per-artist/genre/album caps and take the top tracks
    #[arg(long)]
    pub no_diversity: bool,
}

impl TuningArgs {
    /// Resolve the effective selection config.
    ///
    /// # Errors
    ///
    /// Fails if the config file is unreadable or invalid, or if
    /// `--min-quality` is outside `[0, 1]`.
    pub fn resolve(&self) -> Result<SelectionConfig> {
        let path = match &self.config {
            Some(path) => path.clone(),
            None => config::get_config_path()?,
        };
        let mut selection = config::load_selection_config(&path)?;
        self.apply(&mut selection);
        selection.validate()?;
        Ok(selection)
    }

    /// Apply flag overrides on top of `selection`.
    pub fn apply(&self, selection: &mut SelectionConfig) {
        if let Some(max_results) = self.max_results {
            selection.max_results = max_results;
        }
        if let Some(min_quality) = self.min_quality {
            selection.min_quality_score = min_quality;
        }
        if self.no_popularity {
            selection.prioritize_popularity = false;
        }
        if self.no_diversity {
            selection.ensure_genre_diversity = false;
        }
    }
}

/// Enumeration of all available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Shortlist catalog results for a query
    ///
    /// Drops unplayable and duplicate records, scores the rest for
    /// metadata quality, query relevance and variety, and prints the
    /// winners as display records.
    Select {
        /// The user's search query, used for relevance scoring
        #[arg(short, long)]
        query: String,

        /// Catalog search response (JSON); stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[command(flatten)]
        tuning: TuningArgs,

        /// Print the shortlist as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show every valid track with its scores, in final rank order
    Score {
        /// The user's search query, used for relevance scoring
        #[arg(short, long)]
        query: String,

        /// Catalog search response (JSON); stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[command(flatten)]
        tuning: TuningArgs,
    },

    /// Drop unplayable records and collapse those sharing a title and artist, keeping the first
    Dedup {
        /// Catalog search response (JSON); stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Print the catalog search URL for a term
    Url {
        /// Search term
        term: String,

        /// Number of results to request
        #[arg(long, default_value_t = crate::catalog::DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },

    /// Generate shell completions
    ///
    /// Usage: mixtape completion bash > ~/.local/share/bash-completion/completions/mixtape
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}
