//! # Configuration Module
//!
//! Selection tuning for the shortlist pipeline and the optional on-disk file
//! it can be loaded from.
//!
//! ## Config File
//!
//! Mixtape looks for a JSON file in the platform-standard config directory:
//! - Linux: `~/.config/mixtape/config.json`
//! - macOS: `~/Library/Application Support/mixtape/config.json`
//! - Windows: `%APPDATA%\mixtape\config.json`
//!
//! Every key is optional; missing keys keep their defaults:
//!
//! ```json
//! { "maxResults": 8, "ensureGenreDiversity": false }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Knobs read once per selection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectionConfig {
    /// Upper bound on the shortlist length. Zero yields an empty shortlist.
    pub max_results: usize,
    /// Tracks whose quality score falls below this are never selected.
    pub min_quality_score: f64,
    /// Weigh quality and relevance equally instead of favouring relevance.
    pub prioritize_popularity: bool,
    /// Enforce per-artist/genre/album caps while picking.
    pub ensure_genre_diversity: bool,
    /// Reserved. Not consulted by any scorer yet.
    pub prefer_recent_releases: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            max_results: 6,
            min_quality_score: 0.3,
            prioritize_popularity: true,
            ensure_genre_diversity: true,
            prefer_recent_releases: false,
        }
    }
}

impl SelectionConfig {
    /// Reject values a config file should never carry.
    ///
    /// The pipeline itself stays total for any value; this check only
    /// exists so a typo in a file surfaces as an error instead of an
    /// always-empty shortlist.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_quality_score) {
            anyhow::bail!(
                "minQualityScore must be between 0 and 1, got {}",
                self.min_quality_score
            );
        }
        Ok(())
    }
}

/// Returns the platform-appropriate config file path.
///
/// The directory is not created; a missing file simply means defaults.
///
/// # Errors
///
/// Returns an error if the system config directory cannot be determined.
///
/// # Examples
///
/// ```no_run
/// use mixtape::config::get_config_path;
///
/// let path = get_config_path()?;
/// println!("Config location: {}", path.display());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn get_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or_else(|| {
        anyhow::anyhow!(
            "Could not determine system config directory. Pass --config to point at a file explicitly."
        )
    })?;

    Ok(config_dir.join("mixtape").join("config.json"))
}

/// Load a [`SelectionConfig`] from `path`, falling back to defaults when the
/// file does not exist.
///
/// # Errors
///
/// Fails when the file exists but cannot be read, is not valid JSON, or
/// carries out-of-range values.
pub fn load_selection_config(path: &Path) -> Result<SelectionConfig> {
    if !path.exists() {
        log::debug!("No config file at {}, using defaults", path.display());
        return Ok(SelectionConfig::default());
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: SelectionConfig = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid JSON in config file {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid value in config file {}", path.display()))?;

    log::info!("Loaded selection config from {}", path.display());
    Ok(config)
}
