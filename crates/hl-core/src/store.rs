//! JSON save files.
//!
//! Each phase's progress carries a `"type"` discriminator (`"FlatOdds"` or
//! `"ChainedOdds"`). Derived rolls and progress are written out for other
//! readers but recomputed from the count and charm when loading.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::campaign::Campaign;
use crate::error::{CoreError, CoreResult};
use crate::notify::Observer;
use crate::population::{Population, Selection};

/// Newest save file version this build reads and the one it writes.
pub const SAVE_VERSION: u32 = 1;

/// On-disk form of a population.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveFile {
    /// Format version.
    pub version: u32,
    /// When the file was written.
    pub saved_at: DateTime<Utc>,
    /// Every campaign, in order.
    pub campaigns: Vec<Campaign>,
    /// The active selection at save time.
    #[serde(default)]
    pub active: Vec<Selection>,
}

impl SaveFile {
    /// Snapshot a population.
    pub fn from_population<O: Observer>(population: &Population<O>) -> Self {
        Self {
            version: SAVE_VERSION,
            saved_at: Utc::now(),
            campaigns: population.campaigns().to_vec(),
            active: population.active().to_vec(),
        }
    }

    /// Rebuild a population reporting to `observer`. Saved selections that
    /// no longer resolve are dropped; duplicate campaign IDs are rejected.
    pub fn into_population<O: Observer>(self, observer: O) -> CoreResult<Population<O>> {
        let mut population = Population::from_campaigns(self.campaigns, observer)?;
        population.restore_active(self.active);
        Ok(population)
    }

    /// Encode as pretty-printed JSON.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode from JSON, rejecting files from a newer version.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let file: Self = serde_json::from_str(json)?;
        if file.version > SAVE_VERSION {
            return Err(CoreError::UnsupportedVersion {
                found: file.version,
                supported: SAVE_VERSION,
            });
        }
        Ok(file)
    }
}

/// Write a population to `path`.
pub fn save<O: Observer>(path: impl AsRef<Path>, population: &Population<O>) -> CoreResult<()> {
    let path = path.as_ref();
    let json = SaveFile::from_population(population).to_json()?;
    fs::write(path, json)?;
    debug!(path = %path.display(), campaigns = population.len(), "saved");
    Ok(())
}

/// Read a save file from `path`.
pub fn load(path: impl AsRef<Path>) -> CoreResult<SaveFile> {
    let path = path.as_ref();
    let file = SaveFile::from_json(&fs::read_to_string(path)?)?;
    debug!(path = %path.display(), campaigns = file.campaigns.len(), "loaded");
    Ok(file)
}
