use hl_odds::OddsError;

use crate::campaign::CampaignId;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when building or querying the hunt model.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An unsupported or malformed odds regime was selected.
    #[error("configuration error: {0}")]
    Configuration(#[from] OddsError),

    /// A mutation would break a model invariant, e.g. a negative count.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// A statistic was requested over too little data to be defined.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// The requested campaign ID does not exist in the population.
    #[error("campaign not found: {0}")]
    CampaignNotFound(CampaignId),

    /// The requested phase index does not exist in the campaign.
    #[error("phase {index} not found in campaign {campaign}")]
    PhaseNotFound {
        /// The campaign that was searched.
        campaign: CampaignId,
        /// The missing phase index.
        index: usize,
    },

    /// Reading or writing the save file failed.
    #[error("save file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The save file could not be encoded or decoded.
    #[error("save file format error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The save file was written by a newer version.
    #[error("unsupported save file version {found} (this build reads up to {supported})")]
    UnsupportedVersion {
        /// Version recorded in the file.
        found: u32,
        /// Newest version this build understands.
        supported: u32,
    },
}
