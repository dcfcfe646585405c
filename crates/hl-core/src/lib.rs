//! Core model for Huntlog.
//!
//! A [`Population`] holds [`Campaign`]s, each an ordered list of [`Phase`]s
//! counted under an odds regime from [`hl_odds`]. The population owns the
//! active selection, dispatches every change to an injected [`Observer`],
//! and computes pooled luck across all campaigns.

/// Campaigns: ordered phase sequences.
pub mod campaign;
/// Background ticker and the elapsed-time feed.
pub mod clock;
/// Tracker settings.
pub mod config;
/// Error types for the core model.
pub mod error;
/// Change notification: fields, notices, and observers.
pub mod notify;
/// Single lockable runs of attempts.
pub mod phase;
/// The campaign population and its luck statistic.
pub mod population;
/// JSON save files.
pub mod store;

/// Re-exports of [`campaign::Campaign`], [`campaign::CampaignId`], and [`campaign::PhaseRef`].
pub use campaign::{Campaign, CampaignId, PhaseRef};
/// Re-exports of the time feed types.
pub use clock::{Ticker, TimeFeed, TimeSender};
/// Re-export of [`config::TrackerConfig`].
pub use config::TrackerConfig;
/// Re-exports of [`error::CoreError`] and [`error::CoreResult`].
pub use error::{CoreError, CoreResult};
/// Re-exports of the notification types.
pub use notify::{Change, ChangeLog, Field, Handlers, Notice, NullObserver, Observer, Target};
/// Re-export of [`phase::Phase`].
pub use phase::Phase;
/// Re-exports of the population types.
pub use population::{LuckReport, Population, Selection};
/// Re-exports of the save file types.
pub use store::{SAVE_VERSION, SaveFile};
