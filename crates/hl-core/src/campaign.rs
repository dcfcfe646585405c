//! Campaigns: ordered sequences of phases.
//!
//! Only the last phase takes new attempts and time. Earlier phases are
//! history. Locking a campaign locks every phase; reopening it unlocks only
//! the last one, so a resumed hunt continues where it stopped without
//! making old phases editable again.

use std::fmt;
use std::time::Duration;

use hl_odds::{OddsRegime, survival};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::notify::{Change, Field};
use crate::phase::Phase;

/// Stable handle to a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CampaignId(pub Uuid);

impl CampaignId {
    /// Generate a new random campaign ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CampaignId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Index of a phase within its campaign.
pub type PhaseRef = usize;

/// One overall hunt, split into phases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CampaignRecord")]
pub struct Campaign {
    id: CampaignId,
    name: String,
    phases: Vec<Phase>,
    regime: OddsRegime,
    #[serde(skip_serializing)]
    odds: f64,
}

impl Campaign {
    /// Create a campaign with a single empty phase, `Phase_1`.
    pub fn new(name: impl Into<String>, regime: OddsRegime) -> CoreResult<Self> {
        let odds = regime.base_odds()?;
        Ok(Self {
            id: CampaignId::new(),
            name: name.into(),
            phases: vec![Phase::new(phase_name(1), regime)?],
            regime,
            odds,
        })
    }

    /// Stable handle of this campaign.
    pub fn id(&self) -> CampaignId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The nominal regime new phases default to.
    pub fn regime(&self) -> OddsRegime {
        self.regime
    }

    /// All phases, oldest first. Never empty.
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// A phase by index.
    pub fn phase(&self, index: PhaseRef) -> Option<&Phase> {
        self.phases.get(index)
    }

    /// The phase currently receiving attempts.
    pub fn last_phase(&self) -> &Phase {
        &self.phases[self.last_index()]
    }

    fn last_index(&self) -> PhaseRef {
        self.phases.len() - 1
    }

    fn phase_mut(&mut self, index: PhaseRef) -> CoreResult<&mut Phase> {
        let campaign = self.id;
        self.phases
            .get_mut(index)
            .ok_or(CoreError::PhaseNotFound { campaign, index })
    }

    fn last_phase_mut(&mut self) -> &mut Phase {
        let last = self.last_index();
        &mut self.phases[last]
    }

    /// Append `Phase_<n>` under `regime`. The charm carries over from the
    /// previous last phase; earlier phases are untouched.
    pub fn new_phase(&mut self, regime: OddsRegime) -> CoreResult<PhaseRef> {
        let has_charm = self.last_phase().has_charm();
        let phase = Phase::with_charm(phase_name(self.phases.len() + 1), regime, has_charm)?;
        self.phases.push(phase);
        debug!(campaign = %self.id, phases = self.phases.len(), %regime, "appended phase");
        Ok(self.last_index())
    }

    /// Add attempts to the last phase.
    pub fn increase_by(&mut self, delta: i64) -> CoreResult<Option<Change>> {
        let last = self.last_index();
        let field = self.phases[last].increase_by(delta)?;
        Ok(field.map(|f| Change::phase(last, f)))
    }

    /// Add elapsed time to the last phase.
    pub fn add_time(&mut self, time: Duration) -> Option<Change> {
        let last = self.last_index();
        self.phases[last]
            .add_time(time)
            .map(|f| Change::phase(last, f))
    }

    /// Set the campaign-wide count. The difference lands on the last phase;
    /// a total below what earlier phases already hold is rejected.
    pub fn set_count(&mut self, total: u64) -> CoreResult<Option<Change>> {
        let last = self.last_index();
        if self.phases[last].is_completed() {
            return Ok(None);
        }
        let earlier = self.get_count() - self.phases[last].count();
        let count = total.checked_sub(earlier).ok_or_else(|| {
            warn!(campaign = %self.id, total, earlier, "rejected count change");
            CoreError::InvariantViolation(format!(
                "total count {total} is below the {earlier} attempts held by earlier phases"
            ))
        })?;
        Ok(self.phases[last]
            .set_count(count)
            .map(|f| Change::phase(last, f)))
    }

    /// Set the campaign-wide elapsed time, adjusting the last phase.
    pub fn set_time(&mut self, total: Duration) -> CoreResult<Option<Change>> {
        let last = self.last_index();
        if self.phases[last].is_completed() {
            return Ok(None);
        }
        let earlier = self.get_time() - self.phases[last].elapsed();
        let time = total.checked_sub(earlier).ok_or_else(|| {
            warn!(campaign = %self.id, ?total, ?earlier, "rejected time change");
            CoreError::InvariantViolation(format!(
                "total time {total:?} is below the {earlier:?} held by earlier phases"
            ))
        })?;
        Ok(self.phases[last]
            .set_time(time)
            .map(|f| Change::phase(last, f)))
    }

    /// Rename the campaign.
    pub fn rename(&mut self, name: impl Into<String>) -> Change {
        self.name = name.into();
        Change::campaign(Field::Name)
    }

    /// Rename one phase.
    pub fn rename_phase(&mut self, index: PhaseRef, name: impl Into<String>) -> CoreResult<Change> {
        let field = self.phase_mut(index)?.rename(name);
        Ok(Change::phase(index, field))
    }

    /// Lock or unlock a single phase.
    pub fn set_phase_completed(&mut self, index: PhaseRef, flag: bool) -> CoreResult<Change> {
        let field = self.phase_mut(index)?.set_completed(flag);
        Ok(Change::phase(index, field))
    }

    /// `true` locks every phase; `false` reopens only the last one.
    pub fn set_completed(&mut self, flag: bool) -> Change {
        if flag {
            for phase in &mut self.phases {
                phase.set_completed(true);
            }
        } else {
            self.last_phase_mut().set_completed(false);
        }
        Change::campaign(Field::IsCompleted)
    }

    /// Whether every phase is locked.
    pub fn is_completed(&self) -> bool {
        self.phases.iter().all(Phase::is_completed)
    }

    /// Toggle the charm on every unlocked phase.
    pub fn set_charm(&mut self, has_charm: bool) -> Option<Change> {
        let changed = self
            .phases
            .iter_mut()
            .filter_map(|p| p.set_charm(has_charm))
            .count();
        if changed == 0 {
            return None;
        }
        Some(Change::campaign(Field::HasCharm))
    }

    /// Whether the active phase has the charm.
    pub fn has_charm(&self) -> bool {
        self.last_phase().has_charm()
    }

    /// Switch the nominal regime and recount the last phase under it, if
    /// that phase is unlocked.
    pub fn set_regime(&mut self, regime: OddsRegime) -> CoreResult<Change> {
        let odds = regime.base_odds()?;
        self.last_phase_mut().set_regime(regime)?;
        self.regime = regime;
        self.odds = odds;
        Ok(Change::campaign(Field::ProgressType))
    }

    /// Total attempts across all phases.
    pub fn get_count(&self) -> u64 {
        self.phases
            .iter()
            .fold(0, |acc: u64, p| acc.saturating_add(p.count()))
    }

    /// Total time across all phases.
    pub fn get_time(&self) -> Duration {
        self.phases
            .iter()
            .fold(Duration::ZERO, |acc, p| acc.saturating_add(p.elapsed()))
    }

    /// Total equivalent rolls across all phases.
    pub fn get_rolls(&self) -> u64 {
        self.phases
            .iter()
            .fold(0, |acc: u64, p| acc.saturating_add(p.rolls()))
    }

    /// Sum of each phase's probability of no success.
    ///
    /// Additive across phases rather than a joint probability: each phase is
    /// a separate stretch that may run under its own regime. It can exceed 1
    /// for campaigns with several phases.
    pub fn get_progress(&self) -> f64 {
        self.phases.iter().map(Phase::progress).sum()
    }

    /// Base odds of the nominal regime.
    pub fn get_odds(&self) -> f64 {
        self.odds
    }

    /// `(1 - 1/odds)^count` at the nominal odds, ignoring charm and chain
    /// bonuses.
    pub fn get_chance(&self) -> f64 {
        survival(1.0 / self.odds, self.get_count())
    }

    /// Per-attempt odds equivalent to the rolls accumulated so far.
    ///
    /// For flat regimes this is the nominal odds. For chains it reflects how
    /// deep the chains ran. `None` before the first attempt.
    pub fn effective_odds(&self) -> Option<f64> {
        let count = self.get_count();
        if count == 0 {
            return None;
        }
        if !self.regime.is_chain() {
            return Some(self.odds);
        }
        let rolls_per_attempt = self.get_rolls() as f64 / count as f64;
        let miss = (rolls_per_attempt * (-1.0 / self.odds).ln_1p()).exp();
        Some(1.0 / (1.0 - miss))
    }

    /// Number of successes this campaign records: one per phase for flat
    /// regimes, one in total for chains.
    pub fn completions(&self) -> u64 {
        if self.regime.has_phases() {
            self.phases.len() as u64
        } else {
            1
        }
    }

    /// Expected number of successes given the rolls so far.
    pub fn expected_completions(&self) -> f64 {
        self.phases
            .iter()
            .map(|p| p.rolls() as f64 / p.odds())
            .sum()
    }
}

fn phase_name(position: usize) -> String {
    format!("Phase_{position}")
}

/// Wire form of a [`Campaign`], validated on load.
#[derive(Deserialize)]
struct CampaignRecord {
    id: CampaignId,
    name: String,
    phases: Vec<Phase>,
    regime: OddsRegime,
}

impl TryFrom<CampaignRecord> for Campaign {
    type Error = CoreError;

    fn try_from(record: CampaignRecord) -> Result<Self, Self::Error> {
        if record.phases.is_empty() {
            return Err(CoreError::InvariantViolation(format!(
                "campaign {} has no phases",
                record.name
            )));
        }
        Ok(Self {
            id: record.id,
            name: record.name,
            phases: record.phases,
            regime: record.regime,
            odds: record.regime.base_odds()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use hl_odds::{NEW_ODDS, OLD_ODDS};

    use super::*;

    fn campaign() -> Campaign {
        Campaign::new("Shiny Ralts", NEW_ODDS).unwrap()
    }

    #[test]
    fn new_campaign_has_one_phase() {
        let c = campaign();
        assert_eq!(c.phases().len(), 1);
        assert_eq!(c.last_phase().name(), "Phase_1");
        assert_eq!(c.get_count(), 0);
        assert_eq!(c.get_progress(), 1.0);
        assert!(!c.is_completed());
    }

    #[test]
    fn unimplemented_regime_is_rejected() {
        assert!(matches!(
            Campaign::new("x", OddsRegime::Unimplemented),
            Err(CoreError::Configuration(_))
        ));
    }

    #[test]
    fn attempts_land_on_last_phase() {
        let mut c = campaign();
        c.increase_by(10).unwrap();
        let idx = c.new_phase(NEW_ODDS).unwrap();
        assert_eq!(idx, 1);
        assert_eq!(c.phases()[1].name(), "Phase_2");

        let change = c.increase_by(5).unwrap();
        assert_eq!(change, Some(Change::phase(1, Field::Count)));
        c.add_time(Duration::from_secs(30));

        assert_eq!(c.phases()[0].count(), 10);
        assert_eq!(c.phases()[1].count(), 5);
        assert_eq!(c.phases()[1].elapsed(), Duration::from_secs(30));
        assert_eq!(c.get_count(), 15);
        assert_eq!(c.get_time(), Duration::from_secs(30));
    }

    #[test]
    fn full_odds_scenario() {
        let mut c = campaign();
        c.increase_by(4096).unwrap();
        assert!((c.get_progress() - 0.3679).abs() < 1e-4);

        assert_eq!(c.set_charm(true), Some(Change::campaign(Field::HasCharm)));
        assert_eq!(c.get_rolls(), 12288);
        assert!((c.get_progress() - 0.0498).abs() < 1e-4);
    }

    #[test]
    fn chained_scenario() {
        let mut c = Campaign::new("Chain", OddsRegime::ChainedOdds).unwrap();
        c.increase_by(15).unwrap();
        assert_eq!(c.get_rolls(), 31);
        let expected = (4095.0_f64 / 4096.0).powi(31);
        assert!((c.get_progress() - expected).abs() < 1e-12);
    }

    #[test]
    fn progress_is_additive_over_phases() {
        let mut c = campaign();
        c.increase_by(4096).unwrap();
        c.new_phase(NEW_ODDS).unwrap();
        c.increase_by(100).unwrap();
        let expected: f64 = c.phases().iter().map(Phase::progress).sum();
        assert!((c.get_progress() - expected).abs() < 1e-15);
        assert!(c.get_progress() > 1.0);
    }

    #[test]
    fn set_count_adjusts_last_phase() {
        let mut c = campaign();
        c.increase_by(10).unwrap();
        c.new_phase(NEW_ODDS).unwrap();
        c.set_count(25).unwrap();
        assert_eq!(c.phases()[1].count(), 15);
        assert_eq!(c.get_count(), 25);
        assert!(matches!(
            c.set_count(5),
            Err(CoreError::InvariantViolation(_))
        ));
        assert_eq!(c.get_count(), 25);
    }

    #[test]
    fn set_time_adjusts_last_phase() {
        let mut c = campaign();
        c.add_time(Duration::from_secs(60));
        c.new_phase(NEW_ODDS).unwrap();
        c.set_time(Duration::from_secs(100)).unwrap();
        assert_eq!(c.phases()[1].elapsed(), Duration::from_secs(40));
        assert!(matches!(
            c.set_time(Duration::from_secs(10)),
            Err(CoreError::InvariantViolation(_))
        ));
        assert_eq!(c.phases()[1].elapsed(), Duration::from_secs(40));
        assert_eq!(c.get_time(), Duration::from_secs(100));
    }

    #[test]
    fn totals_saturate_across_phases() {
        let mut c = campaign();
        c.set_count(u64::MAX).unwrap();
        c.new_phase(NEW_ODDS).unwrap();
        c.increase_by(1).unwrap();
        assert_eq!(c.phases()[1].count(), 1);
        assert_eq!(c.get_count(), u64::MAX);
        assert_eq!(c.get_rolls(), u64::MAX);

        // The last phase can still be corrected back down.
        c.increase_by(-1).unwrap();
        assert_eq!(c.get_count(), u64::MAX);
        assert_eq!(c.phases()[1].count(), 0);
    }

    #[test]
    fn lock_then_reopen_only_last_phase() {
        let mut c = campaign();
        c.new_phase(NEW_ODDS).unwrap();
        c.new_phase(NEW_ODDS).unwrap();
        assert_eq!(c.set_completed(true), Change::campaign(Field::IsCompleted));
        assert!(c.is_completed());

        let _ = c.set_completed(false);
        assert!(c.phases()[0].is_completed());
        assert!(c.phases()[1].is_completed());
        assert!(!c.phases()[2].is_completed());
        assert!(!c.is_completed());
    }

    #[test]
    fn locked_campaign_ignores_attempts() {
        let mut c = campaign();
        c.increase_by(7).unwrap();
        let _ = c.set_completed(true);
        for n in [-7_i64, 0, 1, 500] {
            assert_eq!(c.increase_by(n).unwrap(), None);
        }
        assert_eq!(c.set_count(1000).unwrap(), None);
        assert_eq!(c.add_time(Duration::from_secs(1)), None);
        assert_eq!(c.set_charm(true), None);
        assert_eq!(c.get_count(), 7);
    }

    #[test]
    fn new_phase_keeps_charm_and_leaves_history() {
        let mut c = campaign();
        c.increase_by(4).unwrap();
        let _ = c.set_charm(true);
        c.set_phase_completed(0, true).unwrap();
        c.new_phase(OLD_ODDS).unwrap();
        assert!(c.has_charm());
        assert_eq!(c.last_phase().progress_type(), OLD_ODDS);
        assert_eq!(c.phases()[0].count(), 4);
        assert!(c.phases()[0].is_completed());
    }

    #[test]
    fn phase_operations_check_index() {
        let mut c = campaign();
        assert!(matches!(
            c.rename_phase(3, "x"),
            Err(CoreError::PhaseNotFound { index: 3, .. })
        ));
        assert_eq!(
            c.rename_phase(0, "Opening").unwrap(),
            Change::phase(0, Field::Name)
        );
        assert_eq!(c.phases()[0].name(), "Opening");
    }

    #[test]
    fn nominal_odds_and_chance() {
        let mut c = Campaign::new("Old", OLD_ODDS).unwrap();
        assert_eq!(c.get_odds(), 8192.0);
        c.increase_by(8192).unwrap();
        let expected = (1.0 - 1.0 / 8192.0_f64).powf(8192.0);
        assert!((c.get_chance() - expected).abs() < 1e-12);

        let chain = Campaign::new("Chain", OddsRegime::ChainedOdds).unwrap();
        assert_eq!(chain.get_odds(), 4096.0);
    }

    #[test]
    fn chance_ignores_charm() {
        let mut c = campaign();
        c.increase_by(100).unwrap();
        let before = c.get_chance();
        let _ = c.set_charm(true);
        assert_eq!(c.get_chance(), before);
    }

    #[test]
    fn effective_odds_for_chains() {
        let mut flat = campaign();
        assert_eq!(flat.effective_odds(), None);
        flat.increase_by(3).unwrap();
        assert_eq!(flat.effective_odds(), Some(4096.0));

        let mut chain = Campaign::new("Chain", OddsRegime::ChainedOdds).unwrap();
        chain.increase_by(40).unwrap();
        let odds = chain.effective_odds().unwrap();
        assert!(odds < 4096.0);
        assert!(odds > 1.0);
    }

    #[test]
    fn completions_per_regime() {
        let mut flat = campaign();
        flat.new_phase(NEW_ODDS).unwrap();
        assert_eq!(flat.completions(), 2);

        let mut chain = Campaign::new("Chain", OddsRegime::ChainedOdds).unwrap();
        chain.new_phase(OddsRegime::ChainedOdds).unwrap();
        assert_eq!(chain.completions(), 1);
    }

    #[test]
    fn expected_completions_uses_phase_odds() {
        let mut c = Campaign::new("Mixed", OLD_ODDS).unwrap();
        c.increase_by(8192).unwrap();
        c.new_phase(NEW_ODDS).unwrap();
        c.increase_by(2048).unwrap();
        assert!((c.expected_completions() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn regime_change_recounts_last_phase() {
        let mut c = campaign();
        c.increase_by(15).unwrap();
        c.set_regime(OddsRegime::ChainedOdds).unwrap();
        assert_eq!(c.regime(), OddsRegime::ChainedOdds);
        assert_eq!(c.get_rolls(), 31);
        assert!(c.set_regime(OddsRegime::Unimplemented).is_err());
        assert_eq!(c.regime(), OddsRegime::ChainedOdds);
    }

    #[test]
    fn serialized_campaign_round_trips() {
        let mut c = campaign();
        c.increase_by(42).unwrap();
        c.new_phase(OddsRegime::ChainedOdds).unwrap();
        c.increase_by(12).unwrap();
        c.set_phase_completed(0, true).unwrap();

        let json = serde_json::to_string(&c).unwrap();
        assert!(json.contains(r#""type":"ChainedOdds""#));
        let back: Campaign = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn campaign_without_phases_fails_to_load() {
        let json = format!(
            r#"{{"id":"{}","name":"Empty","phases":[],"regime":{{"type":"ChainedOdds"}}}}"#,
            Uuid::new_v4()
        );
        assert!(serde_json::from_str::<Campaign>(&json).is_err());
    }

    #[test]
    fn display_id_is_short() {
        assert_eq!(CampaignId::new().to_string().len(), 8);
    }
}
