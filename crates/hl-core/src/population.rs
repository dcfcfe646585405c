//! The population of campaigns and its pooled luck statistic.
//!
//! Luck pools every campaign into one binomial experiment: the total rolls
//! are the trials, the rolls-weighted mean of each campaign's nominal odds
//! gives the success probability, and the completions are the observed
//! successes. The result is `P(X <= completions - 1)`, so a population that
//! finished more often than expected scores close to 1 and an unlucky one
//! close to 0.
//!
//! Every mutation goes through the population so the change it produces is
//! dispatched to the injected [`Observer`] exactly once.

use std::collections::HashSet;
use std::time::Duration;

use hl_odds::{OddsRegime, binomial_cdf};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::campaign::{Campaign, CampaignId, PhaseRef};
use crate::clock::TimeFeed;
use crate::error::{CoreError, CoreResult};
use crate::notify::{Change, Field, Notice, NullObserver, Observer, Target};

/// A weak reference into the population: a campaign, or one of its phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selection {
    /// A whole campaign.
    Campaign(CampaignId),
    /// One phase of a campaign.
    Phase(CampaignId, PhaseRef),
}

impl Selection {
    /// The campaign this selection points into.
    pub fn campaign(self) -> CampaignId {
        match self {
            Self::Campaign(id) | Self::Phase(id, _) => id,
        }
    }
}

/// Summary of a luck computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LuckReport {
    /// Number of campaigns pooled.
    pub campaigns: usize,
    /// Raw attempts across all campaigns.
    pub total_count: u64,
    /// Equivalent rolls across all campaigns.
    pub total_rolls: u64,
    /// Rolls-weighted mean of nominal odds.
    pub average_odds: f64,
    /// Observed completions.
    pub completed: u64,
    /// Completions expected from the rolls so far.
    pub expected: f64,
    /// `P(X <= completed - 1)` under the pooled binomial.
    pub luck: f64,
}

/// All campaigns plus the active selection.
#[derive(Debug)]
pub struct Population<O = NullObserver> {
    campaigns: Vec<Campaign>,
    active: Vec<Selection>,
    observer: O,
}

impl Population {
    /// An empty population without observers.
    pub fn new() -> Self {
        Self::with_observer(NullObserver)
    }
}

impl Default for Population {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: Observer> Population<O> {
    /// An empty population reporting to `observer`.
    pub fn with_observer(observer: O) -> Self {
        Self {
            campaigns: Vec::new(),
            active: Vec::new(),
            observer,
        }
    }

    /// A population over existing campaigns. Nothing is notified.
    ///
    /// Campaign IDs must be unique.
    pub fn from_campaigns(campaigns: Vec<Campaign>, observer: O) -> CoreResult<Self> {
        let mut seen = HashSet::with_capacity(campaigns.len());
        if let Some(dup) = campaigns.iter().find(|c| !seen.insert(c.id())) {
            warn!(campaign = %dup.id(), name = dup.name(), "duplicate campaign id");
            return Err(CoreError::InvariantViolation(format!(
                "campaign id {} appears more than once",
                dup.id()
            )));
        }
        Ok(Self {
            campaigns,
            active: Vec::new(),
            observer,
        })
    }

    /// The injected observer.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Mutable access to the injected observer, e.g. to register handlers.
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// All campaigns in insertion order.
    pub fn campaigns(&self) -> &[Campaign] {
        &self.campaigns
    }

    /// Number of campaigns.
    pub fn len(&self) -> usize {
        self.campaigns.len()
    }

    /// Whether there are no campaigns.
    pub fn is_empty(&self) -> bool {
        self.campaigns.is_empty()
    }

    /// A campaign by ID.
    pub fn get(&self, id: CampaignId) -> Option<&Campaign> {
        self.campaigns.iter().find(|c| c.id() == id)
    }

    /// Position of a campaign by ID.
    pub fn get_index(&self, id: CampaignId) -> Option<usize> {
        self.campaigns.iter().position(|c| c.id() == id)
    }

    /// First campaign with this name (case-insensitive).
    pub fn find_by_name(&self, name: &str) -> Option<&Campaign> {
        let name = name.to_lowercase();
        self.campaigns
            .iter()
            .find(|c| c.name().to_lowercase() == name)
    }

    // -----------------------------------------------------------------------
    // Membership
    // -----------------------------------------------------------------------

    /// Add a campaign. Returns its ID.
    pub fn add_campaign(&mut self, campaign: Campaign) -> CampaignId {
        let id = campaign.id();
        debug!(campaign = %id, name = campaign.name(), "added campaign");
        self.campaigns.push(campaign);
        self.emit(Notice::Changed {
            target: Target::Population,
            field: Field::Campaigns,
        });
        id
    }

    /// Create and add a campaign with a single empty phase.
    pub fn create_campaign(
        &mut self,
        name: impl Into<String>,
        regime: OddsRegime,
    ) -> CoreResult<CampaignId> {
        let campaign = Campaign::new(name, regime)?;
        Ok(self.add_campaign(campaign))
    }

    /// Remove a campaign and every selection pointing into it.
    pub fn remove_campaign(&mut self, id: CampaignId) -> CoreResult<Campaign> {
        let index = self.get_index(id).ok_or(CoreError::CampaignNotFound(id))?;
        let campaign = self.campaigns.remove(index);
        debug!(campaign = %id, name = campaign.name(), "removed campaign");

        let before = self.active.len();
        self.active.retain(|s| s.campaign() != id);
        if self.active.len() != before {
            self.emit(Notice::SelectionChanged(self.active.clone()));
        }
        self.emit(Notice::Changed {
            target: Target::Population,
            field: Field::Campaigns,
        });
        Ok(campaign)
    }

    // -----------------------------------------------------------------------
    // Active selection
    // -----------------------------------------------------------------------

    /// Replace the active selection. Every entry must name an existing
    /// campaign or phase; an empty selection is allowed.
    pub fn set_active(&mut self, selection: Vec<Selection>) -> CoreResult<()> {
        for s in &selection {
            self.check_selection(*s)?;
        }
        self.active = selection;
        self.emit(Notice::SelectionChanged(self.active.clone()));
        Ok(())
    }

    /// The active selection.
    pub fn active(&self) -> &[Selection] {
        &self.active
    }

    /// The first active selection, if any.
    pub fn first_active(&self) -> Option<Selection> {
        self.active.first().copied()
    }

    /// Reinstate a saved selection without notifying, dropping entries
    /// that no longer resolve.
    pub(crate) fn restore_active(&mut self, selection: Vec<Selection>) {
        let before = selection.len();
        self.active = selection
            .into_iter()
            .filter(|s| self.check_selection(*s).is_ok())
            .collect();
        if self.active.len() != before {
            warn!(
                dropped = before - self.active.len(),
                "discarded stale selections"
            );
        }
    }

    fn check_selection(&self, selection: Selection) -> CoreResult<()> {
        let id = selection.campaign();
        let campaign = self.get(id).ok_or(CoreError::CampaignNotFound(id))?;
        match selection {
            Selection::Phase(_, index) if campaign.phase(index).is_none() => {
                Err(CoreError::PhaseNotFound {
                    campaign: id,
                    index,
                })
            }
            _ => Ok(()),
        }
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Add attempts to a campaign's last phase.
    pub fn increase_by(&mut self, id: CampaignId, delta: i64) -> CoreResult<()> {
        let change = self.campaign_mut(id)?.increase_by(delta)?;
        self.dispatch(id, change);
        Ok(())
    }

    /// Set a campaign's total attempt count.
    pub fn set_count(&mut self, id: CampaignId, total: u64) -> CoreResult<()> {
        let change = self.campaign_mut(id)?.set_count(total)?;
        self.dispatch(id, change);
        Ok(())
    }

    /// Add elapsed time to a campaign's last phase.
    pub fn add_time(&mut self, id: CampaignId, time: Duration) -> CoreResult<()> {
        let change = self.campaign_mut(id)?.add_time(time);
        self.dispatch(id, change);
        Ok(())
    }

    /// Set a campaign's total elapsed time.
    pub fn set_time(&mut self, id: CampaignId, total: Duration) -> CoreResult<()> {
        let change = self.campaign_mut(id)?.set_time(total)?;
        self.dispatch(id, change);
        Ok(())
    }

    /// Rename a campaign.
    pub fn rename(&mut self, id: CampaignId, name: impl Into<String>) -> CoreResult<()> {
        let change = self.campaign_mut(id)?.rename(name);
        self.dispatch(id, Some(change));
        Ok(())
    }

    /// Rename one phase of a campaign.
    pub fn rename_phase(
        &mut self,
        id: CampaignId,
        index: PhaseRef,
        name: impl Into<String>,
    ) -> CoreResult<()> {
        let change = self.campaign_mut(id)?.rename_phase(index, name)?;
        self.dispatch(id, Some(change));
        Ok(())
    }

    /// Lock every phase of a campaign, or reopen its last phase.
    pub fn set_completed(&mut self, id: CampaignId, flag: bool) -> CoreResult<()> {
        let change = self.campaign_mut(id)?.set_completed(flag);
        self.dispatch(id, Some(change));
        Ok(())
    }

    /// Lock or unlock a single phase.
    pub fn set_phase_completed(
        &mut self,
        id: CampaignId,
        index: PhaseRef,
        flag: bool,
    ) -> CoreResult<()> {
        let change = self.campaign_mut(id)?.set_phase_completed(index, flag)?;
        self.dispatch(id, Some(change));
        Ok(())
    }

    /// Toggle the charm on a campaign's unlocked phases.
    pub fn set_charm(&mut self, id: CampaignId, has_charm: bool) -> CoreResult<()> {
        let change = self.campaign_mut(id)?.set_charm(has_charm);
        self.dispatch(id, change);
        Ok(())
    }

    /// Change a campaign's nominal regime.
    pub fn set_regime(&mut self, id: CampaignId, regime: OddsRegime) -> CoreResult<()> {
        let change = self.campaign_mut(id)?.set_regime(regime)?;
        self.dispatch(id, Some(change));
        Ok(())
    }

    /// Append a phase to a campaign.
    pub fn new_phase(&mut self, id: CampaignId, regime: OddsRegime) -> CoreResult<PhaseRef> {
        let index = self.campaign_mut(id)?.new_phase(regime)?;
        self.dispatch(id, Some(Change::campaign(Field::Phases)));
        Ok(index)
    }

    /// Apply every time delta waiting in `feed` to the first active
    /// campaign, as a single change. With nothing selected the deltas are
    /// dropped. Returns the time applied.
    pub fn drain_time(&mut self, feed: &TimeFeed) -> CoreResult<Duration> {
        let pending = feed.drain();
        if pending.is_zero() {
            return Ok(Duration::ZERO);
        }
        let Some(selection) = self.first_active() else {
            debug!(?pending, "no active campaign, dropping elapsed time");
            return Ok(Duration::ZERO);
        };
        let id = selection.campaign();
        let change = self.campaign_mut(id)?.add_time(pending);
        let applied = if change.is_some() {
            pending
        } else {
            debug!(?pending, campaign = %id, "active phase is locked, dropping elapsed time");
            Duration::ZERO
        };
        self.dispatch(id, change);
        Ok(applied)
    }

    fn campaign_mut(&mut self, id: CampaignId) -> CoreResult<&mut Campaign> {
        self.campaigns
            .iter_mut()
            .find(|c| c.id() == id)
            .ok_or(CoreError::CampaignNotFound(id))
    }

    fn dispatch(&mut self, id: CampaignId, change: Option<Change>) {
        let Some(change) = change else {
            return;
        };
        let target = match change.phase {
            Some(index) => Target::Phase(id, index),
            None => Target::Campaign(id),
        };
        self.emit(Notice::Changed {
            target,
            field: change.field,
        });
    }

    fn emit(&mut self, notice: Notice) {
        debug!(field = %notice.field(), ?notice, "change");
        self.observer.notify(&notice);
    }

    // -----------------------------------------------------------------------
    // Statistics
    // -----------------------------------------------------------------------

    /// Raw attempts across all campaigns.
    pub fn total_count(&self) -> u64 {
        self.campaigns
            .iter()
            .fold(0, |acc: u64, c| acc.saturating_add(c.get_count()))
    }

    /// Elapsed time across all campaigns.
    pub fn total_time(&self) -> Duration {
        self.campaigns
            .iter()
            .fold(Duration::ZERO, |acc, c| acc.saturating_add(c.get_time()))
    }

    /// Equivalent rolls across all campaigns.
    pub fn total_rolls(&self) -> u64 {
        self.campaigns
            .iter()
            .fold(0, |acc: u64, c| acc.saturating_add(c.get_rolls()))
    }

    /// Completions observed: one per phase for flat regimes, one per
    /// campaign for chains.
    pub fn completed_count(&self) -> u64 {
        self.campaigns.iter().map(Campaign::completions).sum()
    }

    /// Completions expected from the rolls so far.
    pub fn expected_completions(&self) -> f64 {
        self.campaigns
            .iter()
            .map(Campaign::expected_completions)
            .sum()
    }

    /// Rolls-weighted mean of each campaign's nominal odds.
    pub fn average_odds(&self) -> CoreResult<f64> {
        let total_rolls = self.require_rolls()?;
        let weighted: f64 = self
            .campaigns
            .iter()
            .map(|c| c.get_odds() * c.get_rolls() as f64)
            .sum();
        Ok(weighted / total_rolls as f64)
    }

    /// Pooled luck in `[0, 1]`. Higher means more completions than the
    /// pooled odds predict.
    pub fn luck(&self) -> CoreResult<f64> {
        self.luck_report().map(|r| r.luck)
    }

    /// Luck together with the quantities it was computed from.
    pub fn luck_report(&self) -> CoreResult<LuckReport> {
        let total_rolls = self.require_rolls()?;
        let average_odds = self.average_odds()?;
        let completed = self.completed_count();
        let k = i64::try_from(completed).unwrap_or(i64::MAX) - 1;
        let luck = binomial_cdf(total_rolls, 1.0 / average_odds, k)?;

        info!(
            campaigns = self.campaigns.len(),
            total_rolls, average_odds, completed, luck, "computed population luck"
        );

        Ok(LuckReport {
            campaigns: self.campaigns.len(),
            total_count: self.total_count(),
            total_rolls,
            average_odds,
            completed,
            expected: self.expected_completions(),
            luck,
        })
    }

    fn require_rolls(&self) -> CoreResult<u64> {
        if self.campaigns.is_empty() {
            return Err(CoreError::InsufficientData(
                "luck needs at least one campaign".into(),
            ));
        }
        match self.total_rolls() {
            0 => Err(CoreError::InsufficientData(
                "no rolls recorded in any campaign".into(),
            )),
            rolls => Ok(rolls),
        }
    }
}

#[cfg(test)]
mod tests {
    use hl_odds::{NEW_ODDS, OLD_ODDS};
    use proptest::prelude::*;

    use super::*;
    use crate::clock::TimeFeed;
    use crate::notify::ChangeLog;

    fn logged() -> Population<ChangeLog> {
        Population::with_observer(ChangeLog::new())
    }

    /// Independent reference: recursive pmf summation.
    fn reference_cdf(n: u64, p: f64, k: u64) -> f64 {
        let mut pmf = ((n as f64) * (-p).ln_1p()).exp();
        let mut total = pmf;
        for i in 0..k {
            pmf *= (n - i) as f64 / (i + 1) as f64 * (p / (1.0 - p));
            total += pmf;
        }
        total
    }

    #[test]
    fn empty_population_has_no_luck() {
        let pop = Population::new();
        assert!(matches!(pop.luck(), Err(CoreError::InsufficientData(_))));
    }

    #[test]
    fn zero_rolls_has_no_luck() {
        let mut pop = Population::new();
        pop.create_campaign("Fresh", NEW_ODDS).unwrap();
        assert!(matches!(pop.luck(), Err(CoreError::InsufficientData(_))));
        assert!(matches!(
            pop.average_odds(),
            Err(CoreError::InsufficientData(_))
        ));
    }

    #[test]
    fn two_campaign_scenario() {
        let mut pop = Population::new();
        let a = pop.create_campaign("A", NEW_ODDS).unwrap();
        let b = pop.create_campaign("B", OLD_ODDS).unwrap();
        pop.increase_by(a, 4096).unwrap();
        pop.increase_by(b, 8192).unwrap();

        let expected_odds = (4096.0 * 4096.0 + 8192.0 * 8192.0) / (4096.0 + 8192.0);
        let report = pop.luck_report().unwrap();
        assert_eq!(report.total_rolls, 12288);
        assert_eq!(report.completed, 2);
        assert!((report.average_odds - expected_odds).abs() < 1e-9);

        let reference = reference_cdf(12288, 1.0 / expected_odds, 1);
        assert!((report.luck - reference).abs() < 1e-6);
    }

    #[test]
    fn more_completions_means_luckier() {
        let mut pop = Population::new();
        let id = pop.create_campaign("A", NEW_ODDS).unwrap();
        pop.increase_by(id, 4096).unwrap();
        let one = pop.luck().unwrap();

        pop.new_phase(id, NEW_ODDS).unwrap();
        pop.new_phase(id, NEW_ODDS).unwrap();
        let three = pop.luck().unwrap();
        assert!(three > one);
    }

    #[test]
    fn chained_campaigns_complete_once() {
        let mut pop = Population::new();
        let id = pop.create_campaign("Chain", OddsRegime::ChainedOdds).unwrap();
        pop.increase_by(id, 40).unwrap();
        pop.new_phase(id, OddsRegime::ChainedOdds).unwrap();
        pop.increase_by(id, 40).unwrap();
        assert_eq!(pop.completed_count(), 1);

        let flat = pop.create_campaign("Flat", NEW_ODDS).unwrap();
        pop.new_phase(flat, NEW_ODDS).unwrap();
        assert_eq!(pop.completed_count(), 3);
    }

    #[test]
    fn totals_sum_campaigns() {
        let mut pop = Population::new();
        let a = pop.create_campaign("A", NEW_ODDS).unwrap();
        let b = pop.create_campaign("B", OddsRegime::ChainedOdds).unwrap();
        pop.increase_by(a, 10).unwrap();
        pop.increase_by(b, 15).unwrap();
        pop.add_time(a, Duration::from_secs(5)).unwrap();
        pop.add_time(b, Duration::from_secs(7)).unwrap();
        assert_eq!(pop.total_count(), 25);
        assert_eq!(pop.total_rolls(), 10 + 31);
        assert_eq!(pop.total_time(), Duration::from_secs(12));
    }

    #[test]
    fn totals_saturate_across_campaigns() {
        let mut pop = Population::new();
        let a = pop.create_campaign("A", NEW_ODDS).unwrap();
        let b = pop.create_campaign("B", NEW_ODDS).unwrap();
        pop.set_count(a, u64::MAX / 2 + 1).unwrap();
        pop.set_count(b, u64::MAX / 2 + 1).unwrap();
        assert_eq!(pop.total_count(), u64::MAX);
        assert_eq!(pop.total_rolls(), u64::MAX);

        let report = pop.luck_report().unwrap();
        assert_eq!(report.total_rolls, u64::MAX);
        assert!((0.0..=1.0).contains(&report.luck), "luck = {}", report.luck);
    }

    #[test]
    fn duplicate_campaign_ids_are_rejected() {
        let campaign = Campaign::new("A", NEW_ODDS).unwrap();
        let other = Campaign::new("B", NEW_ODDS).unwrap();
        assert!(Population::from_campaigns(vec![campaign.clone(), other], NullObserver).is_ok());
        assert!(matches!(
            Population::from_campaigns(vec![campaign.clone(), campaign], NullObserver),
            Err(CoreError::InvariantViolation(_))
        ));
    }

    #[test]
    fn every_mutation_notifies_once() {
        let mut pop = logged();
        let id = pop.create_campaign("A", NEW_ODDS).unwrap();
        assert_eq!(pop.observer().count(Field::Campaigns), 1);

        pop.increase_by(id, 0).unwrap();
        pop.increase_by(id, 3).unwrap();
        assert_eq!(pop.observer().count(Field::Count), 2);
        assert_eq!(
            pop.observer().last(),
            Some(&Notice::Changed {
                target: Target::Phase(id, 0),
                field: Field::Count,
            })
        );

        pop.add_time(id, Duration::from_secs(1)).unwrap();
        pop.rename(id, "Renamed").unwrap();
        pop.set_completed(id, true).unwrap();
        assert_eq!(pop.observer().count(Field::Time), 1);
        assert_eq!(pop.observer().count(Field::Name), 1);
        assert_eq!(pop.observer().count(Field::IsCompleted), 1);
    }

    #[test]
    fn locked_and_rejected_mutations_do_not_notify() {
        let mut pop = logged();
        let id = pop.create_campaign("A", NEW_ODDS).unwrap();
        pop.increase_by(id, 2).unwrap();
        assert!(pop.increase_by(id, -3).is_err());
        assert_eq!(pop.observer().count(Field::Count), 1);

        pop.set_completed(id, true).unwrap();
        pop.observer_mut().clear();
        pop.increase_by(id, 10).unwrap();
        pop.add_time(id, Duration::from_secs(1)).unwrap();
        pop.set_charm(id, true).unwrap();
        assert!(pop.observer().is_empty());
        assert_eq!(pop.get(id).unwrap().get_count(), 2);
    }

    #[test]
    fn handlers_receive_notices() {
        use std::sync::{Arc, Mutex};

        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut handlers = crate::notify::Handlers::new();
        let sink = Arc::clone(&seen);
        handlers.connect(Field::Count, move |notice| {
            sink.lock().unwrap().push(notice.clone());
        });

        let mut pop = Population::with_observer(handlers);
        let id = pop.create_campaign("A", NEW_ODDS).unwrap();
        pop.increase_by(id, 1).unwrap();
        pop.add_time(id, Duration::from_secs(1)).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].campaign(), Some(id));
    }

    #[test]
    fn selection_is_replaced_and_notified() {
        let mut pop = logged();
        let a = pop.create_campaign("A", NEW_ODDS).unwrap();
        let b = pop.create_campaign("B", NEW_ODDS).unwrap();

        pop.set_active(vec![Selection::Campaign(a), Selection::Phase(b, 0)])
            .unwrap();
        assert_eq!(pop.active().len(), 2);
        assert_eq!(pop.first_active(), Some(Selection::Campaign(a)));

        pop.set_active(Vec::new()).unwrap();
        assert!(pop.active().is_empty());
        assert_eq!(
            pop.observer().last(),
            Some(&Notice::SelectionChanged(Vec::new()))
        );
        assert_eq!(pop.observer().count(Field::ActiveSelection), 2);
    }

    #[test]
    fn selection_must_name_existing_entities() {
        let mut pop = Population::new();
        let a = pop.create_campaign("A", NEW_ODDS).unwrap();
        assert!(matches!(
            pop.set_active(vec![Selection::Phase(a, 4)]),
            Err(CoreError::PhaseNotFound { index: 4, .. })
        ));
        assert!(matches!(
            pop.set_active(vec![Selection::Campaign(CampaignId::new())]),
            Err(CoreError::CampaignNotFound(_))
        ));
        assert!(pop.active().is_empty());
    }

    #[test]
    fn removal_cascades_into_selection() {
        let mut pop = logged();
        let a = pop.create_campaign("A", NEW_ODDS).unwrap();
        let b = pop.create_campaign("B", NEW_ODDS).unwrap();
        pop.new_phase(a, NEW_ODDS).unwrap();
        pop.set_active(vec![
            Selection::Campaign(a),
            Selection::Phase(a, 1),
            Selection::Campaign(b),
        ])
        .unwrap();

        let removed = pop.remove_campaign(a).unwrap();
        assert_eq!(removed.id(), a);
        assert_eq!(pop.len(), 1);
        assert_eq!(pop.get_index(a), None);
        assert_eq!(pop.get_index(b), Some(0));
        assert_eq!(pop.active(), &[Selection::Campaign(b)]);
        assert_eq!(
            pop.observer().notices().iter().rev().nth(1),
            Some(&Notice::SelectionChanged(vec![Selection::Campaign(b)]))
        );
        assert!(matches!(
            pop.remove_campaign(a),
            Err(CoreError::CampaignNotFound(_))
        ));
    }

    #[test]
    fn unknown_campaign_is_an_error() {
        let mut pop = Population::new();
        assert!(matches!(
            pop.increase_by(CampaignId::new(), 1),
            Err(CoreError::CampaignNotFound(_))
        ));
    }

    #[test]
    fn find_by_name_ignores_case() {
        let mut pop = Population::new();
        let id = pop.create_campaign("Shiny Ralts", NEW_ODDS).unwrap();
        assert_eq!(pop.find_by_name("shiny ralts").map(Campaign::id), Some(id));
        assert!(pop.find_by_name("Ralts").is_none());
    }

    #[test]
    fn drained_time_reaches_first_active_campaign() {
        let (sender, feed) = TimeFeed::channel();
        let mut pop = logged();
        let a = pop.create_campaign("A", NEW_ODDS).unwrap();

        sender.post(Duration::from_secs(2));
        assert_eq!(pop.drain_time(&feed).unwrap(), Duration::ZERO);
        assert_eq!(pop.get(a).unwrap().get_time(), Duration::ZERO);

        pop.set_active(vec![Selection::Phase(a, 0)]).unwrap();
        sender.post(Duration::from_secs(3));
        sender.post(Duration::from_secs(4));
        assert_eq!(pop.drain_time(&feed).unwrap(), Duration::from_secs(7));
        assert_eq!(pop.get(a).unwrap().get_time(), Duration::from_secs(7));
        assert_eq!(pop.observer().count(Field::Time), 1);
    }

    #[test]
    fn drained_time_into_locked_phase_is_not_applied() {
        let (sender, feed) = TimeFeed::channel();
        let mut pop = logged();
        let a = pop.create_campaign("A", NEW_ODDS).unwrap();
        pop.new_phase(a, NEW_ODDS).unwrap();
        pop.set_phase_completed(a, 1, true).unwrap();
        assert!(!pop.get(a).unwrap().is_completed());
        pop.set_active(vec![Selection::Campaign(a)]).unwrap();
        pop.observer_mut().clear();

        sender.post(Duration::from_secs(5));
        assert_eq!(pop.drain_time(&feed).unwrap(), Duration::ZERO);
        assert_eq!(pop.get(a).unwrap().get_time(), Duration::ZERO);
        assert!(pop.observer().is_empty());
    }

    proptest! {
        #[test]
        fn luck_is_a_probability(
            hunts in prop::collection::vec((0_u8..3, 1_u64..20_000, 1_usize..4), 1..8)
        ) {
            let mut pop = Population::new();
            for (kind, count, phases) in hunts {
                let regime = match kind {
                    0 => OLD_ODDS,
                    1 => NEW_ODDS,
                    _ => OddsRegime::ChainedOdds,
                };
                let id = pop.create_campaign("hunt", regime).unwrap();
                for _ in 1..phases {
                    pop.new_phase(id, regime).unwrap();
                }
                pop.increase_by(id, count as i64).unwrap();
            }
            let luck = pop.luck().unwrap();
            prop_assert!((0.0..=1.0).contains(&luck));
        }
    }
}
