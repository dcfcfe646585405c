use std::collections::HashMap;
use std::fmt;

use crate::campaign::CampaignId;
use crate::population::Selection;

/// A field whose change is reported to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// A campaign or phase was renamed.
    Name,
    /// An attempt count changed.
    Count,
    /// Elapsed time changed.
    Time,
    /// A completion flag changed.
    IsCompleted,
    /// The charm modifier was toggled.
    HasCharm,
    /// The odds regime changed.
    ProgressType,
    /// A phase was appended to a campaign.
    Phases,
    /// The active selection was replaced.
    ActiveSelection,
    /// A campaign was added to or removed from the population.
    Campaigns,
}

impl Field {
    /// The handler key, e.g. `"Count"` or `"IsCompleted"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Count => "Count",
            Self::Time => "Time",
            Self::IsCompleted => "IsCompleted",
            Self::HasCharm => "HasCharm",
            Self::ProgressType => "ProgressType",
            Self::Phases => "Phases",
            Self::ActiveSelection => "ActiveSelection",
            Self::Campaigns => "Campaigns",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A change produced by a campaign mutator, to be dispatched by its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a change must be dispatched to observers"]
pub struct Change {
    /// The phase that changed, or `None` for the campaign as a whole.
    pub phase: Option<usize>,
    /// What changed.
    pub field: Field,
}

impl Change {
    /// A change to the campaign as a whole.
    pub fn campaign(field: Field) -> Self {
        Self { phase: None, field }
    }

    /// A change to a single phase.
    pub fn phase(index: usize, field: Field) -> Self {
        Self {
            phase: Some(index),
            field,
        }
    }
}

/// The entity a notice is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// A whole campaign.
    Campaign(CampaignId),
    /// One phase of a campaign, by index.
    Phase(CampaignId, usize),
    /// The population itself.
    Population,
}

/// A notification delivered to an [`Observer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A field of a campaign, phase, or the population changed.
    Changed {
        /// What changed.
        target: Target,
        /// Which field changed.
        field: Field,
    },
    /// The active selection was replaced with this set.
    SelectionChanged(Vec<Selection>),
}

impl Notice {
    /// The field this notice is keyed under.
    pub fn field(&self) -> Field {
        match self {
            Self::Changed { field, .. } => *field,
            Self::SelectionChanged(_) => Field::ActiveSelection,
        }
    }

    /// The campaign involved, if any.
    pub fn campaign(&self) -> Option<CampaignId> {
        match self {
            Self::Changed {
                target: Target::Campaign(id) | Target::Phase(id, _),
                ..
            } => Some(*id),
            _ => None,
        }
    }
}

/// Receives notices synchronously, once per state-changing call.
pub trait Observer {
    /// Handle one notice.
    fn notify(&mut self, notice: &Notice);
}

/// An observer that ignores every notice.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl Observer for NullObserver {
    fn notify(&mut self, _notice: &Notice) {}
}

type Handler = Box<dyn FnMut(&Notice) + Send>;

/// Callback registry keyed by [`Field`].
#[derive(Default)]
pub struct Handlers {
    handlers: HashMap<Field, Vec<Handler>>,
}

impl Handlers {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for notices about `field`.
    pub fn connect(&mut self, field: Field, handler: impl FnMut(&Notice) + Send + 'static) {
        self.handlers
            .entry(field)
            .or_default()
            .push(Box::new(handler));
    }

    /// Number of callbacks registered for `field`.
    pub fn count(&self, field: Field) -> usize {
        self.handlers.get(&field).map_or(0, Vec::len)
    }
}

impl Observer for Handlers {
    fn notify(&mut self, notice: &Notice) {
        if let Some(handlers) = self.handlers.get_mut(&notice.field()) {
            for handler in handlers {
                handler(notice);
            }
        }
    }
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<_> = self
            .handlers
            .iter()
            .map(|(field, hs)| (field.as_str(), hs.len()))
            .collect();
        fields.sort_unstable();
        f.debug_struct("Handlers").field("handlers", &fields).finish()
    }
}

/// Records every notice in order.
#[derive(Debug, Clone, Default)]
pub struct ChangeLog {
    notices: Vec<Notice>,
}

impl ChangeLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded notices, oldest first.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Number of recorded notices keyed under `field`.
    pub fn count(&self, field: Field) -> usize {
        self.notices.iter().filter(|n| n.field() == field).count()
    }

    /// The most recent notice.
    pub fn last(&self) -> Option<&Notice> {
        self.notices.last()
    }

    /// Number of recorded notices.
    pub fn len(&self) -> usize {
        self.notices.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    /// Forget all recorded notices.
    pub fn clear(&mut self) {
        self.notices.clear();
    }
}

impl Observer for ChangeLog {
    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }
}
