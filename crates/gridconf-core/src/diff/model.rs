//! Diff output types
//!
//! A [`Comparison`] is three derived snapshots plus two flags. Modified
//! entries carry the complete new record, never a field-level delta.

use crate::model::{Collection, Entity, EntityKind, Snapshot};
use serde::{Deserialize, Serialize};

/// Added/modified/removed members of one collection
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionDiff<T> {
    /// In new, not in old
    pub added: Collection<T>,
    /// In both, not structurally equal; holds the new value
    pub modified: Collection<T>,
    /// In old, not in new
    pub removed: Collection<T>,
}

impl<T: Entity> CollectionDiff<T> {
    pub fn new() -> Self {
        Self {
            added: Collection::new(),
            modified: Collection::new(),
            removed: Collection::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.removed.is_empty()
    }
}

impl<T: Entity> Default for CollectionDiff<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of comparing an old snapshot with a new one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Entities that exist only in the new snapshot
    pub added: Snapshot,
    /// Entities whose value changed (new value), including changed singletons
    pub modified: Snapshot,
    /// Entities that exist only in the old snapshot
    pub removed: Snapshot,
    /// No difference anywhere
    pub is_same: bool,
    /// The global configuration record differs
    pub global_config_changed: bool,
    /// The scheduler configuration record differs
    pub scheduler_config_changed: bool,
}

/// Per-kind change counts, for summaries and log fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeCounts {
    pub added: usize,
    pub modified: usize,
    pub removed: usize,
}

impl ChangeCounts {
    pub fn total(&self) -> usize {
        self.added + self.modified + self.removed
    }
}

impl Comparison {
    /// Counts over all kinds
    pub fn counts(&self) -> ChangeCounts {
        ChangeCounts {
            added: self.added.entity_count(),
            modified: self.modified.entity_count(),
            removed: self.removed.entity_count(),
        }
    }

    /// Counts for one kind
    pub fn counts_for(&self, kind: EntityKind) -> ChangeCounts {
        ChangeCounts {
            added: self.added.names(kind).len(),
            modified: self.modified.names(kind).len(),
            removed: self.removed.names(kind).len(),
        }
    }

    /// Kinds with at least one change, in apply order with singletons last
    pub fn changed_kinds(&self) -> Vec<EntityKind> {
        EntityKind::APPLY_ORDER
            .iter()
            .copied()
            .chain([EntityKind::GlobalConfig, EntityKind::SchedulerConfig])
            .filter(|k| self.counts_for(*k).total() > 0)
            .collect()
    }
}
