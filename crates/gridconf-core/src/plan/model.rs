//! Plan data types

use crate::model::{EntityKind, EntityRecord};
use chrono::{DateTime, Utc};
use gridconf_core_types::PlanId;
use serde::Serialize;
use std::fmt;

/// Stage of the plan an operation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanPhase {
    Add,
    Modify,
    /// Modify-in-place that strips a reference ahead of a delete
    Cleanup,
    Delete,
}

impl PlanPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanPhase::Add => "add",
            PlanPhase::Modify => "modify",
            PlanPhase::Cleanup => "cleanup",
            PlanPhase::Delete => "delete",
        }
    }
}

impl fmt::Display for PlanPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a cleanup step exists
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanupReason {
    pub target_kind: EntityKind,
    pub target_name: String,
    /// Attributes of the referrer the target was removed from
    pub fields: Vec<String>,
}

/// One step of a plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedOp {
    /// Position in the plan, starting at 0
    pub seq: usize,
    pub phase: PlanPhase,
    pub kind: EntityKind,
    pub name: String,
    /// Full record to send; `None` for deletes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<EntityRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<CleanupReason>,
}

/// Plan lifecycle: `Built → Executing → Completed | Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanState {
    Built,
    Executing,
    Completed,
    Failed,
}

/// An ordered, single-use sequence of mutations
///
/// Plans are produced by [`crate::plan::build_plan`] and consumed by
/// [`Plan::execute`]. Once executed they cannot be run again; re-fetch and
/// re-plan instead.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub(crate) id: PlanId,
    pub(crate) built_at: DateTime<Utc>,
    pub(crate) base_digest: String,
    pub(crate) target_digest: String,
    pub(crate) ops: Vec<PlannedOp>,
    pub(crate) state: PlanState,
}

impl Plan {
    pub fn id(&self) -> &PlanId {
        &self.id
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    /// Digest of the snapshot the plan was built against
    pub fn base_digest(&self) -> &str {
        &self.base_digest
    }

    /// Digest of the state the plan converges to
    pub fn target_digest(&self) -> &str {
        &self.target_digest
    }

    pub fn ops(&self) -> &[PlannedOp] {
        &self.ops
    }

    pub fn state(&self) -> PlanState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops_in_phase(&self, phase: PlanPhase) -> impl Iterator<Item = &PlannedOp> {
        self.ops.iter().filter(move |op| op.phase == phase)
    }

    /// Sequence number of the first op matching `phase`, `kind` and `name`
    pub fn position_of(&self, phase: PlanPhase, kind: EntityKind, name: &str) -> Option<usize> {
        self.ops
            .iter()
            .find(|op| op.phase == phase && op.kind == kind && op.name == name)
            .map(|op| op.seq)
    }
}
