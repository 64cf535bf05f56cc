//! Reconciliation planner
//!
//! Turns a [`Comparison`] into an ordered [`Plan`]:
//!
//! 1. adds, in [`EntityKind::APPLY_ORDER`]
//! 2. modifies, same order, singletons last
//! 3. deletes, in reverse order, each preceded by cleanup steps that strip
//!    every remaining reference to the entity being deleted
//!
//! The planner tracks a projection of the live state as it goes, so the
//! cleanup steps see references added or modified earlier in the plan and
//! never touch an entity the plan has already deleted.

use crate::diff::{compare, Comparison};
use crate::errors::Result;
use crate::model::{Collection, EntityKind, EntityRecord, HostGroupConfig, Snapshot};
use crate::plan::model::{CleanupReason, Plan, PlanPhase, PlanState, PlannedOp};
use crate::plan::references::{references_to, referrer_kinds, strip_reference};
use chrono::Utc;
use gridconf_core_types::PlanId;
use std::collections::BTreeSet;

/// Compare `old` with `new` and plan the transition
///
/// # Errors
///
/// Returns identity errors from the comparison and `Serialization` if a
/// digest cannot be computed.
pub fn build_plan(old: &Snapshot, new: &Snapshot) -> Result<Plan> {
    let comparison = compare(old, new)?;
    plan_from_comparison(old, &comparison)
}

/// Plan an already computed comparison against the state it was taken from
///
/// `old` must be the snapshot on the "old" side of `comparison`; it supplies
/// the unchanged entities that may still hold references.
///
/// # Errors
///
/// Returns `Serialization` if a digest cannot be computed.
pub fn plan_from_comparison(old: &Snapshot, comparison: &Comparison) -> Result<Plan> {
    let mut builder = PlanBuilder {
        live: old.clone(),
        ops: Vec::new(),
    };

    for kind in EntityKind::APPLY_ORDER {
        let names = match kind {
            EntityKind::HostGroup => host_group_order(&comparison.added.host_groups),
            _ => comparison.added.names(kind),
        };
        builder.push_all(PlanPhase::Add, kind, &comparison.added, names)?;
    }

    let modify_order = EntityKind::APPLY_ORDER
        .into_iter()
        .chain([EntityKind::GlobalConfig, EntityKind::SchedulerConfig]);
    for kind in modify_order {
        let names = comparison.modified.names(kind);
        builder.push_all(PlanPhase::Modify, kind, &comparison.modified, names)?;
    }

    for kind in EntityKind::APPLY_ORDER.into_iter().rev() {
        let names = match kind {
            EntityKind::HostGroup => {
                let mut order = host_group_order(&comparison.removed.host_groups);
                order.reverse();
                order
            }
            _ => comparison.removed.names(kind),
        };
        for name in names {
            builder.cleanup_references(kind, &name)?;
            builder.push(PlanPhase::Delete, kind, name, None, None)?;
        }
    }

    let plan = Plan {
        id: PlanId::new(),
        built_at: Utc::now(),
        base_digest: old.managed_digest()?,
        target_digest: builder.live.managed_digest()?,
        ops: builder.ops,
        state: PlanState::Built,
    };

    tracing::debug!(
        plan_id = %plan.id,
        ops_len = plan.ops.len(),
        "plan built"
    );
    Ok(plan)
}

struct PlanBuilder {
    live: Snapshot,
    ops: Vec<PlannedOp>,
}

impl PlanBuilder {
    fn push_all(
        &mut self,
        phase: PlanPhase,
        kind: EntityKind,
        source: &Snapshot,
        names: Vec<String>,
    ) -> Result<()> {
        for name in names {
            if let Some(record) = source.record(kind, &name) {
                self.push(phase, kind, name, Some(record), None)?;
            }
        }
        Ok(())
    }

    /// Record an op and apply it to the live projection
    fn push(
        &mut self,
        phase: PlanPhase,
        kind: EntityKind,
        name: String,
        payload: Option<EntityRecord>,
        reason: Option<CleanupReason>,
    ) -> Result<()> {
        match &payload {
            Some(record) => self.live.upsert(kind, record.clone())?,
            None => {
                self.live.remove(kind, &name);
            }
        }
        self.ops.push(PlannedOp {
            seq: self.ops.len(),
            phase,
            kind,
            name,
            payload,
            reason,
        });
        Ok(())
    }

    /// Emit one cleanup op per live referrer of `target_kind/target_name`
    fn cleanup_references(&mut self, target_kind: EntityKind, target_name: &str) -> Result<()> {
        for referrer_kind in referrer_kinds(target_kind) {
            for referrer_name in self.live.names(referrer_kind) {
                if referrer_kind == target_kind && referrer_name == target_name {
                    continue;
                }
                let Some(mut record) = self.live.record(referrer_kind, &referrer_name) else {
                    continue;
                };
                let fields: Vec<String> = references_to(target_kind)
                    .filter(|r| r.referrer == referrer_kind)
                    .filter(|r| strip_reference(&mut record, r, target_name))
                    .map(|r| r.field.to_string())
                    .collect();
                if fields.is_empty() {
                    continue;
                }
                tracing::debug!(
                    entity_kind = %referrer_kind,
                    entity_name = %referrer_name,
                    target_kind = %target_kind,
                    target_name,
                    "reference cleanup planned"
                );
                let reason = CleanupReason {
                    target_kind,
                    target_name: target_name.to_string(),
                    fields,
                };
                self.push(
                    PlanPhase::Cleanup,
                    referrer_kind,
                    referrer_name,
                    Some(record),
                    Some(reason),
                )?;
            }
        }
        Ok(())
    }
}

/// Order host groups so that a group comes after every group it nests
///
/// Nesting outside `groups` is ignored. Cycles are broken by name order.
pub fn host_group_order(groups: &Collection<HostGroupConfig>) -> Vec<String> {
    fn visit(
        name: &str,
        groups: &Collection<HostGroupConfig>,
        visited: &mut BTreeSet<String>,
        out: &mut Vec<String>,
    ) {
        if !visited.insert(name.to_string()) {
            return;
        }
        if let Some(group) = groups.get(name) {
            for member in &group.hostlist {
                if member != name && groups.contains_key(member) {
                    visit(member, groups, visited, out);
                }
            }
        }
        out.push(name.to_string());
    }

    let mut visited = BTreeSet::new();
    let mut out = Vec::with_capacity(groups.len());
    for name in groups.keys() {
        visit(name, groups, &mut visited, &mut out);
    }
    out
}
