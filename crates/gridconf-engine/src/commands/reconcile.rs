//! Reconcile command: drive a live cluster towards a desired snapshot.
//!
//! The workflow is fetch → compare → plan → execute → verify. Dry runs stop
//! after planning. Verification re-fetches and re-compares; a cluster that
//! did not converge is reported in the outcome rather than as an error,
//! since partial convergence is an expected result of best-effort deletes.
//!
//! ## Logging Ownership
//!
//! The engine layer owns lifecycle logging for `reconcile`:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Core layers use only `tracing::debug!()` and `tracing::warn!()`.

#![allow(clippy::result_large_err)]

use crate::options::ReconcileOptions;
use crate::source::SnapshotSource;
use gridconf_core::apply::{ApplyCollaborator, ExecutionReport};
use gridconf_core::diff::{compare, Comparison};
use gridconf_core::errors::{GcError, GcErrorKind};
use gridconf_core::model::Snapshot;
use gridconf_core::plan::{plan_from_comparison, Plan};
use gridconf_core::{log_op_end, log_op_error, log_op_start};
use gridconf_core_types::RunId;

/// Result of one reconcile run
#[derive(Debug)]
pub enum ReconcileOutcome {
    /// The live cluster already matches the desired snapshot
    NoChanges,
    /// Dry run: the plan that would have been executed
    Planned(Plan),
    Applied {
        plan: Plan,
        report: ExecutionReport,
        /// `None` when verification was disabled
        converged: Option<bool>,
        /// What still differs after execution, when verified and not converged
        residual: Option<Comparison>,
    },
}

impl ReconcileOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReconcileOutcome::NoChanges => "no_changes",
            ReconcileOutcome::Planned(_) => "planned",
            ReconcileOutcome::Applied { .. } => "applied",
        }
    }

    pub fn plan(&self) -> Option<&Plan> {
        match self {
            ReconcileOutcome::NoChanges => None,
            ReconcileOutcome::Planned(plan) | ReconcileOutcome::Applied { plan, .. } => Some(plan),
        }
    }
}

/// Reconcile `cluster` towards `desired`
///
/// `cluster` is both the fetch and the apply collaborator.
///
/// ## Errors
///
/// - `SnapshotUnavailable`: the live snapshot could not be fetched
/// - `AmbiguousIdentity`: either snapshot has inconsistent identities
/// - `ApplyFailed`: an add or modify was rejected; the cluster is left
///   partially reconciled
/// - `DeleteFailed`: a delete was rejected and
///   `continue_on_delete_error` is off
pub fn reconcile<C>(
    cluster: &mut C,
    desired: &Snapshot,
    options: &ReconcileOptions,
) -> Result<ReconcileOutcome, GcError>
where
    C: SnapshotSource + ApplyCollaborator,
{
    let run_id = RunId::new();
    log_op_start!("reconcile", run_id = %run_id, dry_run = options.dry_run);
    let start = std::time::Instant::now();

    let outcome = reconcile_impl(cluster, desired, options).map_err(|e| {
        log_op_error!(
            "reconcile",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            run_id = %run_id
        );
        e
    })?;

    log_op_end!(
        "reconcile",
        duration_ms = start.elapsed().as_millis() as u64,
        run_id = %run_id,
        outcome = outcome.as_str()
    );

    Ok(outcome)
}

fn fetch<S: SnapshotSource + ?Sized>(source: &mut S, stage: &str) -> Result<Snapshot, GcError> {
    source.fetch_snapshot().map_err(|e| {
        GcError::new(GcErrorKind::SnapshotUnavailable)
            .with_op("reconcile")
            .with_message(format!("fetching {} snapshot", stage))
            .with_source(e)
    })
}

fn reconcile_impl<C>(
    cluster: &mut C,
    desired: &Snapshot,
    options: &ReconcileOptions,
) -> Result<ReconcileOutcome, GcError>
where
    C: SnapshotSource + ApplyCollaborator,
{
    let current = fetch(&mut *cluster, "current")?;
    let comparison = compare(&current, desired)?;
    if comparison.is_same {
        return Ok(ReconcileOutcome::NoChanges);
    }

    let mut plan = plan_from_comparison(&current, &comparison)?;
    if options.dry_run {
        return Ok(ReconcileOutcome::Planned(plan));
    }

    let report = plan.execute(&mut *cluster, &options.execution_options())?;

    if !options.verify {
        return Ok(ReconcileOutcome::Applied {
            plan,
            report,
            converged: None,
            residual: None,
        });
    }

    let after = fetch(&mut *cluster, "reconciled")?;
    let residual = compare(&after, desired)?;
    let converged = residual.is_same;
    if !converged {
        let counts = residual.counts();
        tracing::warn!(
            plan_id = %plan.id(),
            added_len = counts.added,
            modified_len = counts.modified,
            removed_len = counts.removed,
            "cluster did not converge"
        );
    }

    Ok(ReconcileOutcome::Applied {
        plan,
        report,
        converged: Some(converged),
        residual: (!converged).then_some(residual),
    })
}
