//! Plan execution against an apply collaborator
//!
//! The collaborator performs one mutation per call and is treated as atomic
//! per call. Execution is strictly sequential in plan order.
//!
//! ## Failure contract
//!
//! - **Add / Modify**: fatal. The plan moves to `Failed` and execution stops;
//!   mutations already applied stay applied.
//! - **Cleanup**: recorded in the report, execution continues.
//! - **Delete**: recorded and execution continues when
//!   `continue_on_delete_error` is set (the default), fatal otherwise.
//!
//! ## Example
//!
//! ```
//! use gridconf_core::apply::{ApplyCollaborator, ExecutionOptions};
//! use gridconf_core::errors::GcError;
//! use gridconf_core::model::{EntityKind, EntityRecord, Snapshot};
//! use gridconf_core::plan::{build_plan, PlanState};
//!
//! #[derive(Default)]
//! struct Recorder(Vec<String>);
//!
//! impl ApplyCollaborator for Recorder {
//!     fn add(&mut self, kind: EntityKind, name: &str, _: &EntityRecord) -> Result<(), GcError> {
//!         self.0.push(format!("add {kind} {name}"));
//!         Ok(())
//!     }
//!     fn modify(&mut self, _: EntityKind, _: &str, _: &EntityRecord) -> Result<(), GcError> {
//!         Ok(())
//!     }
//!     fn modify_in_place(&mut self, _: EntityKind, _: &str, _: &EntityRecord) -> Result<(), GcError> {
//!         Ok(())
//!     }
//!     fn delete(&mut self, _: EntityKind, _: &str) -> Result<(), GcError> {
//!         Ok(())
//!     }
//! }
//!
//! let desired = Snapshot { operators: vec!["alice".into()], ..Default::default() };
//! let mut plan = build_plan(&Snapshot::empty(), &desired).unwrap();
//! let mut recorder = Recorder::default();
//! plan.execute(&mut recorder, &ExecutionOptions::default()).unwrap();
//! assert_eq!(recorder.0, vec!["add operator alice"]);
//! assert_eq!(plan.state(), PlanState::Completed);
//! ```

use crate::errors::{GcError, GcErrorKind};
use crate::model::{EntityKind, EntityRecord};
use crate::plan::{Plan, PlanPhase, PlanState, PlannedOp};
use gridconf_core_types::PlanId;
use serde::Serialize;

/// Mutations the core asks the outside world to perform
///
/// Each call mutates exactly one entity. For scalar-list kinds the record is
/// an [`EntityRecord::Member`].
pub trait ApplyCollaborator {
    /// Create an entity that does not exist yet
    ///
    /// # Errors
    ///
    /// Any error aborts the plan.
    fn add(&mut self, kind: EntityKind, name: &str, record: &EntityRecord) -> Result<(), GcError>;

    /// Replace an existing entity with the full new record
    ///
    /// # Errors
    ///
    /// Any error aborts the plan.
    fn modify(&mut self, kind: EntityKind, name: &str, record: &EntityRecord)
        -> Result<(), GcError>;

    /// Replace an existing entity with a copy stripped of one reference
    ///
    /// # Errors
    ///
    /// Errors are recorded and execution continues.
    fn modify_in_place(
        &mut self,
        kind: EntityKind,
        name: &str,
        record: &EntityRecord,
    ) -> Result<(), GcError>;

    /// Remove an entity
    ///
    /// # Errors
    ///
    /// Handling depends on [`ExecutionOptions::continue_on_delete_error`].
    fn delete(&mut self, kind: EntityKind, name: &str) -> Result<(), GcError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionOptions {
    /// Keep deleting after a failed delete
    pub continue_on_delete_error: bool,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            continue_on_delete_error: true,
        }
    }
}

/// A non-fatal step failure
#[derive(Debug, Clone, Serialize)]
pub struct OpFailure {
    pub seq: usize,
    pub kind: EntityKind,
    pub name: String,
    #[serde(serialize_with = "serialize_error")]
    pub error: GcError,
}

fn serialize_error<S: serde::Serializer>(err: &GcError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(err)
}

/// What happened when a plan ran
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionReport {
    pub plan_id: PlanId,
    /// Sequence numbers of the steps the collaborator accepted
    pub applied: Vec<usize>,
    pub cleanup_failures: Vec<OpFailure>,
    pub delete_failures: Vec<OpFailure>,
}

impl ExecutionReport {
    /// True when every step was applied
    pub fn is_clean(&self) -> bool {
        self.cleanup_failures.is_empty() && self.delete_failures.is_empty()
    }
}

const OP: &str = "execute_plan";

fn step_error(kind: GcErrorKind, op: &PlannedOp, source: GcError) -> GcError {
    GcError::new(kind)
        .with_op(OP)
        .with_entity_kind(op.kind)
        .with_entity_name(op.name.clone())
        .with_message(format!(
            "{} of {} '{}' failed at step {}",
            op.phase, op.kind, op.name, op.seq
        ))
        .with_source(source)
}

fn payload(op: &PlannedOp) -> Result<&EntityRecord, GcError> {
    op.payload.as_ref().ok_or_else(|| {
        GcError::new(GcErrorKind::Internal)
            .with_op(OP)
            .with_entity_kind(op.kind)
            .with_entity_name(op.name.clone())
            .with_message(format!("{} step {} has no payload", op.phase, op.seq))
    })
}

impl Plan {
    /// Run every step through `applier`, in order
    ///
    /// # Errors
    ///
    /// - `PlanAlreadyExecuted` if the plan is not in the `Built` state
    /// - `ApplyFailed` when an add or modify is rejected
    /// - `DeleteFailed` when a delete is rejected and deletes may not continue
    ///
    /// The underlying collaborator error is attached as the source.
    pub fn execute<A: ApplyCollaborator + ?Sized>(
        &mut self,
        applier: &mut A,
        options: &ExecutionOptions,
    ) -> Result<ExecutionReport, GcError> {
        if self.state != PlanState::Built {
            return Err(GcError::new(GcErrorKind::PlanAlreadyExecuted)
                .with_op(OP)
                .with_message(format!("plan {} is {:?}", self.id, self.state)));
        }
        self.state = PlanState::Executing;

        let mut report = ExecutionReport {
            plan_id: self.id.clone(),
            applied: Vec::new(),
            cleanup_failures: Vec::new(),
            delete_failures: Vec::new(),
        };

        for op in &self.ops {
            tracing::debug!(
                plan_id = %self.id,
                seq = op.seq,
                phase = %op.phase,
                entity_kind = %op.kind,
                entity_name = %op.name,
                "applying operation"
            );

            let outcome = match op.phase {
                PlanPhase::Add => payload(op).and_then(|r| applier.add(op.kind, &op.name, r)),
                PlanPhase::Modify => {
                    payload(op).and_then(|r| applier.modify(op.kind, &op.name, r))
                }
                PlanPhase::Cleanup => {
                    payload(op).and_then(|r| applier.modify_in_place(op.kind, &op.name, r))
                }
                PlanPhase::Delete => applier.delete(op.kind, &op.name),
            };

            let err = match outcome {
                Ok(()) => {
                    report.applied.push(op.seq);
                    continue;
                }
                Err(err) => err,
            };

            match op.phase {
                PlanPhase::Add | PlanPhase::Modify => {
                    self.state = PlanState::Failed;
                    return Err(step_error(GcErrorKind::ApplyFailed, op, err));
                }
                PlanPhase::Cleanup => {
                    tracing::warn!(
                        plan_id = %self.id,
                        seq = op.seq,
                        entity_kind = %op.kind,
                        entity_name = %op.name,
                        err_code = err.code(),
                        "reference cleanup failed; continuing"
                    );
                    report.cleanup_failures.push(OpFailure {
                        seq: op.seq,
                        kind: op.kind,
                        name: op.name.clone(),
                        error: step_error(GcErrorKind::CleanupFailed, op, err),
                    });
                }
                PlanPhase::Delete => {
                    tracing::warn!(
                        plan_id = %self.id,
                        seq = op.seq,
                        entity_kind = %op.kind,
                        entity_name = %op.name,
                        err_code = err.code(),
                        "delete failed"
                    );
                    let error = step_error(GcErrorKind::DeleteFailed, op, err);
                    if !options.continue_on_delete_error {
                        self.state = PlanState::Failed;
                        return Err(error);
                    }
                    report.delete_failures.push(OpFailure {
                        seq: op.seq,
                        kind: op.kind,
                        name: op.name.clone(),
                        error,
                    });
                }
            }
        }

        self.state = PlanState::Completed;
        Ok(report)
    }
}
