//! gridconf core - configuration reconciliation kernel for batch-scheduler clusters
//!
//! This crate provides:
//! - The snapshot aggregate: every managed record of a cluster, keyed by name
//! - Text codecs for the administrative tool's formats (override lists,
//!   continuation lines, attribute records, the complex table)
//! - A structural diff engine producing added/modified/removed snapshots
//! - A reconciliation planner that orders the diff into a safe mutation
//!   sequence, with reference cleanup before every delete
//! - Plan execution against an [`apply::ApplyCollaborator`]
//!
//! Everything here is synchronous and free of global state.

pub mod apply;
pub mod codec;
pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod plan;

// Re-export commonly used types
pub use apply::{ApplyCollaborator, ExecutionOptions, ExecutionReport, OpFailure};
pub use diff::{compare, Comparison};
pub use errors::{GcError, GcErrorKind, GridConfError, Result};
pub use model::{EntityKind, EntityRecord, Snapshot};
pub use plan::{build_plan, plan_from_comparison, Plan, PlanPhase, PlanState, PlannedOp};
