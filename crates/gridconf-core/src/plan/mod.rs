//! Reconciliation planning
//!
//! - [`model`]: plans, planned operations, states
//! - [`references`]: the declared cross-entity reference relation
//! - [`planner`]: comparison → ordered plan

pub mod model;
pub mod planner;
pub mod references;

pub use model::{CleanupReason, Plan, PlanPhase, PlanState, PlannedOp};
pub use planner::{build_plan, host_group_order, plan_from_comparison};
pub use references::{
    all_references, holds_reference, references_to, strip_reference, Matching, Reference, REFERENCES,
};
