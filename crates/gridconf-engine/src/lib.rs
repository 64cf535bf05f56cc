//! gridconf engine - reconciliation orchestration
//!
//! Coordinates the pure core with the outside world: fetch the live
//! snapshot, compare it with the desired one, plan, execute through an
//! apply collaborator and verify convergence.

pub mod commands;
pub mod desired;
pub mod in_memory;
pub mod options;
pub mod source;

pub use commands::dump::dump;
pub use commands::reconcile::{reconcile, ReconcileOutcome};
pub use desired::{load_desired_snapshot, parse_desired_snapshot};
pub use in_memory::{InMemoryCluster, Mutation};
pub use options::ReconcileOptions;
pub use source::SnapshotSource;
