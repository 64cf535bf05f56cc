//! Command orchestration layer.
//!
//! Each command owns the lifecycle logging of its operation and delegates
//! the actual work to the core.

pub mod dump;
pub mod reconcile;
