//! Core types shared across gridconf facilities
//!
//! This crate provides foundational types used by both the error and
//! logging facilities and by the reconcile engine:
//!
//! - **Correlation types**: PlanId, RunId
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::{PlanId, RunId};
