//! Structural snapshot diff
//!
//! - [`model`]: `Comparison` and per-collection diff types
//! - [`engine`]: the generic comparison routine and `compare`

pub mod engine;
pub mod model;

pub use engine::{compare, find_differences, find_list_differences};
pub use model::{ChangeCounts, CollectionDiff, Comparison};
