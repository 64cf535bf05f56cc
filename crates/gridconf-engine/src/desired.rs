//! Desired-state loading
//!
//! The desired snapshot is plain JSON in the shape of
//! [`Snapshot`](gridconf_core::model::Snapshot). Collections may be absent
//! or `null`; an absent global or scheduler configuration means "leave it
//! alone". The cluster environment, if present, is carried but never
//! compared.

#![allow(clippy::result_large_err)]

use gridconf_core::errors::{GcError, GcErrorKind};
use gridconf_core::model::Snapshot;
use gridconf_core::{log_op_end, log_op_error, log_op_start};
use std::path::Path;

/// Parse and validate a desired snapshot
///
/// # Errors
///
/// - `Serialization` when the text is not a snapshot document
/// - `AmbiguousIdentity` when a collection key disagrees with its record's
///   name or a scalar list repeats a member
pub fn parse_desired_snapshot(json: &str) -> Result<Snapshot, GcError> {
    let snapshot: Snapshot = serde_json::from_str(json)?;
    snapshot.validate_identity()?;
    Ok(snapshot)
}

/// Read, parse and validate a desired snapshot file
///
/// # Errors
///
/// `Io` when the file cannot be read, otherwise as
/// [`parse_desired_snapshot`].
pub fn load_desired_snapshot(path: impl AsRef<Path>) -> Result<Snapshot, GcError> {
    let path = path.as_ref();
    log_op_start!("load_desired_snapshot", path = %path.display());
    let start = std::time::Instant::now();

    let result = std::fs::read_to_string(path)
        .map_err(|e| {
            GcError::new(GcErrorKind::Io)
                .with_op("load_desired_snapshot")
                .with_message(format!("{}: {}", path.display(), e))
        })
        .and_then(|text| parse_desired_snapshot(&text))
        .map_err(|e| {
            log_op_error!(
                "load_desired_snapshot",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

    log_op_end!(
        "load_desired_snapshot",
        duration_ms = start.elapsed().as_millis() as u64,
        entity_count = result.entity_count()
    );

    Ok(result)
}
