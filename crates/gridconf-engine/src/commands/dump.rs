//! Dump command: the live cluster as a comparison against nothing.
//!
//! Every live entity appears as added, and the global and scheduler
//! configurations appear as modified. Feeding the `added` snapshot back as a
//! desired snapshot reproduces the cluster.

#![allow(clippy::result_large_err)]

use crate::source::SnapshotSource;
use gridconf_core::diff::{compare, Comparison};
use gridconf_core::errors::{GcError, GcErrorKind};
use gridconf_core::model::Snapshot;
use gridconf_core::{log_op_end, log_op_error, log_op_start};

/// Fetch the live snapshot and compare it against the empty one
///
/// ## Errors
///
/// - `SnapshotUnavailable`: the fetch failed
/// - `AmbiguousIdentity`: the live snapshot has inconsistent identities
pub fn dump<S: SnapshotSource + ?Sized>(source: &mut S) -> Result<Comparison, GcError> {
    log_op_start!("dump");
    let start = std::time::Instant::now();

    let result = dump_impl(source).map_err(|e| {
        log_op_error!(
            "dump",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "dump",
        duration_ms = start.elapsed().as_millis() as u64,
        added_len = result.counts().added
    );

    Ok(result)
}

fn dump_impl<S: SnapshotSource + ?Sized>(source: &mut S) -> Result<Comparison, GcError> {
    let current = source.fetch_snapshot().map_err(|e| {
        GcError::new(GcErrorKind::SnapshotUnavailable)
            .with_op("dump")
            .with_message("fetching current snapshot")
            .with_source(e)
    })?;
    Ok(compare(&Snapshot::empty(), &current)?)
}
