//! Fetch side of the cluster boundary

use gridconf_core::errors::GcError;
use gridconf_core::model::Snapshot;

/// Produces the current configuration of a live cluster
///
/// Implementations typically scrape the administrative tool. The engine
/// calls this once before planning and once more when verifying.
pub trait SnapshotSource {
    /// Read the complete current snapshot
    ///
    /// # Errors
    ///
    /// Any failure to read the cluster; the engine reports it as
    /// `SnapshotUnavailable` with this error attached as the source.
    fn fetch_snapshot(&mut self) -> Result<Snapshot, GcError>;
}

impl SnapshotSource for Snapshot {
    fn fetch_snapshot(&mut self) -> Result<Snapshot, GcError> {
        Ok(self.clone())
    }
}
