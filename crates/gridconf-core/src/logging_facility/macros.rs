//! Lifecycle event macros
//!
//! Engine commands (`reconcile`, `dump`, `load_desired_snapshot`) bracket
//! their work with one start event and exactly one end or error event.
//! Core modules never emit these; they log details with `debug!`/`warn!`
//! and leave the lifecycle to their caller.
//!
//! Extra `key = value` fields (a plan id, an entity count) are passed
//! straight through to `tracing`.

/// Mark the entry of an engine command
///
/// ```
/// # use gridconf_core::log_op_start;
/// log_op_start!("reconcile");
/// log_op_start!("dump", entity_count = 12);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = gridconf_core_types::schema::EVENT_START,
            $($($field)*)?
        );
    };
}

/// Close a command that succeeded; `duration_ms` is mandatory
///
/// ```
/// # use gridconf_core::log_op_end;
/// log_op_end!("reconcile", duration_ms = 42, outcome = "applied");
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = gridconf_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)*)?
        );
    };
}

/// Close a command that failed
///
/// The error may be a [`GcError`](crate::errors::GcError) or a typed
/// [`GridConfError`](crate::errors::GridConfError); its kind and stable
/// `ERR_*` code are attached to the event.
///
/// ```
/// # use gridconf_core::log_op_error;
/// # use gridconf_core::errors::{GcError, GcErrorKind};
/// let err = GcError::new(GcErrorKind::SnapshotUnavailable).with_op("fetch_snapshot");
/// log_op_error!("reconcile", err, duration_ms = 10, run_id = "r-1");
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let failure: $crate::errors::GcError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = gridconf_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?failure.kind(),
            err_code = failure.code(),
            $($($field)*)?
        );
    }};
}
