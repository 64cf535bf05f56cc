//! Structured logging for gridconf
//!
//! One `init(profile)` call per process picks human-readable or JSON output.
//! Engine commands mark operation boundaries with `log_op_start!`,
//! `log_op_end!` and `log_op_error!`; the core itself only logs detail
//! (`debug!`) and non-fatal step failures (`warn!`). Tests assert on
//! emitted events through [`test_capture`].
//!
//! ```rust
//! use gridconf_core::logging_facility::{init, Profile};
//!
//! init(Profile::Production);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
