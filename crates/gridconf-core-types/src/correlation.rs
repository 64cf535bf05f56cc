//! Correlation types for plan and reconcile-run tracking
//!
//! Every plan and every reconcile run carries its own id so that log lines
//! emitted by the core, the engine and the apply collaborator can be tied
//! back to one convergence attempt.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! correlation_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        ///
        /// UUIDv7, so ids sort by creation time.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Wrap an id produced elsewhere (e.g. read back from a report)
            pub fn from_string(s: String) -> Self {
                Self(s)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

correlation_id!(
    /// Identity of one reconciliation plan
    PlanId
);

correlation_id!(
    /// Identity of one fetch → compare → plan → execute → verify cycle
    RunId
);
