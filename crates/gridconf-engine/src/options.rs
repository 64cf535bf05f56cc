//! Reconcile options
//!
//! Loaded from TOML. Every key is optional; unknown keys are rejected.
//!
//! ```toml
//! dry_run = false
//! verify = true
//! continue_on_delete_error = true
//! log_profile = "production"
//! ```

use gridconf_core::apply::ExecutionOptions;
use gridconf_core::errors::{GcError, GcErrorKind};
use gridconf_core::logging_facility::{self, Profile};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconcileOptions {
    /// Build the plan but do not execute it
    pub dry_run: bool,
    /// Re-fetch after execution and compare against the desired snapshot
    pub verify: bool,
    pub continue_on_delete_error: bool,
    pub log_profile: Profile,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            verify: true,
            continue_on_delete_error: true,
            log_profile: Profile::default(),
        }
    }
}

impl ReconcileOptions {
    /// Parse options from TOML text
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for malformed TOML, wrong value types or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self, GcError> {
        toml::from_str(text).map_err(|e| {
            GcError::new(GcErrorKind::InvalidConfig)
                .with_op("load_options")
                .with_message(e.to_string())
        })
    }

    /// Read options from a TOML file
    ///
    /// # Errors
    ///
    /// `Io` when the file cannot be read, otherwise as [`Self::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GcError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            GcError::new(GcErrorKind::Io)
                .with_op("load_options")
                .with_message(format!("{}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Install the process subscriber for `log_profile`; later calls are no-ops
    pub fn init_logging(&self) {
        logging_facility::init(self.log_profile);
    }

    pub fn execution_options(&self) -> ExecutionOptions {
        ExecutionOptions {
            continue_on_delete_error: self.continue_on_delete_error,
        }
    }
}
