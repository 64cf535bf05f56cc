//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_PLAN_ID: &str = "plan_id";
pub const FIELD_RUN_ID: &str = "run_id";

// Entity identifiers
pub const FIELD_ENTITY_KIND: &str = "entity_kind";
pub const FIELD_ENTITY_NAME: &str = "entity_name";
pub const FIELD_PHASE: &str = "phase";
pub const FIELD_SEQ: &str = "seq";

// Collection sizes
pub const FIELD_ADDED_LEN: &str = "added_len";
pub const FIELD_MODIFIED_LEN: &str = "modified_len";
pub const FIELD_REMOVED_LEN: &str = "removed_len";
pub const FIELD_OPS_LEN: &str = "ops_len";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
