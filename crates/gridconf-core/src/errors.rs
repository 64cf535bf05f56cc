use crate::model::EntityKind;
use thiserror::Error;

/// Result type alias using GridConfError
pub type Result<T> = std::result::Result<T, GridConfError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers can match on
/// programmatically (and that tests assert against) without parsing
/// human-readable messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GcErrorKind {
    // Parsing
    /// Text that cannot be decoded: unbalanced brackets, wrong column count,
    /// non-numeric or non-boolean field
    MalformedInput,
    /// A required record attribute is absent
    MissingField,

    // Identity
    /// Non-unique names in a collection or scalar list, or a collection key
    /// that disagrees with its record's own name
    AmbiguousIdentity,

    // Plan execution
    /// The apply collaborator rejected an add or modify step (fatal)
    ApplyFailed,
    /// The apply collaborator rejected a pre-delete reference cleanup (non-fatal)
    CleanupFailed,
    /// The apply collaborator rejected a delete step
    DeleteFailed,
    /// A plan was executed a second time
    PlanAlreadyExecuted,

    // Collaborators / integration
    /// The fetch collaborator could not supply a snapshot
    SnapshotUnavailable,
    /// Error reported by an external collaborator
    ExternalService,
    Serialization,
    Io,
    InvalidConfig,

    // Internal
    Internal,
}

impl GcErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            GcErrorKind::MalformedInput => "ERR_MALFORMED_INPUT",
            GcErrorKind::MissingField => "ERR_MISSING_FIELD",
            GcErrorKind::AmbiguousIdentity => "ERR_AMBIGUOUS_IDENTITY",
            GcErrorKind::ApplyFailed => "ERR_APPLY_FAILED",
            GcErrorKind::CleanupFailed => "ERR_CLEANUP_FAILED",
            GcErrorKind::DeleteFailed => "ERR_DELETE_FAILED",
            GcErrorKind::PlanAlreadyExecuted => "ERR_PLAN_ALREADY_EXECUTED",
            GcErrorKind::SnapshotUnavailable => "ERR_SNAPSHOT_UNAVAILABLE",
            GcErrorKind::ExternalService => "ERR_EXTERNAL_SERVICE",
            GcErrorKind::Serialization => "ERR_SERIALIZATION",
            GcErrorKind::Io => "ERR_IO",
            GcErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            GcErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries enough context (operation, entity kind, entity name and the
/// offending raw text) for an operator to locate and hand-fix the source
/// record.
#[derive(Debug, Clone)]
pub struct GcError {
    kind: GcErrorKind,
    op: Option<String>,
    entity_kind: Option<EntityKind>,
    entity_name: Option<String>,
    raw_text: Option<String>,
    message: String,
    source: Option<Box<GcError>>,
}

impl GcError {
    /// Create a new error with the specified kind
    pub fn new(kind: GcErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_kind: None,
            entity_name: None,
            raw_text: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity kind context
    pub fn with_entity_kind(mut self, kind: EntityKind) -> Self {
        self.entity_kind = Some(kind);
        self
    }

    /// Add entity name context
    pub fn with_entity_name(mut self, name: impl Into<String>) -> Self {
        self.entity_name = Some(name.into());
        self
    }

    /// Attach the raw text that could not be decoded
    pub fn with_raw_text(mut self, raw: impl Into<String>) -> Self {
        self.raw_text = Some(raw.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: GcError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> GcErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_kind(&self) -> Option<EntityKind> {
        self.entity_kind
    }

    pub fn entity_name(&self) -> Option<&str> {
        self.entity_name.as_deref()
    }

    pub fn raw_text(&self) -> Option<&str> {
        self.raw_text.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&GcError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for GcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(kind) = &self.entity_kind {
            write!(f, " (entity_kind: {})", kind)?;
        }
        if let Some(name) = &self.entity_name {
            write!(f, " (entity_name: {})", name)?;
        }
        if let Some(raw) = &self.raw_text {
            write!(f, " (raw: {:?})", raw)?;
        }
        if let Some(source) = &self.source {
            write!(f, " <- {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for GcError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Typed domain errors raised by the codecs, the record reader and the
/// snapshot identity checks
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridConfError {
    // ===== Text decoding =====
    /// `[` without a matching `]` (or the reverse) in an override list
    #[error("Unbalanced brackets at byte {position} in {raw:?}")]
    UnbalancedBrackets { raw: String, position: usize },

    /// A fixed-width table row with the wrong number of columns
    #[error("Expected {expected} fields but found {found} in line {line:?}")]
    FieldCount {
        expected: usize,
        found: usize,
        line: String,
    },

    /// A numeric attribute holding something that is not a number
    #[error("Field {field} is not a number: {value:?}")]
    NotANumber { field: String, value: String },

    /// A boolean attribute holding something that is not a boolean
    #[error("Field {field} is not a boolean: {value:?}")]
    NotABool { field: String, value: String },

    /// A `key=value` list element without `=`
    #[error("Field {field} has a malformed key=value pair: {value:?}")]
    MalformedPair { field: String, value: String },

    /// A required attribute is absent from a record
    #[error("Required field {field} is missing")]
    MissingField { field: String },

    /// Line index outside the output handed to the multi-line reader
    #[error("Line index {index} out of range for {len} lines")]
    InvalidLineIndex { index: usize, len: usize },

    /// A line that should start with a key is blank
    #[error("Line {index} has no key")]
    EmptyLine { index: usize },

    // ===== Identity =====
    /// The same name occurs more than once in one collection or scalar list
    #[error("Duplicate {kind} name: {name}")]
    DuplicateName { kind: EntityKind, name: String },

    /// A collection key disagrees with the record's own name
    #[error("{kind} stored under key {key} is named {name}")]
    NameMismatch {
        kind: EntityKind,
        key: String,
        name: String,
    },

    /// A record handed over under a kind it does not belong to
    #[error("Record {name} is not a {kind}")]
    KindMismatch { kind: EntityKind, name: String },

    // ===== Generic =====
    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

/// Conversion from GridConfError to GcError
impl From<GridConfError> for GcError {
    fn from(err: GridConfError) -> Self {
        let message = err.to_string();
        match err {
            GridConfError::UnbalancedBrackets { raw, .. } => {
                GcError::new(GcErrorKind::MalformedInput)
                    .with_raw_text(raw)
                    .with_message(message)
            }
            GridConfError::FieldCount { line, .. } => GcError::new(GcErrorKind::MalformedInput)
                .with_raw_text(line)
                .with_message(message),
            GridConfError::NotANumber { value, .. }
            | GridConfError::NotABool { value, .. }
            | GridConfError::MalformedPair { value, .. } => {
                GcError::new(GcErrorKind::MalformedInput)
                    .with_raw_text(value)
                    .with_message(message)
            }
            GridConfError::MissingField { .. } => {
                GcError::new(GcErrorKind::MissingField).with_message(message)
            }
            GridConfError::InvalidLineIndex { .. } | GridConfError::EmptyLine { .. } => {
                GcError::new(GcErrorKind::MalformedInput).with_message(message)
            }
            GridConfError::DuplicateName { kind, name } => {
                GcError::new(GcErrorKind::AmbiguousIdentity)
                    .with_entity_kind(kind)
                    .with_entity_name(name)
                    .with_message(message)
            }
            GridConfError::NameMismatch { kind, key, .. } => {
                GcError::new(GcErrorKind::AmbiguousIdentity)
                    .with_entity_kind(kind)
                    .with_entity_name(key)
                    .with_message(message)
            }
            GridConfError::KindMismatch { kind, name } => GcError::new(GcErrorKind::Internal)
                .with_entity_kind(kind)
                .with_entity_name(name)
                .with_message(message),
            GridConfError::Serialization { .. } => {
                GcError::new(GcErrorKind::Serialization).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to GridConfError
impl From<serde_json::Error> for GridConfError {
    fn from(err: serde_json::Error) -> Self {
        GridConfError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for GcError {
    fn from(err: serde_json::Error) -> Self {
        GridConfError::from(err).into()
    }
}
