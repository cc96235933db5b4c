use regwatch_core_types::RequestId;
use thiserror::Error;

/// Result type alias using the canonical structured error
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable code that callers (CLI exit messages, tests,
/// report sinks) can match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Validation
    InvalidInput,
    /// Section map is not an object of non-empty string keys to string values
    InvalidSectionMap,
    /// Two snapshots of different logical documents were compared
    DocumentMismatch,
    /// Similarity threshold outside (0, 1]
    InvalidThreshold,
    /// Configuration file could not be parsed or holds out-of-range values
    Config,

    // Lookup
    NotFound,

    // Integration/IO
    Io,
    Serialization,
    Persistence,
    ExternalService,
    Timeout,
    Concurrency,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidSectionMap => "ERR_INVALID_SECTION_MAP",
            ExErrorKind::DocumentMismatch => "ERR_DOCUMENT_MISMATCH",
            ExErrorKind::InvalidThreshold => "ERR_INVALID_THRESHOLD",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::ExternalService => "ERR_EXTERNAL_SERVICE",
            ExErrorKind::Timeout => "ERR_TIMEOUT",
            ExErrorKind::Concurrency => "ERR_CONCURRENCY",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether this kind is a caller-side validation failure.
    ///
    /// Validation failures never mutate state.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ExErrorKind::InvalidInput
                | ExErrorKind::InvalidSectionMap
                | ExErrorKind::DocumentMismatch
                | ExErrorKind::InvalidThreshold
                | ExErrorKind::Config
        )
    }
}

/// Canonical structured error type
///
/// Carries a classification (`kind`) for programmatic handling plus optional
/// context for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    section_id: Option<String>,
    request_id: Option<RequestId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            section_id: None,
            request_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context (document id, snapshot id, fingerprint)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add section ID context
    pub fn with_section_id(mut self, id: impl Into<String>) -> Self {
        self.section_id = Some(id.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity ID context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the section ID context, if any
    pub fn section_id(&self) -> Option<&str> {
        self.section_id.as_deref()
    }

    /// Get the request ID context, if any
    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(section_id) = &self.section_id {
            write!(f, " (section_id: {})", section_id)?;
        }
        if let Some(source) = &self.source {
            write!(f, " <- {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for snapshot capture and comparison
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegwatchError {
    /// Section map root was not a JSON object
    #[error("Section map must be an object of section id to text, got {found}")]
    SectionMapNotObject { found: String },

    /// A section value was not a string
    #[error("Section {section_id} must map to a string, got {found}")]
    NonStringSection { section_id: String, found: String },

    /// A section id was empty or whitespace-only
    #[error("Section id must not be empty")]
    EmptySectionId,

    /// A capture named no document
    #[error("Document id must not be empty")]
    EmptyDocumentId,

    /// Snapshots from different logical documents were compared
    #[error("Cannot compare snapshots of different documents: {left} vs {right}")]
    DocumentMismatch { left: String, right: String },

    /// Threshold outside (0, 1]
    #[error("Similarity threshold must be in (0, 1], got {value}")]
    InvalidThreshold { value: f64 },

    /// Snapshot lookup failed
    #[error("Snapshot not found: {snapshot_id}")]
    SnapshotNotFound { snapshot_id: String },

    /// Canonical serialization failed
    #[error("Serialization failed: {message}")]
    Serialization { message: String },
}

/// Conversion from RegwatchError to ExError
impl From<RegwatchError> for ExError {
    fn from(err: RegwatchError) -> Self {
        let message = err.to_string();
        match err {
            RegwatchError::SectionMapNotObject { .. } | RegwatchError::EmptySectionId => {
                ExError::new(ExErrorKind::InvalidSectionMap).with_message(message)
            }
            RegwatchError::NonStringSection { section_id, .. } => {
                ExError::new(ExErrorKind::InvalidSectionMap)
                    .with_section_id(section_id)
                    .with_message(message)
            }
            RegwatchError::EmptyDocumentId => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }
            RegwatchError::DocumentMismatch { left, .. } => {
                ExError::new(ExErrorKind::DocumentMismatch)
                    .with_entity_id(left)
                    .with_message(message)
            }
            RegwatchError::InvalidThreshold { .. } => {
                ExError::new(ExErrorKind::InvalidThreshold).with_message(message)
            }
            RegwatchError::SnapshotNotFound { snapshot_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(snapshot_id)
                .with_message(message),
            RegwatchError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to RegwatchError
impl From<serde_json::Error> for RegwatchError {
    fn from(err: serde_json::Error) -> Self {
        RegwatchError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        RegwatchError::from(err).into()
    }
}
