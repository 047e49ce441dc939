use thiserror::Error;

/// Result type alias using DeyamlError
pub type Result<T> = std::result::Result<T, DeyamlError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every error surfaced by the workspace is classified into one of these
/// kinds. Each kind maps to a stable error code usable for programmatic
/// handling and test assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    InvalidInput,
    MissingField,

    // Schema
    InvalidSchema,
    InvalidTypeExpr,
    UnknownType,
    DuplicateType,

    // Decoding
    UnknownKind,
    TypeMismatch,
    UnknownField,
    OutOfRange,

    // Integration/IO
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::MissingField => "ERR_MISSING_FIELD",
            ExErrorKind::InvalidSchema => "ERR_INVALID_SCHEMA",
            ExErrorKind::InvalidTypeExpr => "ERR_INVALID_TYPE_EXPR",
            ExErrorKind::UnknownType => "ERR_UNKNOWN_TYPE",
            ExErrorKind::DuplicateType => "ERR_DUPLICATE_TYPE",
            ExErrorKind::UnknownKind => "ERR_UNKNOWN_KIND",
            ExErrorKind::TypeMismatch => "ERR_TYPE_MISMATCH",
            ExErrorKind::UnknownField => "ERR_UNKNOWN_FIELD",
            ExErrorKind::OutOfRange => "ERR_OUT_OF_RANGE",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind plus the context needed to locate the
/// failure in the input: the operation, the source file, the YAML document
/// index and the field path inside that document.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    file: Option<String>,
    document: Option<usize>,
    path: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            file: None,
            document: None,
            path: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add source file context
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Add YAML document index context (zero-based)
    pub fn with_document(mut self, document: usize) -> Self {
        self.document = Some(document);
        self
    }

    /// Add field path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
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

    /// Get the source file context, if any
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    /// Get the document index context, if any
    pub fn document(&self) -> Option<usize> {
        self.document
    }

    /// Get the field path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
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
        if let Some(file) = &self.file {
            write!(f, " (file: {})", file)?;
        }
        if let Some(document) = self.document {
            write!(f, " (document: {})", document)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(source) = &self.source {
            write!(f, ": caused by {}", source)?;
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

/// Error taxonomy for schema construction and graph decoding
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeyamlError {
    // ===== Type Table Errors =====
    /// A named type was referenced but never declared
    #[error("Unknown type: {name}")]
    UnknownType { name: String },

    /// A named type was declared twice in the same table
    #[error("Type already declared: {name}")]
    DuplicateType { name: String },

    /// A type expression could not be parsed
    #[error("Invalid type expression '{expr}': {reason}")]
    InvalidTypeExpr { expr: String, reason: String },

    /// A schema definition is structurally invalid
    #[error("Invalid schema: {reason}")]
    InvalidSchema { reason: String },

    // ===== Decode Errors =====
    /// A document names an apiVersion/kind pair with no registered type
    #[error("No type registered for apiVersion={api_version}, kind={kind}")]
    UnknownKind { api_version: String, kind: String },

    /// A document is missing its apiVersion or kind
    #[error("Document {document} is missing required field '{field}'")]
    MissingTypeMeta { document: usize, field: String },

    /// A YAML node does not have the shape the target type requires
    #[error("Type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    /// A numeric YAML node does not fit the target type
    #[error("Value out of range at {path}: {value} does not fit {expected}")]
    OutOfRange {
        path: String,
        value: String,
        expected: String,
    },

    /// A mapping key matches no field of the target struct
    #[error("Unknown field '{field}' at {path}")]
    UnknownField { path: String, field: String },

    // ===== Generic Errors =====
    /// YAML decoding error
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Conversion from DeyamlError to ExError
impl From<DeyamlError> for ExError {
    fn from(err: DeyamlError) -> Self {
        match err {
            DeyamlError::UnknownType { name } => ExError::new(ExErrorKind::UnknownType)
                .with_message(format!("Unknown type: {}", name)),

            DeyamlError::DuplicateType { name } => ExError::new(ExErrorKind::DuplicateType)
                .with_message(format!("Type already declared: {}", name)),

            DeyamlError::InvalidTypeExpr { expr, reason } => {
                ExError::new(ExErrorKind::InvalidTypeExpr)
                    .with_message(format!("Invalid type expression '{}': {}", expr, reason))
            }

            DeyamlError::InvalidSchema { reason } => {
                ExError::new(ExErrorKind::InvalidSchema).with_message(reason)
            }

            DeyamlError::UnknownKind { api_version, kind } => {
                ExError::new(ExErrorKind::UnknownKind).with_message(format!(
                    "No type registered for apiVersion={}, kind={}",
                    api_version, kind
                ))
            }

            DeyamlError::MissingTypeMeta { document, field } => {
                ExError::new(ExErrorKind::MissingField)
                    .with_document(document)
                    .with_message(format!("Missing required field '{}'", field))
            }

            DeyamlError::TypeMismatch {
                path,
                expected,
                found,
            } => ExError::new(ExErrorKind::TypeMismatch)
                .with_path(path)
                .with_message(format!("Expected {}, found {}", expected, found)),

            DeyamlError::OutOfRange {
                path,
                value,
                expected,
            } => ExError::new(ExErrorKind::OutOfRange)
                .with_path(path)
                .with_message(format!("{} does not fit {}", value, expected)),

            DeyamlError::UnknownField { path, field } => ExError::new(ExErrorKind::UnknownField)
                .with_path(path)
                .with_message(format!("Unknown field '{}'", field)),

            DeyamlError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            DeyamlError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}
