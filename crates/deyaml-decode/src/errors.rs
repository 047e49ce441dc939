//! Error handling for deyaml-decode
//!
//! Wraps deyaml-core ExError with schema and decoder specific helpers

use std::path::Path;

use deyaml_core::errors::{DeyamlError, ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a schema validation error
pub fn schema_invalid(reason: impl Into<String>) -> ExError {
    ExError::from(DeyamlError::InvalidSchema {
        reason: reason.into(),
    })
    .with_op("schema_build")
}

/// Create an error for a schema file that is not valid YAML
pub fn schema_parse(source: &str, err: serde_yaml::Error) -> ExError {
    ExError::new(ExErrorKind::InvalidSchema)
        .with_op("schema_parse")
        .with_file(source)
        .with_message(format!("Schema parse error: {}", err))
}

/// Create a decode error for a YAML node of the wrong shape
pub fn decode_mismatch(path: &str, expected: impl Into<String>, found: impl Into<String>) -> ExError {
    ExError::from(DeyamlError::TypeMismatch {
        path: path.to_string(),
        expected: expected.into(),
        found: found.into(),
    })
    .with_op("decode")
}

/// Create a decode error for a number that does not fit its target type
pub fn out_of_range(path: &str, value: impl Into<String>, expected: impl Into<String>) -> ExError {
    ExError::from(DeyamlError::OutOfRange {
        path: path.to_string(),
        value: value.into(),
        expected: expected.into(),
    })
    .with_op("decode")
}

/// Create a strict-mode error for a key that matches no field
pub fn unknown_field(path: &str, field: &str) -> ExError {
    ExError::from(DeyamlError::UnknownField {
        path: path.to_string(),
        field: field.to_string(),
    })
    .with_op("decode")
}

/// Create an error for an apiVersion/kind pair with no registered type
pub fn unknown_kind(api_version: &str, kind: &str) -> ExError {
    ExError::from(DeyamlError::UnknownKind {
        api_version: api_version.to_string(),
        kind: kind.to_string(),
    })
    .with_op("decode")
}

/// Create an error for a document without apiVersion or kind
pub fn missing_type_meta(document: usize, field: &str) -> ExError {
    ExError::from(DeyamlError::MissingTypeMeta {
        document,
        field: field.to_string(),
    })
    .with_op("decode")
}

/// Create an error for manifest input that is not valid YAML
pub fn yaml_parse(err: serde_yaml::Error) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op("decode")
        .with_message(format!("YAML parse error: {}", err))
}

/// Create an IO error
pub fn io_error(operation: &str, path: &Path, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_file(path.display().to_string())
        .with_message(err.to_string())
}

/// Create an invalid input error
pub fn invalid_input(operation: &str, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op(operation.to_string())
        .with_message(reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helpers_set_kind_and_op() {
        let err = decode_mismatch("spec.replicas", "int32", "string");
        assert_eq!(err.kind(), ExErrorKind::TypeMismatch);
        assert_eq!(err.op(), Some("decode"));
        assert_eq!(err.path(), Some("spec.replicas"));

        let err = schema_invalid("type v1.Pod has no shape");
        assert_eq!(err.code(), "ERR_INVALID_SCHEMA");
        assert_eq!(err.op(), Some("schema_build"));
    }

    #[test]
    fn test_io_error_names_file() {
        let err = io_error(
            "read_manifest",
            Path::new("missing.yaml"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert_eq!(err.kind(), ExErrorKind::Io);
        assert_eq!(err.file(), Some("missing.yaml"));
    }
}
