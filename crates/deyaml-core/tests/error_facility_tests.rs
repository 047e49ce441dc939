use deyaml_core::errors::{DeyamlError, ExError, ExErrorKind};

#[test]
fn test_unknown_type_verifiable_by_kind() {
    let err = DeyamlError::UnknownType {
        name: "k8s.io/api/core/v1.Pod".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::UnknownType);
    assert_eq!(ex_err.code(), "ERR_UNKNOWN_TYPE");
    assert!(ex_err.message().contains("k8s.io/api/core/v1.Pod"));
}

#[test]
fn test_type_mismatch_carries_path() {
    let err = DeyamlError::TypeMismatch {
        path: "spec.replicas".to_string(),
        expected: "int32".to_string(),
        found: "string".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::TypeMismatch);
    assert_eq!(ex_err.path(), Some("spec.replicas"));
    assert!(ex_err.message().contains("int32"));
}

#[test]
fn test_missing_type_meta_carries_document() {
    let err = DeyamlError::MissingTypeMeta {
        document: 3,
        field: "kind".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::MissingField);
    assert_eq!(ex_err.document(), Some(3));
}

#[test]
fn test_context_added_after_conversion() {
    let ex_err: ExError = DeyamlError::UnknownField {
        path: "spec".to_string(),
        field: "replica".to_string(),
    }
    .into();
    let ex_err = ex_err.with_op("decode").with_file("deploy.yaml");

    assert_eq!(ex_err.op(), Some("decode"));
    assert_eq!(ex_err.file(), Some("deploy.yaml"));
    assert!(ex_err.to_string().contains("[ERR_UNKNOWN_FIELD]"));
}

#[test]
fn test_error_kind_code_mapping() {
    // Each kind has a stable, unique code
    let kinds = vec![
        (ExErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
        (ExErrorKind::MissingField, "ERR_MISSING_FIELD"),
        (ExErrorKind::InvalidTypeExpr, "ERR_INVALID_TYPE_EXPR"),
        (ExErrorKind::DuplicateType, "ERR_DUPLICATE_TYPE"),
        (ExErrorKind::Io, "ERR_IO"),
        (ExErrorKind::Serialization, "ERR_SERIALIZATION"),
        (ExErrorKind::Internal, "ERR_INTERNAL"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}
