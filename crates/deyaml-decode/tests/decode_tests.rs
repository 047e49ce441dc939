#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{decode_fixture, field, kubernetes, objects, read_fixture};
use deyaml_core::errors::ExErrorKind;
use deyaml_core::model::Value;
use deyaml_decode::{DecodeOptions, Decoder};

#[test]
fn test_decode_configmap() {
    // GIVEN a single ConfigMap document
    let graph = decode_fixture("configmap.yaml");

    // WHEN reading the decoded object
    let objects = objects(&graph);

    // THEN the inline TypeMeta and the metadata are filled from the mapping
    assert_eq!(objects.len(), 1);
    let cm = objects[0];
    assert_eq!(graph.types().display_name(cm.ty()), "v1.ConfigMap");
    assert_eq!(
        field(cm, &["TypeMeta", "Kind"]).value(),
        &Value::Str("ConfigMap".into())
    );
    assert_eq!(
        field(cm, &["TypeMeta", "APIVersion"]).value(),
        &Value::Str("v1".into())
    );
    assert_eq!(
        field(cm, &["ObjectMeta", "Name"]).value(),
        &Value::Str("settings".into())
    );
    assert_eq!(
        field(cm, &["Data"]).value(),
        &Value::Map(Some(vec![(
            Value::Str("mode".into()),
            Value::Str("fast".into())
        )]))
    );
    // Absent keys decode to nil
    assert_eq!(field(cm, &["BinaryData"]).value(), &Value::Map(None));
    assert_eq!(field(cm, &["Immutable"]).value(), &Value::Pointer(None));
}

#[test]
fn test_decode_deployment_pointers_and_hints() {
    let graph = decode_fixture("deployment.yaml");
    let deploy = objects(&graph)[0];

    assert_eq!(
        field(deploy, &["Spec", "Replicas"]).deref().unwrap().value(),
        &Value::Int(3)
    );

    // intstr from a string and from an integer
    let rolling = field(deploy, &["Spec", "Strategy", "RollingUpdate"]);
    assert_eq!(
        field(rolling, &["MaxSurge"]).deref().unwrap().value(),
        &Value::Struct(vec![
            Value::Int(1),
            Value::Int(0),
            Value::Str("25%".into())
        ])
    );
    assert_eq!(
        field(rolling, &["MaxUnavailable"]).deref().unwrap().value(),
        &Value::Struct(vec![Value::Int(0), Value::Int(1), Value::Str(String::new())])
    );

    // Quantities keep their text, numbers included
    let container = field(deploy, &["Spec", "Template", "Spec", "Containers"]).elements()[0];
    let limits = field(container, &["Resources", "Limits"]);
    assert_eq!(
        limits.value(),
        &Value::Map(Some(vec![
            (Value::Str("cpu".into()), Value::Str("500m".into())),
            (Value::Str("memory".into()), Value::Str("128Mi".into())),
        ]))
    );
    let requests = field(container, &["Resources", "Requests"]);
    assert_eq!(
        requests.value(),
        &Value::Map(Some(vec![(Value::Str("cpu".into()), Value::Str("1".into()))]))
    );
}

#[test]
fn test_decode_inline_volume_source() {
    let graph = decode_fixture("deployment.yaml");
    let deploy = objects(&graph)[0];

    let volume = field(deploy, &["Spec", "Template", "Spec", "Volumes"]).elements()[0];
    assert_eq!(field(volume, &["Name"]).value(), &Value::Str("cache".into()));
    let empty_dir = field(volume, &["VolumeSource", "EmptyDir"]);
    let pointee = empty_dir.deref().expect("emptyDir: {} allocates a slot");
    assert!(pointee.is_absent());
}

#[test]
fn test_decode_secret_bytes_are_base64() {
    let graph = decode_fixture("secret.yaml");
    let secret = objects(&graph)[0];

    assert_eq!(
        field(secret, &["Data"]).value(),
        &Value::Map(Some(vec![(
            Value::Str("token".into()),
            Value::Slice(Some(vec![Value::Uint(0x68), Value::Uint(0x69)]))
        )]))
    );
    assert_eq!(field(secret, &["Type"]).value(), &Value::Str("Opaque".into()));
}

#[test]
fn test_multi_document_skips_empty_documents() {
    let graph = decode_fixture("multi.yaml");
    let objects = objects(&graph);

    assert_eq!(objects.len(), 2);
    assert_eq!(graph.types().display_name(objects[0].ty()), "v1.Namespace");
    assert_eq!(
        graph.types().display_name(objects[1].ty()),
        "v1.ServiceAccount"
    );
    // `false` was set explicitly, so the pointer is allocated
    let automount = field(objects[1], &["AutomountServiceAccountToken"]);
    assert_eq!(automount.deref().unwrap().value(), &Value::Bool(false));
}

#[test]
fn test_empty_input_decodes_to_empty_root() {
    let scheme = kubernetes();
    let graph = Decoder::new(&scheme).decode_str("").unwrap();

    assert!(objects(&graph).is_empty());
    assert_eq!(graph.root().unwrap().value(), &Value::Slice(Some(Vec::new())));
}

#[test]
fn test_unknown_field_skipped_by_default() {
    let scheme = kubernetes();
    let graph = Decoder::new(&scheme)
        .decode_str(&read_fixture("unknown_field.yaml"))
        .unwrap();

    let deploy = objects(&graph)[0];
    assert_eq!(field(deploy, &["Spec", "Replicas"]).value(), &Value::Pointer(None));
}

#[test]
fn test_unknown_field_rejected_when_strict() {
    let scheme = kubernetes();
    let err = Decoder::new(&scheme)
        .with_options(DecodeOptions::default().with_strict(true))
        .decode_str(&read_fixture("unknown_field.yaml"))
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::UnknownField);
    assert_eq!(err.path(), Some("spec"));
    assert_eq!(err.document(), Some(0));
    assert!(err.message().contains("replica"));
}

#[test]
fn test_strict_accepts_inline_keys() {
    let scheme = kubernetes();
    let result = Decoder::new(&scheme)
        .with_options(DecodeOptions::default().with_strict(true))
        .decode_str(&read_fixture("deployment.yaml"));

    assert!(result.is_ok(), "{:?}", result.err());
}

#[test]
fn test_type_mismatch_reports_path() {
    let scheme = kubernetes();
    let err = Decoder::new(&scheme)
        .decode_str(&read_fixture("bad_replicas.yaml"))
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::TypeMismatch);
    assert_eq!(err.path(), Some("spec.replicas"));
    assert!(err.message().contains("int32"));
}

#[test]
fn test_out_of_range_reports_nested_path() {
    let yaml = "\
apiVersion: v1
kind: Pod
spec:
  containers:
    - name: app
      ports:
        - containerPort: 4294967296
";
    let scheme = kubernetes();
    let err = Decoder::new(&scheme).decode_str(yaml).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::OutOfRange);
    assert_eq!(
        err.path(),
        Some("spec.containers[0].ports[0].containerPort")
    );
}

#[test]
fn test_missing_kind_reports_document_index() {
    let yaml = "\
apiVersion: v1
kind: Namespace
metadata:
  name: a
---
apiVersion: v1
metadata:
  name: b
";
    let scheme = kubernetes();
    let err = Decoder::new(&scheme).decode_str(yaml).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::MissingField);
    assert_eq!(err.document(), Some(1));
    assert!(err.message().contains("kind"));
}

#[test]
fn test_unknown_kind() {
    let scheme = kubernetes();
    let err = Decoder::new(&scheme)
        .decode_str("apiVersion: example.com/v1\nkind: Gadget\n")
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::UnknownKind);
    assert!(err.message().contains("Gadget"));
}

#[test]
fn test_invalid_yaml() {
    let scheme = kubernetes();
    let err = Decoder::new(&scheme)
        .decode_str("apiVersion: v1\nkind: [unclosed\n")
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Serialization);
    assert_eq!(err.document(), Some(0));
}

#[test]
fn test_decode_files_tags_errors_with_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let good = dir.path().join("good.yaml");
    let bad = dir.path().join("bad.yaml");
    std::fs::write(&good, read_fixture("configmap.yaml")).unwrap();
    std::fs::write(&bad, read_fixture("bad_replicas.yaml")).unwrap();

    let scheme = kubernetes();
    let decoder = Decoder::new(&scheme);

    let graph = decoder.decode_files(&[good.clone(), good.clone()]).unwrap();
    assert_eq!(objects(&graph).len(), 2);

    let err = decoder.decode_files(&[good, bad.clone()]).unwrap_err();
    assert_eq!(err.file(), Some(bad.display().to_string().as_str()));
    assert_eq!(err.document(), Some(0));
}

#[test]
fn test_decode_files_missing_file() {
    let scheme = kubernetes();
    let err = Decoder::new(&scheme)
        .decode_files(&[common::fixture("does-not-exist.yaml")])
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Io);
}
