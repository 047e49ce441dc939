//! End-to-end tests for the deyaml binary

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const CONFIGMAP: &str = "\
apiVersion: v1
kind: ConfigMap
metadata:
  name: settings
  labels:
    app: web
data:
  mode: fast
";

const CONFIGMAP_SOURCE: &str = "\
package example

import (
\tcorev1 \"k8s.io/api/core/v1\"
\tmetav1 \"k8s.io/apimachinery/pkg/apis/meta/v1\"
\t\"k8s.io/apimachinery/pkg/runtime\"
)

var objects = []runtime.Object{
\t&corev1.ConfigMap{
\t\tTypeMeta: metav1.TypeMeta{Kind: \"ConfigMap\", APIVersion: \"v1\"},
\t\tObjectMeta: metav1.ObjectMeta{
\t\t\tName:   \"settings\",
\t\t\tLabels: map[string]string{\"app\": \"web\"},
\t\t},
\t\tData: map[string]string{\"mode\": \"fast\"},
\t},
}
";

fn deyaml(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_deyaml"))
        .args(args)
        .output()
        .expect("Failed to run deyaml")
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

#[test]
fn test_generate_to_stdout() {
    let dir = TempDir::new().unwrap();
    let manifest = write(dir.path(), "cm.yaml", CONFIGMAP);

    let output = deyaml(&["generate", manifest.to_str().unwrap()]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), CONFIGMAP_SOURCE);
}

#[test]
fn test_generate_to_output_file() {
    let dir = TempDir::new().unwrap();
    let manifest = write(dir.path(), "cm.yaml", CONFIGMAP);
    let out = dir.path().join("objects.go");

    let output = deyaml(&[
        "generate",
        manifest.to_str().unwrap(),
        "--package",
        "fixtures",
        "--var",
        "all",
        "--output",
        out.to_str().unwrap(),
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("✓ Generated"));
    let source = std::fs::read_to_string(&out).unwrap();
    assert!(source.starts_with("package fixtures\n"));
    assert!(source.contains("var all = []runtime.Object{\n"));
}

#[test]
fn test_generate_rejects_invalid_var_name() {
    let dir = TempDir::new().unwrap();
    let manifest = write(dir.path(), "cm.yaml", CONFIGMAP);

    let output = deyaml(&["generate", manifest.to_str().unwrap(), "--var", "my-objects"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Error: invalid variable name 'my-objects'"));
}

#[test]
fn test_generate_reads_directories() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "b.yaml", CONFIGMAP);
    write(
        dir.path(),
        "a.yml",
        "apiVersion: v1\nkind: Namespace\nmetadata:\n  name: shop\n",
    );
    write(dir.path(), "notes.txt", "not a manifest");

    let output = deyaml(&["generate", dir.path().to_str().unwrap()]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let source = stdout(&output);
    let namespace = source.find("&corev1.Namespace{").unwrap();
    let configmap = source.find("&corev1.ConfigMap{").unwrap();
    assert!(namespace < configmap);
}

#[test]
fn test_imports_json() {
    let dir = TempDir::new().unwrap();
    let manifest = write(dir.path(), "cm.yaml", CONFIGMAP);

    let output = deyaml(&["imports", manifest.to_str().unwrap(), "--json"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let table: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(
        table,
        serde_json::json!({
            "k8s.io/api/core/v1": "corev1",
            "k8s.io/apimachinery/pkg/apis/meta/v1": "metav1",
            "k8s.io/apimachinery/pkg/runtime": "",
        })
    );
}

#[test]
fn test_imports_lines() {
    let dir = TempDir::new().unwrap();
    let manifest = write(dir.path(), "cm.yaml", CONFIGMAP);

    let output = deyaml(&["imports", manifest.to_str().unwrap()]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "corev1 \"k8s.io/api/core/v1\"\n\
         metav1 \"k8s.io/apimachinery/pkg/apis/meta/v1\"\n\
         \"k8s.io/apimachinery/pkg/runtime\"\n"
    );
}

#[test]
fn test_unknown_kind_fails() {
    let dir = TempDir::new().unwrap();
    let manifest = write(
        dir.path(),
        "gadget.yaml",
        "apiVersion: example.com/v1\nkind: Gadget\n",
    );

    let output = deyaml(&["generate", manifest.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    let err = stderr(&output);
    assert!(err.contains("Error: "));
    assert!(err.contains("Gadget"));
}

#[test]
fn test_strict_rejects_unknown_field() {
    let dir = TempDir::new().unwrap();
    let manifest = write(
        dir.path(),
        "deploy.yaml",
        "apiVersion: apps/v1\nkind: Deployment\nspec:\n  replica: 3\n",
    );
    let path = manifest.to_str().unwrap();

    let lenient = deyaml(&["generate", path]);
    assert!(lenient.status.success(), "stderr: {}", stderr(&lenient));

    let strict = deyaml(&["generate", path, "--strict"]);
    assert!(!strict.status.success());
    assert!(stderr(&strict).contains("replica"));
}

#[test]
fn test_schema_flag_adds_kind() {
    let dir = TempDir::new().unwrap();
    let schema = write(
        dir.path(),
        "widget-schema.yaml",
        r#"
types:
  - name: Widget
    namespace: example.com/widgets/v1
    struct:
      - { name: TypeMeta, type: k8s.io/apimachinery/pkg/apis/meta/v1.TypeMeta, inline: true }
      - { name: Size, type: int }
kinds:
  - { apiVersion: widgets.example.com/v1, kind: Widget, type: example.com/widgets/v1.Widget }
"#,
    );
    let manifest = write(
        dir.path(),
        "widget.yaml",
        "apiVersion: widgets.example.com/v1\nkind: Widget\nsize: 2\n",
    );

    let without = deyaml(&["generate", manifest.to_str().unwrap()]);
    assert!(!without.status.success());

    let with = deyaml(&[
        "generate",
        manifest.to_str().unwrap(),
        "--schema",
        schema.to_str().unwrap(),
    ]);
    assert!(with.status.success(), "stderr: {}", stderr(&with));
    let source = stdout(&with);
    // Shares the v1 segment with meta/v1
    assert!(source.contains("\twidgetsv1 \"example.com/widgets/v1\"\n"));
    assert!(source.contains("&widgetsv1.Widget{"));
    assert!(source
        .lines()
        .any(|line| line.trim_start().starts_with("Size:") && line.ends_with(" 2,")));
}

#[test]
fn test_missing_input_fails() {
    let output = deyaml(&["generate", "/nonexistent/deyaml/input.yaml"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Error: "));
}
