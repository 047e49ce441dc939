use std::path::PathBuf;

use deyaml_core::model::{Graph, ValueRef};
use deyaml_decode::{Decoder, Scheme};

#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

#[allow(dead_code)]
pub fn fixture(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

#[allow(dead_code)]
pub fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture(name)).expect("fixture should be readable")
}

/// The embedded Kubernetes scheme
#[allow(dead_code)]
pub fn kubernetes() -> Scheme {
    Scheme::kubernetes().expect("embedded scheme should build")
}

/// Decode a fixture under the embedded scheme
#[allow(dead_code)]
pub fn decode_fixture(name: &str) -> Graph {
    let scheme = kubernetes();
    Decoder::new(&scheme)
        .decode_str(&read_fixture(name))
        .expect("fixture should decode")
}

/// The decoded objects behind the root `[]runtime.Object`
#[allow(dead_code)]
pub fn objects(graph: &Graph) -> Vec<ValueRef<'_>> {
    let root = graph.root().expect("graph should have a root");
    root.elements()
        .into_iter()
        .map(|element| {
            element
                .dynamic()
                .and_then(|pointer| pointer.deref())
                .expect("root element should point at an object")
        })
        .collect()
}

/// Follow a chain of field names through structs, pointers and variants
#[allow(dead_code)]
pub fn field<'g>(value: ValueRef<'g>, path: &[&str]) -> ValueRef<'g> {
    let mut current = value;
    for name in path {
        let mut target = current.unwrap_variant();
        while let Some(pointee) = target.deref() {
            target = pointee;
        }
        current = target
            .fields()
            .into_iter()
            .find(|(f, _)| f.name == *name)
            .map(|(_, v)| v)
            .unwrap_or_else(|| panic!("no field {name}"));
    }
    current
}
