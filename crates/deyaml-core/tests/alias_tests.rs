#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::collections::{BTreeMap, BTreeSet};

use common::{WIDGET_A, WIDGET_C};
use deyaml_core::model::last_segment;
use deyaml_core::resolve;
use proptest::prelude::*;

#[test]
fn test_colliding_trailing_segments_use_last_two_segments() {
    let aliases = resolve([WIDGET_A, WIDGET_C]);

    assert_eq!(aliases.get(WIDGET_A), Some("bwidget"));
    assert_eq!(aliases.get(WIDGET_C), Some("dwidget"));
}

#[test]
fn test_unique_trailing_segment_needs_no_alias() {
    let aliases = resolve(["k8s.io/api/apps/v1", "k8s.io/apimachinery/pkg/util/intstr"]);

    assert_eq!(aliases.get("k8s.io/apimachinery/pkg/util/intstr"), Some(""));
    assert_eq!(aliases.alias("k8s.io/apimachinery/pkg/util/intstr"), None);
    assert_eq!(aliases.aliased_count(), 0);
}

#[test]
fn test_equal_two_segment_aliases_are_widened() {
    let aliases = resolve(["a/x/widget", "b/x/widget"]);

    assert_eq!(aliases.get("a/x/widget"), Some("axwidget"));
    assert_eq!(aliases.get("b/x/widget"), Some("bxwidget"));
}

#[test]
fn test_empty_input_gives_empty_table() {
    let aliases = resolve(Vec::<String>::new());
    assert!(aliases.is_empty());
}

#[test]
fn test_duplicates_in_input_are_ignored() {
    let aliases = resolve([WIDGET_A, WIDGET_A, WIDGET_C]);
    assert_eq!(aliases.len(), 2);
}

#[test]
fn test_alias_table_serializes_as_object() {
    let aliases = resolve([WIDGET_A, WIDGET_C, "k8s.io/api/core/v1"]);
    let json = serde_json::to_value(&aliases).unwrap();

    assert_eq!(json["a/b/widget"], "bwidget");
    assert_eq!(json["k8s.io/api/core/v1"], "");
}

fn arb_namespace() -> impl Strategy<Value = String> {
    proptest::collection::vec("[ab1.]{1,2}", 1..4).prop_map(|segments| segments.join("/"))
}

proptest! {
    #[test]
    fn non_empty_aliases_are_unique(
        namespaces in proptest::collection::vec(arb_namespace(), 0..12),
    ) {
        let aliases = resolve(&namespaces);
        let mut seen = BTreeSet::new();
        for (namespace, alias) in aliases.iter() {
            if !alias.is_empty() {
                prop_assert!(seen.insert(alias.to_string()),
                    "alias {} reused for {}", alias, namespace);
            }
        }
        for (namespace, alias) in aliases.iter() {
            if alias.is_empty() {
                let name = aliases.import_name(namespace);
                prop_assert!(!seen.contains(&name),
                    "alias shadows import name {} of {}", name, namespace);
            }
        }
    }

    #[test]
    fn aliased_iff_trailing_segment_is_shared(
        namespaces in proptest::collection::vec(arb_namespace(), 0..12),
    ) {
        let aliases = resolve(&namespaces);
        let mut group_sizes: BTreeMap<&str, usize> = BTreeMap::new();
        for (namespace, _) in aliases.iter() {
            *group_sizes.entry(last_segment(namespace)).or_default() += 1;
        }
        for (namespace, alias) in aliases.iter() {
            let shared = group_sizes[last_segment(namespace)] >= 2;
            prop_assert_eq!(!alias.is_empty(), shared, "namespace {}", namespace);
        }
    }

    #[test]
    fn resolution_ignores_input_order(
        namespaces in proptest::collection::vec(arb_namespace(), 0..12),
    ) {
        let forward = resolve(&namespaces);
        let mut reversed = namespaces.clone();
        reversed.reverse();
        prop_assert_eq!(forward, resolve(&reversed));
    }
}
