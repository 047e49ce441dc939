//! Namespace collection
//!
//! Walks a value graph and records the namespace of every type the printed
//! literal will mention, so the emitter can build the import table.

use std::collections::{BTreeSet, HashSet};

use crate::model::{Kind, SlotId, ValueRef};
use crate::{log_op_end, log_op_start};

/// Collect the namespaces referenced by the present parts of `values`
///
/// Absent values (see [`ValueRef::is_absent`]) contribute nothing. Every heap
/// slot is walked at most once, so cyclic graphs terminate.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use deyaml_core::collect::collect;
/// use deyaml_core::model::{Builtin, Graph, TypeTable, Value};
///
/// let mut types = TypeTable::new();
/// let int = types.builtin(Builtin::Int);
/// let mut graph = Graph::new(Arc::new(types));
/// graph.set_root(int, Value::Int(42));
///
/// assert!(collect(graph.root()).is_empty());
/// ```
pub fn collect<'g>(values: impl IntoIterator<Item = ValueRef<'g>>) -> BTreeSet<String> {
    log_op_start!("collect");
    let start = std::time::Instant::now();

    let mut collector = Collector::default();
    for value in values {
        collector.visit(value);
    }

    log_op_end!(
        "collect",
        duration_ms = start.elapsed().as_millis() as u64,
        namespace_count = collector.namespaces.len()
    );
    collector.namespaces
}

#[derive(Default)]
struct Collector {
    namespaces: BTreeSet<String>,
    seen_slots: HashSet<SlotId>,
}

impl Collector {
    fn visit(&mut self, value: ValueRef<'_>) {
        if value.is_absent() {
            return;
        }
        let types = value.types();
        types.namespaces_in(value.ty(), &mut self.namespaces);

        match value.kind() {
            Kind::Pointer {
                target: Some(slot), ..
            } => {
                if self.seen_slots.insert(slot) {
                    if let Some(pointee) = value.deref() {
                        self.visit(pointee);
                    }
                }
            }
            Kind::Interface { .. } => {
                if let Some(dynamic) = value.dynamic() {
                    self.visit(dynamic);
                }
            }
            Kind::Struct { .. } => {
                for (_, field) in value.fields() {
                    self.visit(field);
                }
            }
            Kind::Map {
                key,
                value: elem,
                entries: Some(entries),
            } => {
                if !entries.is_empty() {
                    types.namespaces_in(key, &mut self.namespaces);
                    types.namespaces_in(elem, &mut self.namespaces);
                }
                for (k, v) in value.entries() {
                    self.visit(k);
                    self.visit(v);
                }
            }
            Kind::Slice {
                elem,
                items: Some(items),
            } => {
                if !items.is_empty() {
                    types.namespaces_in(elem, &mut self.namespaces);
                }
                for item in value.elements() {
                    self.visit(item);
                }
            }
            Kind::Array { elem, items } => {
                if !items.is_empty() {
                    types.namespaces_in(elem, &mut self.namespaces);
                }
                for item in value.elements() {
                    self.visit(item);
                }
            }
            _ => {}
        }
    }
}
