//! Structural value printer
//!
//! Renders a [`ValueRef`] as a Go composite literal:
//! - scalars as Go literals, typed where the context needs it (`int32(3)`)
//! - aggregates, maps and sequences as `TypeName{...}`, inline or expanded
//! - references as `&value`, nil references as `(TypeName)(nil)`
//! - re-entered aggregates as a quoted cyclic reference sentinel
//!
//! Absent (zero) fields are left out, so an all-zero aggregate prints as
//! `TypeName{}`.

mod layout;
pub mod literal;
mod printer;

pub use printer::{Printer, CYCLE_MARKER, DEFAULT_MAX_DEPTH, DEPTH_EXCEEDED};

use crate::alias::AliasTable;
use crate::model::ValueRef;

/// Render a value with the default depth ceiling
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use deyaml_core::alias::AliasTable;
/// use deyaml_core::model::{Builtin, Graph, TypeTable, Value};
/// use deyaml_core::render::render;
///
/// let mut types = TypeTable::new();
/// let int = types.builtin(Builtin::Int);
/// let ints = types.slice_of(int);
/// let mut graph = Graph::new(Arc::new(types));
/// graph.set_root(ints, Value::Slice(Some(vec![Value::Int(1), Value::Int(2), Value::Int(3)])));
///
/// let out = render(graph.root().unwrap(), &AliasTable::default());
/// assert_eq!(out, "[]int{1, 2, 3}");
/// ```
pub fn render(value: ValueRef<'_>, aliases: &AliasTable) -> String {
    Printer::new(aliases).render(value)
}
