use std::sync::Arc;

use deyaml_core::model::{Builtin, Field, Graph, SlotId, TypeId, TypeKind, TypeTable, Value};
use deyaml_core::{render, resolve, AliasTable};

pub const WIDGET_A: &str = "a/b/widget";
pub const WIDGET_C: &str = "c/d/widget";
pub const GRAPH_NS: &str = "example.com/graph";

/// Ids of the fixture types built by [`fixture_types`]
#[allow(dead_code)]
pub struct Fixture {
    pub int: TypeId,
    pub string: TypeId,
    pub any: TypeId,
    /// `widget.Gear{Name string, Teeth int, Tags map[string]string}` in a/b/widget
    pub gear: TypeId,
    /// `widget.Gear{Label string}` in c/d/widget
    pub other_gear: TypeId,
    /// `graph.Node{Name string, Next *graph.Node}`
    pub node: TypeId,
    pub node_ptr: TypeId,
    /// `graph.Pair{Left *graph.Node, Right *graph.Node}`
    pub pair: TypeId,
}

/// Build the shared fixture type table
#[allow(dead_code)]
pub fn fixture_types() -> (TypeTable, Fixture) {
    let mut types = TypeTable::new();
    let int = types.builtin(Builtin::Int);
    let string = types.builtin(Builtin::String);
    let any = types.empty_interface();
    let tags = types.map_of(string, string);

    let gear = types
        .named_type(
            WIDGET_A,
            "Gear",
            TypeKind::Struct {
                fields: vec![
                    Field::new("Name", "name", string),
                    Field::new("Teeth", "teeth", int),
                    Field::new("Tags", "tags", tags),
                ],
            },
        )
        .unwrap();
    let other_gear = types
        .named_type(
            WIDGET_C,
            "Gear",
            TypeKind::Struct {
                fields: vec![Field::new("Label", "label", string)],
            },
        )
        .unwrap();

    let node = types.declare(GRAPH_NS, "Node").unwrap();
    let node_ptr = types.pointer_to(node);
    types.define(
        node,
        TypeKind::Struct {
            fields: vec![
                Field::new("Name", "name", string),
                Field::new("Next", "next", node_ptr),
            ],
        },
    );
    let pair = types
        .named_type(
            GRAPH_NS,
            "Pair",
            TypeKind::Struct {
                fields: vec![
                    Field::new("Left", "left", node_ptr),
                    Field::new("Right", "right", node_ptr),
                ],
            },
        )
        .unwrap();

    (
        types,
        Fixture {
            int,
            string,
            any,
            gear,
            other_gear,
            node,
            node_ptr,
            pair,
        },
    )
}

/// Allocate a node slot with the given name and successor
#[allow(dead_code)]
pub fn alloc_node(graph: &mut Graph, fx: &Fixture, name: &str, next: Option<SlotId>) -> SlotId {
    graph.alloc(
        fx.node,
        Value::Struct(vec![Value::Str(name.to_string()), Value::Pointer(next)]),
    )
}

/// Graph whose root is `&a` where `a.Next = &b` and `b.Next = &a`
#[allow(dead_code)]
pub fn two_cycle_graph() -> Graph {
    let (types, fx) = fixture_types();
    let mut graph = Graph::new(Arc::new(types));
    let a = alloc_node(&mut graph, &fx, "a", None);
    let b = alloc_node(&mut graph, &fx, "b", Some(a));
    graph.slot_mut(a).value = Value::Struct(vec![Value::Str("a".into()), Value::Pointer(Some(b))]);
    graph.set_root(fx.node_ptr, Value::Pointer(Some(a)));
    graph
}

/// Render the root of a graph with aliases resolved from its namespaces
#[allow(dead_code)]
pub fn render_root(graph: &Graph) -> String {
    let aliases = resolve(deyaml_core::collect(graph.root()));
    render(graph.root().unwrap(), &aliases)
}

/// Render the root of a graph without any aliases
#[allow(dead_code)]
pub fn render_plain(graph: &Graph) -> String {
    render(graph.root().unwrap(), &AliasTable::default())
}

/// `Some(())` when `{}`, `()` and `[]` balance outside string literals
#[allow(dead_code)]
pub fn balance(text: &str) -> Option<()> {
    let mut stack = Vec::new();
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => loop {
                match chars.next()? {
                    '\\' => {
                        chars.next()?;
                    }
                    '"' => break,
                    _ => {}
                }
            },
            '{' | '(' | '[' => stack.push(c),
            '}' => (stack.pop()? == '{').then_some(())?,
            ')' => (stack.pop()? == '(').then_some(())?,
            ']' => (stack.pop()? == '[').then_some(())?,
            _ => {}
        }
    }
    stack.is_empty().then_some(())
}
