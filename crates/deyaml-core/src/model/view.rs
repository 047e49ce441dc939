//! Reflective view over a value graph
//!
//! [`ValueRef`] pairs a type descriptor with a borrowed value and exposes a
//! closed [`Kind`] enum to dispatch on. Consumers never match on
//! [`Value`](super::Value) directly: a value whose variant disagrees with its
//! descriptor surfaces as [`Kind::Malformed`] instead of a panic.

use super::types::{Field, ScalarClass, TypeDesc, TypeId, TypeKind, TypeTable};
use super::value::{Dynamic, Graph, SlotId, Value};

/// The shape of a value as seen through its descriptor
#[derive(Debug, Clone, Copy)]
pub enum Kind<'g> {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float {
        value: f64,
        single: bool,
    },
    Complex {
        re: f64,
        im: f64,
        single: bool,
    },
    Str(&'g str),
    Struct {
        fields: &'g [Field],
        values: &'g [Value],
    },
    Map {
        key: TypeId,
        value: TypeId,
        entries: Option<&'g [(Value, Value)]>,
    },
    Slice {
        elem: TypeId,
        items: Option<&'g [Value]>,
    },
    Array {
        elem: TypeId,
        items: &'g [Value],
    },
    Pointer {
        elem: TypeId,
        target: Option<SlotId>,
    },
    Interface {
        dynamic: Option<&'g Dynamic>,
        required: bool,
    },
    Func {
        nil: bool,
    },
    OpaquePointer(u64),
    /// The value variant does not match the descriptor
    Malformed,
}

/// A typed, borrowed view of one value in a [`Graph`]
#[derive(Debug, Clone, Copy)]
pub struct ValueRef<'g> {
    graph: &'g Graph,
    ty: TypeId,
    value: &'g Value,
    addr: Option<SlotId>,
}

impl<'g> ValueRef<'g> {
    pub(crate) fn new(
        graph: &'g Graph,
        ty: TypeId,
        value: &'g Value,
        addr: Option<SlotId>,
    ) -> Self {
        Self {
            graph,
            ty,
            value,
            addr,
        }
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    pub fn types(&self) -> &'g TypeTable {
        self.graph.types()
    }

    pub fn ty(&self) -> TypeId {
        self.ty
    }

    pub fn desc(&self) -> &'g TypeDesc {
        self.graph.types().get(self.ty)
    }

    pub fn value(&self) -> &'g Value {
        self.value
    }

    /// Slot that holds this value, when it lives inside a heap slot
    pub fn addr(&self) -> Option<SlotId> {
        self.addr
    }

    pub fn kind(&self) -> Kind<'g> {
        let desc = self.desc();
        match (&desc.kind, self.value) {
            (TypeKind::Scalar(builtin), value) => match (builtin.class(), value) {
                (ScalarClass::Bool, Value::Bool(b)) => Kind::Bool(*b),
                (ScalarClass::Signed, Value::Int(i)) => Kind::Int(*i),
                (ScalarClass::Unsigned, Value::Uint(u)) => Kind::Uint(*u),
                (ScalarClass::Float, Value::Float(f)) => Kind::Float {
                    value: *f,
                    single: builtin.bits() == 32,
                },
                (ScalarClass::Complex, Value::Complex(re, im)) => Kind::Complex {
                    re: *re,
                    im: *im,
                    single: builtin.bits() == 64,
                },
                (ScalarClass::String, Value::Str(s)) => Kind::Str(s),
                _ => Kind::Malformed,
            },
            (TypeKind::Struct { fields }, Value::Struct(values)) if fields.len() == values.len() => {
                Kind::Struct { fields, values }
            }
            (TypeKind::Map { key, value }, Value::Map(entries)) => Kind::Map {
                key: *key,
                value: *value,
                entries: entries.as_deref(),
            },
            (TypeKind::Slice { elem }, Value::Slice(items)) => Kind::Slice {
                elem: *elem,
                items: items.as_deref(),
            },
            (TypeKind::Array { elem, len }, Value::Array(items)) if items.len() == *len => {
                Kind::Array { elem: *elem, items }
            }
            (TypeKind::Pointer { elem }, Value::Pointer(target)) => match target {
                Some(slot) if slot.0 >= self.graph.slot_count() => Kind::Malformed,
                _ => Kind::Pointer {
                    elem: *elem,
                    target: *target,
                },
            },
            (TypeKind::Interface { required }, Value::Interface(dynamic)) => Kind::Interface {
                dynamic: dynamic.as_deref(),
                required: *required,
            },
            (TypeKind::Func, Value::Func(non_nil)) => Kind::Func { nil: !non_nil },
            (TypeKind::OpaquePointer, Value::OpaquePointer(addr)) => Kind::OpaquePointer(*addr),
            _ => Kind::Malformed,
        }
    }

    /// View of a value stored inline in this one (field or element)
    fn child(&self, ty: TypeId, value: &'g Value) -> ValueRef<'g> {
        ValueRef::new(self.graph, ty, value, self.addr)
    }

    /// Struct fields paired with their values; empty for other kinds
    pub fn fields(&self) -> Vec<(&'g Field, ValueRef<'g>)> {
        match self.kind() {
            Kind::Struct { fields, values } => fields
                .iter()
                .zip(values.iter())
                .map(|(field, value)| (field, self.child(field.ty, value)))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Slice or array elements; empty for other kinds
    pub fn elements(&self) -> Vec<ValueRef<'g>> {
        let (elem, items) = match self.kind() {
            Kind::Slice {
                elem,
                items: Some(items),
            } => (elem, items),
            Kind::Array { elem, items } => (elem, items),
            _ => return Vec::new(),
        };
        items.iter().map(|item| self.child(elem, item)).collect()
    }

    /// Map entries in stored order; map entries are never addressable
    pub fn entries(&self) -> Vec<(ValueRef<'g>, ValueRef<'g>)> {
        match self.kind() {
            Kind::Map {
                key,
                value,
                entries: Some(entries),
            } => entries
                .iter()
                .map(|(k, v)| {
                    (
                        ValueRef::new(self.graph, key, k, None),
                        ValueRef::new(self.graph, value, v, None),
                    )
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Follow a non-nil pointer to its slot
    pub fn deref(&self) -> Option<ValueRef<'g>> {
        match self.kind() {
            Kind::Pointer {
                target: Some(slot), ..
            } => Some(self.graph.slot_ref(slot)),
            _ => None,
        }
    }

    /// Concrete value held by a non-empty variant slot
    pub fn dynamic(&self) -> Option<ValueRef<'g>> {
        match self.kind() {
            Kind::Interface {
                dynamic: Some(dynamic),
                ..
            } => Some(ValueRef::new(self.graph, dynamic.ty, &dynamic.value, None)),
            _ => None,
        }
    }

    /// The concrete value of a non-empty variant slot, or `self`
    pub fn unwrap_variant(&self) -> ValueRef<'g> {
        self.dynamic().unwrap_or(*self)
    }

    /// Whether the value is in its zero state and is suppressed in output
    ///
    /// Aggregates are absent when every field is (variant fields are judged
    /// by their concrete value); arrays when every element is. Nil maps,
    /// slices, pointers, variant slots and functions are absent, but empty
    /// non-nil containers are present.
    pub fn is_absent(&self) -> bool {
        match self.kind() {
            Kind::Bool(b) => !b,
            Kind::Int(i) => i == 0,
            Kind::Uint(u) => u == 0,
            Kind::Float { value, .. } => value == 0.0,
            Kind::Complex { re, im, .. } => re == 0.0 && im == 0.0,
            Kind::Str(s) => s.is_empty(),
            Kind::Struct { .. } => self
                .fields()
                .iter()
                .all(|(_, value)| value.unwrap_variant().is_absent()),
            Kind::Array { .. } => self.elements().iter().all(|item| item.is_absent()),
            Kind::Map { entries, .. } => entries.is_none(),
            Kind::Slice { items, .. } => items.is_none(),
            Kind::Pointer { target, .. } => target.is_none(),
            Kind::Interface { dynamic, .. } => dynamic.is_none(),
            Kind::Func { nil } => nil,
            Kind::OpaquePointer(addr) => addr == 0,
            Kind::Malformed => false,
        }
    }
}
