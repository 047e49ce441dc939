//! Value graph arena
//!
//! A [`Graph`] owns every value reachable from its root. References between
//! values go through heap [`Slot`]s, so a `Value::Pointer` is an index into the
//! arena rather than a Rust reference. That makes self-referential graphs
//! representable and gives each addressable aggregate a stable identity.

use std::sync::Arc;

use super::types::{ScalarClass, TypeId, TypeKind, TypeTable};
use super::view::ValueRef;

/// Index of a heap slot inside a [`Graph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub(crate) usize);

impl SlotId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A runtime value; its shape is interpreted through a [`TypeId`]
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Complex(f64, f64),
    Str(String),
    /// Field values in declaration order
    Struct(Vec<Value>),
    /// `None` is a nil map; entries keep decode order
    Map(Option<Vec<(Value, Value)>>),
    /// `None` is a nil slice
    Slice(Option<Vec<Value>>),
    Array(Vec<Value>),
    Pointer(Option<SlotId>),
    /// Variant slot holding a value of some concrete type
    Interface(Option<Box<Dynamic>>),
    /// `true` when the function value is non-nil
    Func(bool),
    OpaquePointer(u64),
}

/// A value paired with its concrete type
#[derive(Debug, Clone, PartialEq)]
pub struct Dynamic {
    pub ty: TypeId,
    pub value: Value,
}

impl Dynamic {
    pub fn new(ty: TypeId, value: Value) -> Self {
        Self { ty, value }
    }
}

/// Heap cell holding an addressable value
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub ty: TypeId,
    pub value: Value,
}

impl Value {
    /// The zero value of a type
    pub fn zero(types: &TypeTable, ty: TypeId) -> Value {
        match &types.get(ty).kind {
            TypeKind::Scalar(builtin) => match builtin.class() {
                ScalarClass::Bool => Value::Bool(false),
                ScalarClass::Signed => Value::Int(0),
                ScalarClass::Unsigned => Value::Uint(0),
                ScalarClass::Float => Value::Float(0.0),
                ScalarClass::Complex => Value::Complex(0.0, 0.0),
                ScalarClass::String => Value::Str(String::new()),
            },
            TypeKind::Struct { fields } => {
                Value::Struct(fields.iter().map(|f| Value::zero(types, f.ty)).collect())
            }
            TypeKind::Map { .. } => Value::Map(None),
            TypeKind::Slice { .. } => Value::Slice(None),
            TypeKind::Array { elem, len } => {
                Value::Array((0..*len).map(|_| Value::zero(types, *elem)).collect())
            }
            TypeKind::Pointer { .. } => Value::Pointer(None),
            TypeKind::Interface { .. } => Value::Interface(None),
            TypeKind::Func => Value::Func(false),
            TypeKind::OpaquePointer => Value::OpaquePointer(0),
        }
    }

    /// Wrap a value into a variant slot
    pub fn dynamic(ty: TypeId, value: Value) -> Value {
        Value::Interface(Some(Box::new(Dynamic::new(ty, value))))
    }
}

/// An object graph: shared type table, heap slots and a typed root
#[derive(Debug, Clone)]
pub struct Graph {
    types: Arc<TypeTable>,
    slots: Vec<Slot>,
    root: Option<Dynamic>,
}

impl Graph {
    pub fn new(types: Arc<TypeTable>) -> Self {
        Self {
            types,
            slots: Vec::new(),
            root: None,
        }
    }

    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    /// Shared handle to the type table
    pub fn type_table(&self) -> Arc<TypeTable> {
        Arc::clone(&self.types)
    }

    /// Allocate a heap slot and return its id
    pub fn alloc(&mut self, ty: TypeId, value: Value) -> SlotId {
        let id = SlotId(self.slots.len());
        self.slots.push(Slot { ty, value });
        id
    }

    /// # Panics
    ///
    /// Panics if `id` was allocated by a different graph.
    pub fn slot(&self, id: SlotId) -> &Slot {
        &self.slots[id.0]
    }

    /// # Panics
    ///
    /// Panics if `id` was allocated by a different graph.
    pub fn slot_mut(&mut self, id: SlotId) -> &mut Slot {
        &mut self.slots[id.0]
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn set_root(&mut self, ty: TypeId, value: Value) {
        self.root = Some(Dynamic::new(ty, value));
    }

    /// Reflective view of the root, if one is set
    pub fn root(&self) -> Option<ValueRef<'_>> {
        self.root
            .as_ref()
            .map(|root| ValueRef::new(self, root.ty, &root.value, None))
    }

    /// Reflective view of an arbitrary value owned by the caller
    pub fn view<'g>(&'g self, ty: TypeId, value: &'g Value) -> ValueRef<'g> {
        ValueRef::new(self, ty, value, None)
    }

    /// Addressable view of a slot's value
    pub fn slot_ref(&self, id: SlotId) -> ValueRef<'_> {
        let slot = self.slot(id);
        ValueRef::new(self, slot.ty, &slot.value, Some(id))
    }
}
