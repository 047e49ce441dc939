//! Type descriptor table
//!
//! Rust has no runtime reflection, so every type a value graph can hold is
//! described up front in a [`TypeTable`]. Descriptors are addressed by
//! [`TypeId`]; named types are declared first and defined later so that
//! self-referential types (`Node{Next *Node}`) can be expressed.

use std::collections::{BTreeSet, HashMap};

use crate::errors::{DeyamlError, Result};

/// Index of a type descriptor inside a [`TypeTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) usize);

impl TypeId {
    /// Position of the descriptor in its table
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Built-in scalar types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
}

/// Value class shared by several builtins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarClass {
    Bool,
    Signed,
    Unsigned,
    Float,
    Complex,
    String,
}

impl Builtin {
    pub const ALL: [Builtin; 17] = [
        Builtin::Bool,
        Builtin::Int,
        Builtin::Int8,
        Builtin::Int16,
        Builtin::Int32,
        Builtin::Int64,
        Builtin::Uint,
        Builtin::Uint8,
        Builtin::Uint16,
        Builtin::Uint32,
        Builtin::Uint64,
        Builtin::Uintptr,
        Builtin::Float32,
        Builtin::Float64,
        Builtin::Complex64,
        Builtin::Complex128,
        Builtin::String,
    ];

    /// Go spelling of the type
    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Bool => "bool",
            Builtin::Int => "int",
            Builtin::Int8 => "int8",
            Builtin::Int16 => "int16",
            Builtin::Int32 => "int32",
            Builtin::Int64 => "int64",
            Builtin::Uint => "uint",
            Builtin::Uint8 => "uint8",
            Builtin::Uint16 => "uint16",
            Builtin::Uint32 => "uint32",
            Builtin::Uint64 => "uint64",
            Builtin::Uintptr => "uintptr",
            Builtin::Float32 => "float32",
            Builtin::Float64 => "float64",
            Builtin::Complex64 => "complex64",
            Builtin::Complex128 => "complex128",
            Builtin::String => "string",
        }
    }

    /// Parse a builtin name, accepting the `byte` and `rune` aliases
    pub fn parse(name: &str) -> Option<Builtin> {
        match name {
            "byte" => Some(Builtin::Uint8),
            "rune" => Some(Builtin::Int32),
            _ => Builtin::ALL.iter().copied().find(|b| b.name() == name),
        }
    }

    pub fn class(&self) -> ScalarClass {
        match self {
            Builtin::Bool => ScalarClass::Bool,
            Builtin::Int | Builtin::Int8 | Builtin::Int16 | Builtin::Int32 | Builtin::Int64 => {
                ScalarClass::Signed
            }
            Builtin::Uint
            | Builtin::Uint8
            | Builtin::Uint16
            | Builtin::Uint32
            | Builtin::Uint64
            | Builtin::Uintptr => ScalarClass::Unsigned,
            Builtin::Float32 | Builtin::Float64 => ScalarClass::Float,
            Builtin::Complex64 | Builtin::Complex128 => ScalarClass::Complex,
            Builtin::String => ScalarClass::String,
        }
    }

    /// Bit width for numeric builtins (`int`/`uint`/`uintptr` are 64-bit)
    pub fn bits(&self) -> u32 {
        match self {
            Builtin::Int8 | Builtin::Uint8 => 8,
            Builtin::Int16 | Builtin::Uint16 => 16,
            Builtin::Int32 | Builtin::Uint32 | Builtin::Float32 => 32,
            Builtin::Complex64 => 64,
            Builtin::Complex128 => 128,
            Builtin::Bool | Builtin::String => 0,
            _ => 64,
        }
    }
}

/// A struct field descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Field name as printed in literals
    pub name: String,
    /// Serialized key the decoder matches against
    pub key: String,
    pub ty: TypeId,
    /// Embedded field whose keys live in the parent mapping
    pub inline: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, key: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            ty,
            inline: false,
        }
    }

    pub fn inline(mut self) -> Self {
        self.inline = true;
        self
    }
}

/// The closed set of shapes a type can have
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Scalar(Builtin),
    Struct { fields: Vec<Field> },
    Map { key: TypeId, value: TypeId },
    Slice { elem: TypeId },
    Array { elem: TypeId, len: usize },
    Pointer { elem: TypeId },
    /// Variant slot; `required` slots print `Type(nil)` when unset
    Interface { required: bool },
    Func,
    OpaquePointer,
}

/// A type descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDesc {
    /// Declared name; `None` for unnamed composites such as `[]T`
    pub name: Option<String>,
    /// Declaring namespace; `None` for builtins and unnamed composites
    pub namespace: Option<String>,
    pub kind: TypeKind,
}

impl TypeDesc {
    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }
}

/// Structural key used to intern unnamed composite types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CompositeKey {
    Pointer(TypeId),
    Slice(TypeId),
    Array(TypeId, usize),
    Map(TypeId, TypeId),
    Interface,
    Func,
}

/// Registry of all type descriptors reachable from a value graph
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    types: Vec<TypeDesc>,
    named: HashMap<(Option<String>, String), TypeId>,
    composites: HashMap<CompositeKey, TypeId>,
}

/// Trailing `/`-separated segment of a namespace
pub fn last_segment(namespace: &str) -> &str {
    namespace.rsplit('/').next().unwrap_or(namespace)
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of descriptors in the table
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Get a descriptor by id
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a different table.
    pub fn get(&self, id: TypeId) -> &TypeDesc {
        &self.types[id.0]
    }

    fn push(&mut self, desc: TypeDesc) -> TypeId {
        let id = TypeId(self.types.len());
        self.types.push(desc);
        id
    }

    fn intern(&mut self, key: CompositeKey, kind: TypeKind) -> TypeId {
        if let Some(&id) = self.composites.get(&key) {
            return id;
        }
        let id = self.push(TypeDesc {
            name: None,
            namespace: None,
            kind,
        });
        self.composites.insert(key, id);
        id
    }

    /// Get (or register) a builtin scalar type
    pub fn builtin(&mut self, builtin: Builtin) -> TypeId {
        let key = (None, builtin.name().to_string());
        if let Some(&id) = self.named.get(&key) {
            return id;
        }
        let id = self.push(TypeDesc {
            name: Some(builtin.name().to_string()),
            namespace: None,
            kind: TypeKind::Scalar(builtin),
        });
        self.named.insert(key, id);
        id
    }

    pub fn pointer_to(&mut self, elem: TypeId) -> TypeId {
        self.intern(CompositeKey::Pointer(elem), TypeKind::Pointer { elem })
    }

    pub fn slice_of(&mut self, elem: TypeId) -> TypeId {
        self.intern(CompositeKey::Slice(elem), TypeKind::Slice { elem })
    }

    pub fn array_of(&mut self, elem: TypeId, len: usize) -> TypeId {
        self.intern(CompositeKey::Array(elem, len), TypeKind::Array { elem, len })
    }

    pub fn map_of(&mut self, key: TypeId, value: TypeId) -> TypeId {
        self.intern(CompositeKey::Map(key, value), TypeKind::Map { key, value })
    }

    /// The unnamed `interface{}` type
    pub fn empty_interface(&mut self) -> TypeId {
        self.intern(
            CompositeKey::Interface,
            TypeKind::Interface { required: false },
        )
    }

    /// The unnamed `func()` type
    pub fn func_type(&mut self) -> TypeId {
        self.intern(CompositeKey::Func, TypeKind::Func)
    }

    /// The `unsafe.Pointer` type
    pub fn opaque_pointer(&mut self) -> TypeId {
        if let Some(id) = self.named("unsafe", "Pointer") {
            return id;
        }
        let id = self.push(TypeDesc {
            name: Some("Pointer".to_string()),
            namespace: Some("unsafe".to_string()),
            kind: TypeKind::OpaquePointer,
        });
        self.named
            .insert((Some("unsafe".to_string()), "Pointer".to_string()), id);
        id
    }

    /// Reserve a named type so it can be referenced before it is defined
    ///
    /// The descriptor starts as an empty struct until [`define`](Self::define)
    /// replaces its kind.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateType` if the name is already declared.
    pub fn declare(&mut self, namespace: &str, name: &str) -> Result<TypeId> {
        let key = (Some(namespace.to_string()), name.to_string());
        if self.named.contains_key(&key) {
            return Err(DeyamlError::DuplicateType {
                name: format!("{}.{}", namespace, name),
            });
        }
        let id = self.push(TypeDesc {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            kind: TypeKind::Struct { fields: Vec::new() },
        });
        self.named.insert(key, id);
        Ok(id)
    }

    /// Set the shape of a declared type
    pub fn define(&mut self, id: TypeId, kind: TypeKind) {
        self.types[id.0].kind = kind;
    }

    /// Declare and define a named type in one step
    ///
    /// # Errors
    ///
    /// Returns `DuplicateType` if the name is already declared.
    pub fn named_type(&mut self, namespace: &str, name: &str, kind: TypeKind) -> Result<TypeId> {
        let id = self.declare(namespace, name)?;
        self.define(id, kind);
        Ok(id)
    }

    /// Look up a named type
    pub fn named(&self, namespace: &str, name: &str) -> Option<TypeId> {
        self.named
            .get(&(Some(namespace.to_string()), name.to_string()))
            .copied()
    }

    /// Look up a named type by its `namespace.Name` spelling
    ///
    /// # Errors
    ///
    /// Returns `UnknownType` if no such type is declared.
    pub fn resolve_qualified(&self, qualified: &str) -> Result<TypeId> {
        let unknown = || DeyamlError::UnknownType {
            name: qualified.to_string(),
        };
        let slash = qualified.rfind('/').map(|i| i + 1).unwrap_or(0);
        let dot = qualified[slash..]
            .rfind('.')
            .map(|i| slash + i)
            .ok_or_else(unknown)?;
        self.named(&qualified[..dot], &qualified[dot + 1..])
            .ok_or_else(unknown)
    }

    /// Go-style type string without aliasing (`*v1.Pod`, `map[string]int`)
    pub fn display_name(&self, id: TypeId) -> String {
        let desc = self.get(id);
        match (&desc.name, &desc.namespace) {
            (Some(name), Some(namespace)) => format!("{}.{}", last_segment(namespace), name),
            (Some(name), None) => name.clone(),
            (None, _) => match &desc.kind {
                TypeKind::Pointer { elem } => format!("*{}", self.display_name(*elem)),
                TypeKind::Slice { elem } => format!("[]{}", self.display_name(*elem)),
                TypeKind::Array { elem, len } => format!("[{}]{}", len, self.display_name(*elem)),
                TypeKind::Map { key, value } => format!(
                    "map[{}]{}",
                    self.display_name(*key),
                    self.display_name(*value)
                ),
                TypeKind::Interface { .. } => "interface {}".to_string(),
                TypeKind::Func => "func()".to_string(),
                TypeKind::OpaquePointer => "unsafe.Pointer".to_string(),
                TypeKind::Scalar(builtin) => builtin.name().to_string(),
                TypeKind::Struct { .. } => "struct {...}".to_string(),
            },
        }
    }

    /// Add every namespace a type expression mentions
    ///
    /// Named types contribute their own namespace and stop; unnamed
    /// composites contribute the namespaces of their components.
    pub fn namespaces_in(&self, id: TypeId, out: &mut BTreeSet<String>) {
        let desc = self.get(id);
        if desc.is_named() {
            if let Some(namespace) = &desc.namespace {
                out.insert(namespace.clone());
            }
            return;
        }
        match &desc.kind {
            TypeKind::Pointer { elem }
            | TypeKind::Slice { elem }
            | TypeKind::Array { elem, .. } => self.namespaces_in(*elem, out),
            TypeKind::Map { key, value } => {
                self.namespaces_in(*key, out);
                self.namespaces_in(*value, out);
            }
            _ => {}
        }
    }
}
