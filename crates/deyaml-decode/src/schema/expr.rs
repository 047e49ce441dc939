//! Type expressions
//!
//! Schema fields name their types with Go spelling: `*int32`, `[]Container`,
//! `map[string]string`, `k8s.io/apimachinery/pkg/apis/meta/v1.ObjectMeta`.
//! A bare `Name` refers to a type in the namespace of the definition that
//! mentions it.

use std::fmt;

use deyaml_core::errors::DeyamlError;
use deyaml_core::model::{Builtin, TypeId, TypeTable};

/// Parsed type expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    Builtin(Builtin),
    Named {
        /// `None` for a bare name resolved against the enclosing namespace
        namespace: Option<String>,
        name: String,
    },
    Pointer(Box<TypeExpr>),
    Slice(Box<TypeExpr>),
    Array(usize, Box<TypeExpr>),
    Map(Box<TypeExpr>, Box<TypeExpr>),
    Interface,
    Func,
    OpaquePointer,
}

impl TypeExpr {
    /// Parse a type expression
    ///
    /// # Errors
    ///
    /// Returns `InvalidTypeExpr` naming the whole input if any part of it is
    /// malformed.
    pub fn parse(input: &str) -> Result<TypeExpr, DeyamlError> {
        parse_inner(input.trim()).map_err(|reason| DeyamlError::InvalidTypeExpr {
            expr: input.to_string(),
            reason,
        })
    }

    /// Resolve the expression to a descriptor, interning unnamed composites
    ///
    /// # Errors
    ///
    /// Returns `UnknownType` for a named type that is not declared.
    pub fn resolve(&self, types: &mut TypeTable, context: &str) -> Result<TypeId, DeyamlError> {
        match self {
            TypeExpr::Builtin(builtin) => Ok(types.builtin(*builtin)),
            TypeExpr::Named { namespace, name } => {
                let namespace = namespace.as_deref().unwrap_or(context);
                types
                    .named(namespace, name)
                    .ok_or_else(|| DeyamlError::UnknownType {
                        name: format!("{}.{}", namespace, name),
                    })
            }
            TypeExpr::Pointer(elem) => {
                let elem = elem.resolve(types, context)?;
                Ok(types.pointer_to(elem))
            }
            TypeExpr::Slice(elem) => {
                let elem = elem.resolve(types, context)?;
                Ok(types.slice_of(elem))
            }
            TypeExpr::Array(len, elem) => {
                let elem = elem.resolve(types, context)?;
                Ok(types.array_of(elem, *len))
            }
            TypeExpr::Map(key, value) => {
                let key = key.resolve(types, context)?;
                let value = value.resolve(types, context)?;
                Ok(types.map_of(key, value))
            }
            TypeExpr::Interface => Ok(types.empty_interface()),
            TypeExpr::Func => Ok(types.func_type()),
            TypeExpr::OpaquePointer => Ok(types.opaque_pointer()),
        }
    }
}

fn parse_inner(s: &str) -> Result<TypeExpr, String> {
    if s.is_empty() {
        return Err("empty type".to_string());
    }
    if let Some(rest) = s.strip_prefix('*') {
        return Ok(TypeExpr::Pointer(Box::new(parse_inner(rest)?)));
    }
    if let Some(rest) = s.strip_prefix("[]") {
        return Ok(TypeExpr::Slice(Box::new(parse_inner(rest)?)));
    }
    if let Some(rest) = s.strip_prefix('[') {
        let close = rest.find(']').ok_or("unterminated array length")?;
        let len = rest[..close]
            .trim()
            .parse::<usize>()
            .map_err(|_| format!("invalid array length '{}'", &rest[..close]))?;
        return Ok(TypeExpr::Array(len, Box::new(parse_inner(&rest[close + 1..])?)));
    }
    if let Some(rest) = s.strip_prefix("map[") {
        let close = matching_bracket(rest).ok_or("unterminated map key")?;
        let key = parse_inner(rest[..close].trim())?;
        let value = parse_inner(rest[close + 1..].trim())?;
        return Ok(TypeExpr::Map(Box::new(key), Box::new(value)));
    }
    match s {
        "interface{}" | "interface {}" => return Ok(TypeExpr::Interface),
        "func()" => return Ok(TypeExpr::Func),
        "unsafe.Pointer" => return Ok(TypeExpr::OpaquePointer),
        _ => {}
    }
    if let Some(builtin) = Builtin::parse(s) {
        return Ok(TypeExpr::Builtin(builtin));
    }
    parse_named(s)
}

/// Index of the `]` closing a `map[` whose opening bracket is already consumed
fn matching_bracket(s: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (i, c) in s.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_named(s: &str) -> Result<TypeExpr, String> {
    let slash = s.rfind('/').map(|i| i + 1).unwrap_or(0);
    let (namespace, name) = match s[slash..].rfind('.') {
        Some(dot) => (Some(&s[..slash + dot]), &s[slash + dot + 1..]),
        None if slash > 0 => return Err("qualified name has no type after the path".to_string()),
        None => (None, s),
    };
    if !is_identifier(name) {
        return Err(format!("'{}' is not a type name", name));
    }
    if let Some(namespace) = namespace {
        if namespace.is_empty() || namespace.chars().any(char::is_whitespace) {
            return Err(format!("'{}' is not a namespace", namespace));
        }
    }
    Ok(TypeExpr::Named {
        namespace: namespace.map(str::to_string),
        name: name.to_string(),
    })
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Builtin(builtin) => f.write_str(builtin.name()),
            TypeExpr::Named {
                namespace: Some(namespace),
                name,
            } => write!(f, "{}.{}", namespace, name),
            TypeExpr::Named {
                namespace: None,
                name,
            } => f.write_str(name),
            TypeExpr::Pointer(elem) => write!(f, "*{}", elem),
            TypeExpr::Slice(elem) => write!(f, "[]{}", elem),
            TypeExpr::Array(len, elem) => write!(f, "[{}]{}", len, elem),
            TypeExpr::Map(key, value) => write!(f, "map[{}]{}", key, value),
            TypeExpr::Interface => f.write_str("interface{}"),
            TypeExpr::Func => f.write_str("func()"),
            TypeExpr::OpaquePointer => f.write_str("unsafe.Pointer"),
        }
    }
}
