use std::collections::HashMap;

use crate::alias::AliasTable;
use crate::model::{Builtin, Kind, SlotId, TypeId, TypeKind, TypeTable, Value, ValueRef};
use crate::{log_op_end, log_op_start};

use super::layout::Block;
use super::literal;

/// Default ceiling on reference/variant nesting
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Appended to the type name in the cyclic reference sentinel
pub const CYCLE_MARKER: &str = "{(CYCLIC REFERENCE)}";

/// Emitted in place of a value nested deeper than the ceiling
pub const DEPTH_EXCEEDED: &str = "!(DEPTH EXCEEDED)";

/// Structural printer producing Go composite literals
///
/// A printer borrows an [`AliasTable`] and is otherwise stateless; every
/// [`render`](Printer::render) call carries its own visited set and depth.
#[derive(Debug, Clone)]
pub struct Printer<'a> {
    aliases: &'a AliasTable,
    max_depth: usize,
}

/// Per-render traversal state
#[derive(Debug, Default)]
struct RenderContext {
    /// Addressable aggregates on the current path, with the depth they were entered at
    visited: HashMap<(SlotId, TypeId), usize>,
    depth: usize,
}

impl<'a> Printer<'a> {
    pub fn new(aliases: &'a AliasTable) -> Self {
        Self {
            aliases,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Render `value` as a literal expression, with its type shown
    pub fn render(&self, value: ValueRef<'_>) -> String {
        log_op_start!("render");
        let start = std::time::Instant::now();

        let mut ctx = RenderContext::default();
        let out = self.print_value(&mut ctx, value, true);

        log_op_end!(
            "render",
            duration_ms = start.elapsed().as_millis() as u64,
            output_len = out.len()
        );
        out
    }

    fn print_value(&self, ctx: &mut RenderContext, value: ValueRef<'_>, show_type: bool) -> String {
        if ctx.depth > self.max_depth {
            return DEPTH_EXCEEDED.to_string();
        }
        let types = value.types();

        match value.kind() {
            Kind::Bool(b) => self.typed(types, value.ty(), b.to_string(), show_type),
            Kind::Int(i) => self.typed(types, value.ty(), i.to_string(), show_type),
            Kind::Uint(u) => self.typed(types, value.ty(), literal::unsigned(u), show_type),
            Kind::Float { value: f, single } => {
                self.typed(types, value.ty(), literal::float(f, single), show_type)
            }
            Kind::Complex { re, im, single } => {
                let body = literal::complex(re, im, single);
                if show_type {
                    format!("{}({})", self.type_name(types, value.ty()), body)
                } else {
                    format!("({})", body)
                }
            }
            Kind::Str(s) => {
                // Builtin strings stay untyped; declared string types keep their name.
                let declared = types.get(value.ty()).namespace.is_some();
                self.typed(types, value.ty(), literal::quote(s), show_type && declared)
            }
            Kind::OpaquePointer(addr) => {
                self.typed(types, value.ty(), literal::unsigned(addr), show_type)
            }
            Kind::Map {
                key,
                value: elem,
                entries,
            } => {
                let mut out = self.type_name(types, value.ty());
                let mut block = Block::new(!can_inline(types, value.ty()));
                if entries.is_some() {
                    let show_key = !is_string(types, key);
                    let show_elem = is_interface(types, elem);
                    for (k, v) in value.entries() {
                        let label = self.print_value(ctx, k, show_key);
                        let body = self.print_value(ctx, v, show_elem);
                        block.labelled(label, body);
                    }
                }
                block.write_to(&mut out);
                out
            }
            Kind::Struct { .. } => self.print_struct(ctx, value),
            Kind::Slice { items: None, .. } => {
                if show_type {
                    "(nil)".to_string()
                } else {
                    "nil".to_string()
                }
            }
            Kind::Slice { elem, .. } | Kind::Array { elem, .. } => {
                let mut out = self.type_name(types, value.ty());
                let mut block = Block::new(!can_inline(types, value.ty()));
                let show_elem = is_interface(types, elem);
                for item in value.elements() {
                    block.item(self.print_value(ctx, item, show_elem));
                }
                block.write_to(&mut out);
                out
            }
            Kind::Pointer { target: None, .. } => {
                format!("({})(nil)", self.type_name(types, value.ty()))
            }
            Kind::Pointer { .. } => match value.deref() {
                Some(pointee) => {
                    ctx.depth += 1;
                    let inner = self.print_value(ctx, pointee, true);
                    ctx.depth -= 1;
                    format!("&{}", inner)
                }
                None => format!("({})(nil)", self.type_name(types, value.ty())),
            },
            Kind::Interface { dynamic: None, required } => {
                if required {
                    format!("{}(nil)", self.type_name(types, value.ty()))
                } else {
                    "nil".to_string()
                }
            }
            Kind::Interface { .. } => match value.dynamic() {
                Some(dynamic) => {
                    ctx.depth += 1;
                    let inner = self.print_value(ctx, dynamic, show_type);
                    ctx.depth -= 1;
                    inner
                }
                None => "nil".to_string(),
            },
            Kind::Func { nil: true } => format!("({})(nil)", self.type_name(types, value.ty())),
            Kind::Func { nil: false } => format!("{} {{...}}", self.type_name(types, value.ty())),
            Kind::Malformed => {
                tracing::warn!(
                    type_name = %types.display_name(value.ty()),
                    "value does not match its type descriptor; printing generic literal"
                );
                fallback_literal(value.value())
            }
        }
    }

    fn print_struct(&self, ctx: &mut RenderContext, value: ValueRef<'_>) -> String {
        let types = value.types();
        let key = value.addr().map(|slot| (slot, value.ty()));

        let mut entered = None;
        if let Some(key) = key {
            match ctx.visited.get(&key) {
                Some(&depth) if depth < ctx.depth => {
                    let sentinel = format!("{}{}", types.display_name(value.ty()), CYCLE_MARKER);
                    return literal::quote(&sentinel);
                }
                Some(_) => {}
                None => {
                    ctx.visited.insert(key, ctx.depth);
                    entered = Some(key);
                }
            }
        }

        let mut out = self.type_name(types, value.ty());
        let mut block = Block::new(!can_inline(types, value.ty()));
        if !value.is_absent() {
            for (field, field_value) in value.fields() {
                let field_value = field_value.unwrap_variant();
                if field_value.is_absent() {
                    continue;
                }
                let show = label_type(types, field.ty);
                block.labelled(field.name.clone(), self.print_value(ctx, field_value, show));
            }
        }
        block.write_to(&mut out);

        // Leaving the aggregate: later siblings sharing the slot are not cycles.
        if let Some(key) = entered {
            ctx.visited.remove(&key);
        }
        out
    }

    fn typed(&self, types: &TypeTable, ty: TypeId, lit: String, show_type: bool) -> String {
        if show_type {
            format!("{}({})", self.type_name(types, ty), lit)
        } else {
            lit
        }
    }

    /// Type string with namespaces replaced by their import alias
    pub fn type_name(&self, types: &TypeTable, ty: TypeId) -> String {
        let desc = types.get(ty);
        if let (Some(name), Some(namespace)) = (&desc.name, &desc.namespace) {
            return format!("{}.{}", self.aliases.import_name(namespace), name);
        }
        match &desc.kind {
            TypeKind::Pointer { elem } if !desc.is_named() => {
                format!("*{}", self.type_name(types, *elem))
            }
            TypeKind::Slice { elem } if !desc.is_named() => {
                format!("[]{}", self.type_name(types, *elem))
            }
            TypeKind::Array { elem, len } if !desc.is_named() => {
                format!("[{}]{}", len, self.type_name(types, *elem))
            }
            TypeKind::Map { key, value } if !desc.is_named() => format!(
                "map[{}]{}",
                self.type_name(types, *key),
                self.type_name(types, *value)
            ),
            _ => types.display_name(ty),
        }
    }
}

fn can_expand(types: &TypeTable, ty: TypeId) -> bool {
    matches!(
        types.get(ty).kind,
        TypeKind::Map { .. }
            | TypeKind::Struct { .. }
            | TypeKind::Interface { .. }
            | TypeKind::Array { .. }
            | TypeKind::Slice { .. }
            | TypeKind::Pointer { .. }
    )
}

/// Whether a composite of this type prints on one line
fn can_inline(types: &TypeTable, ty: TypeId) -> bool {
    match &types.get(ty).kind {
        TypeKind::Map { key, value } => !can_expand(types, *key) && !can_expand(types, *value),
        TypeKind::Struct { fields } => fields.iter().all(|f| !can_expand(types, f.ty)),
        TypeKind::Slice { elem } | TypeKind::Array { elem, .. } => !can_expand(types, *elem),
        TypeKind::Interface { .. }
        | TypeKind::Pointer { .. }
        | TypeKind::Func
        | TypeKind::OpaquePointer => false,
        TypeKind::Scalar(_) => true,
    }
}

/// Field values of these declared types are printed with their type
fn label_type(types: &TypeTable, ty: TypeId) -> bool {
    matches!(
        types.get(ty).kind,
        TypeKind::Struct { .. } | TypeKind::Interface { .. }
    )
}

/// String keys convert implicitly, so they are printed as bare literals
fn is_string(types: &TypeTable, ty: TypeId) -> bool {
    matches!(types.get(ty).kind, TypeKind::Scalar(Builtin::String))
}

fn is_interface(types: &TypeTable, ty: TypeId) -> bool {
    matches!(types.get(ty).kind, TypeKind::Interface { .. })
}

fn fallback_literal(value: &Value) -> String {
    match value {
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Uint(u) | Value::OpaquePointer(u) => literal::unsigned(*u),
        Value::Float(f) => literal::float(*f, false),
        Value::Complex(re, im) => format!("({})", literal::complex(*re, *im, false)),
        Value::Str(s) => literal::quote(s),
        _ => "nil".to_string(),
    }
}
