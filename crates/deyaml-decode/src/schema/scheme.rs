//! Scheme construction
//!
//! A [`Scheme`] is the frozen result of one or more schema files: the type
//! table every decoded graph shares, the `apiVersion`/`kind` bindings and
//! the decode hints attached to individual types. Later files override
//! earlier definitions of the same type or kind, so a user schema can patch
//! the embedded one.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use deyaml_core::errors::ExError;
use deyaml_core::model::{Builtin, Field, ScalarClass, TypeId, TypeKind, TypeTable};
use deyaml_core::{log_op_end, log_op_error, log_op_start};

use super::embedded::embedded_schemas;
use super::expr::TypeExpr;
use super::format::{DecodeHint, KindBinding, SchemaFile, TypeDef};
use crate::errors::{io_error, schema_invalid, schema_parse, Result};

/// Variant type held by the root slice unless a schema names another
pub const DEFAULT_OBJECT_TYPE: &str = "k8s.io/apimachinery/pkg/runtime.Object";

/// Struct type bound to an `apiVersion`/`kind` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectType {
    pub ty: TypeId,
    /// `*T`, the dynamic type stored in the root slice
    pub pointer: TypeId,
}

/// Types given to values decoded into `interface{}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DynamicTypes {
    pub bool: TypeId,
    pub int: TypeId,
    pub float: TypeId,
    pub string: TypeId,
    /// `[]interface{}`
    pub list: TypeId,
    /// `map[string]interface{}`
    pub map: TypeId,
}

/// Frozen type table plus kind bindings
#[derive(Debug, Clone)]
pub struct Scheme {
    types: Arc<TypeTable>,
    kinds: BTreeMap<(String, String), ObjectType>,
    hints: HashMap<TypeId, DecodeHint>,
    object: TypeId,
    objects: TypeId,
    dynamic: DynamicTypes,
}

impl Scheme {
    /// Build the embedded Kubernetes scheme
    ///
    /// # Errors
    ///
    /// Fails only if the embedded schema files are inconsistent.
    pub fn kubernetes() -> Result<Scheme> {
        SchemeBuilder::with_embedded()?.build()
    }

    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    /// Shared handle to the type table, for graphs decoded under this scheme
    pub fn type_table(&self) -> Arc<TypeTable> {
        Arc::clone(&self.types)
    }

    /// Look up the type bound to `apiVersion`/`kind`
    pub fn object_type(&self, api_version: &str, kind: &str) -> Option<ObjectType> {
        self.kinds
            .get(&(api_version.to_string(), kind.to_string()))
            .copied()
    }

    /// All bindings, sorted by `apiVersion` then `kind`
    pub fn kinds(&self) -> impl Iterator<Item = (&str, &str, ObjectType)> {
        self.kinds
            .iter()
            .map(|((api_version, kind), object)| (api_version.as_str(), kind.as_str(), *object))
    }

    pub fn hint(&self, ty: TypeId) -> Option<DecodeHint> {
        self.hints.get(&ty).copied()
    }

    /// The variant type of root elements (`runtime.Object`)
    pub fn variant_type(&self) -> TypeId {
        self.object
    }

    /// The root slice type (`[]runtime.Object`)
    pub fn root_type(&self) -> TypeId {
        self.objects
    }

    pub fn dynamic_types(&self) -> &DynamicTypes {
        &self.dynamic
    }
}

/// Accumulates schema files and builds a [`Scheme`]
#[derive(Debug, Clone, Default)]
pub struct SchemeBuilder {
    types: Vec<TypeDef>,
    type_index: HashMap<String, usize>,
    kinds: Vec<KindBinding>,
    kind_index: HashMap<(String, String), usize>,
    object: Option<String>,
}

impl SchemeBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder preloaded with the embedded Kubernetes schema
    ///
    /// # Errors
    ///
    /// Fails only if an embedded schema file does not parse.
    pub fn with_embedded() -> Result<Self> {
        let mut builder = Self::new();
        for schema in embedded_schemas() {
            builder.add_str(schema.name, schema.yaml)?;
        }
        Ok(builder)
    }

    /// Merge a schema file read from disk
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file cannot be read, or `InvalidSchema` if
    /// it is not a valid schema document.
    pub fn add_file(&mut self, path: &Path) -> Result<()> {
        let text = std::fs::read_to_string(path).map_err(|e| io_error("read_schema", path, e))?;
        self.add_str(&path.display().to_string(), &text)
    }

    /// Merge a schema document; `source` names it in errors
    ///
    /// # Errors
    ///
    /// Returns `InvalidSchema` if the text is not a valid schema document.
    pub fn add_str(&mut self, source: &str, yaml: &str) -> Result<()> {
        let file: SchemaFile = serde_yaml::from_str(yaml).map_err(|e| schema_parse(source, e))?;
        self.merge(file);
        Ok(())
    }

    /// Merge a parsed schema file, overriding earlier definitions
    pub fn merge(&mut self, file: SchemaFile) {
        for def in file.types {
            let name = def.qualified_name();
            match self.type_index.get(&name) {
                Some(&index) => self.types[index] = def,
                None => {
                    self.type_index.insert(name, self.types.len());
                    self.types.push(def);
                }
            }
        }
        for binding in file.kinds {
            let key = (binding.api_version.clone(), binding.kind.clone());
            match self.kind_index.get(&key) {
                Some(&index) => self.kinds[index] = binding,
                None => {
                    self.kind_index.insert(key, self.kinds.len());
                    self.kinds.push(binding);
                }
            }
        }
        if file.object.is_some() {
            self.object = file.object;
        }
    }

    /// Resolve every definition into a frozen [`Scheme`]
    ///
    /// # Errors
    ///
    /// Returns `InvalidSchema`, `InvalidTypeExpr`, `UnknownType` or
    /// `DuplicateType` describing the first inconsistency found.
    pub fn build(self) -> Result<Scheme> {
        log_op_start!("schema_build", type_count = self.types.len());
        let start = std::time::Instant::now();

        let scheme = self.build_inner().map_err(|e| {
            log_op_error!(
                "schema_build",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!(
            "schema_build",
            duration_ms = start.elapsed().as_millis() as u64,
            type_count = scheme.types.len(),
            kind_count = scheme.kinds.len()
        );
        Ok(scheme)
    }

    fn build_inner(self) -> Result<Scheme> {
        let mut types = TypeTable::new();

        // Declare everything first so definitions can refer to each other
        let mut ids = Vec::with_capacity(self.types.len());
        for def in &self.types {
            if def.shape_count() != 1 {
                return Err(schema_invalid(format!(
                    "type {} must define exactly one of struct, scalar, map, slice or interface",
                    def.qualified_name()
                )));
            }
            let id = types
                .declare(&def.namespace, &def.name)
                .map_err(|e| ExError::from(e).with_op("schema_build"))?;
            ids.push(id);
        }
        for (def, &id) in self.types.iter().zip(&ids) {
            let kind = define_kind(def, &mut types)?;
            types.define(id, kind);
        }

        check_inline_fields(&types, &ids)?;
        let mut marks = HashMap::new();
        for &id in &ids {
            check_value_cycles(&types, id, &mut marks)?;
        }

        let mut hints = HashMap::new();
        for (def, &id) in self.types.iter().zip(&ids) {
            if let Some(hint) = def.decode {
                check_hint(&types, id, hint)?;
                hints.insert(id, hint);
            }
        }

        let mut kinds = BTreeMap::new();
        for binding in &self.kinds {
            let ty = types
                .resolve_qualified(&binding.ty)
                .map_err(|e| ExError::from(e).with_op("schema_build"))?;
            if !matches!(types.get(ty).kind, TypeKind::Struct { .. }) {
                return Err(schema_invalid(format!(
                    "kind {}/{} must bind a struct type, {} is not one",
                    binding.api_version, binding.kind, binding.ty
                )));
            }
            let pointer = types.pointer_to(ty);
            kinds.insert(
                (binding.api_version.clone(), binding.kind.clone()),
                ObjectType { ty, pointer },
            );
        }

        let object_name = self.object.as_deref().unwrap_or(DEFAULT_OBJECT_TYPE);
        let object = types
            .resolve_qualified(object_name)
            .map_err(|e| ExError::from(e).with_op("schema_build"))?;
        if !matches!(types.get(object).kind, TypeKind::Interface { .. }) {
            return Err(schema_invalid(format!(
                "object type {} must be an interface",
                object_name
            )));
        }
        let objects = types.slice_of(object);

        let any = types.empty_interface();
        let string = types.builtin(Builtin::String);
        let dynamic = DynamicTypes {
            bool: types.builtin(Builtin::Bool),
            int: types.builtin(Builtin::Int64),
            float: types.builtin(Builtin::Float64),
            string,
            list: types.slice_of(any),
            map: types.map_of(string, any),
        };

        Ok(Scheme {
            types: Arc::new(types),
            kinds,
            hints,
            object,
            objects,
            dynamic,
        })
    }
}

fn resolve_expr(expr: &str, types: &mut TypeTable, def: &TypeDef) -> Result<TypeId> {
    TypeExpr::parse(expr)
        .and_then(|parsed| parsed.resolve(types, &def.namespace))
        .map_err(|e| {
            ExError::from(e)
                .with_op("schema_build")
                .with_path(def.qualified_name())
        })
}

fn define_kind(def: &TypeDef, types: &mut TypeTable) -> Result<TypeKind> {
    if let Some(field_defs) = &def.fields {
        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(field_defs.len());
        for field_def in field_defs {
            if !seen.insert(field_def.name.as_str()) {
                return Err(schema_invalid(format!(
                    "type {} declares field {} twice",
                    def.qualified_name(),
                    field_def.name
                )));
            }
            let ty = resolve_expr(&field_def.ty, types, def)?;
            let field = Field::new(&field_def.name, field_def.effective_key(), ty);
            fields.push(if field_def.inline { field.inline() } else { field });
        }
        return Ok(TypeKind::Struct { fields });
    }
    if let Some(scalar) = &def.scalar {
        return Builtin::parse(scalar).map(TypeKind::Scalar).ok_or_else(|| {
            schema_invalid(format!(
                "scalar type {} must name a builtin, found '{}'",
                def.qualified_name(),
                scalar
            ))
        });
    }
    if let Some(map) = &def.map {
        let key = resolve_expr(&map.key, types, def)?;
        let value = resolve_expr(&map.value, types, def)?;
        return Ok(TypeKind::Map { key, value });
    }
    if let Some(elem) = &def.slice {
        let elem = resolve_expr(elem, types, def)?;
        return Ok(TypeKind::Slice { elem });
    }
    if let Some(interface) = &def.interface {
        return Ok(TypeKind::Interface {
            required: interface.required,
        });
    }
    Err(schema_invalid(format!(
        "type {} has no shape",
        def.qualified_name()
    )))
}

fn qualified(types: &TypeTable, id: TypeId) -> String {
    let desc = types.get(id);
    match (&desc.namespace, &desc.name) {
        (Some(namespace), Some(name)) => format!("{}.{}", namespace, name),
        _ => types.display_name(id),
    }
}

fn check_inline_fields(types: &TypeTable, ids: &[TypeId]) -> Result<()> {
    for &id in ids {
        if let TypeKind::Struct { fields } = &types.get(id).kind {
            for field in fields.iter().filter(|f| f.inline) {
                if !matches!(types.get(field.ty).kind, TypeKind::Struct { .. }) {
                    return Err(schema_invalid(format!(
                        "inline field {}.{} must be a struct",
                        qualified(types, id),
                        field.name
                    )));
                }
            }
        }
    }
    Ok(())
}

/// Structs a type holds by value; pointers, slices and maps break containment
fn by_value_structs(types: &TypeTable, ty: TypeId, out: &mut Vec<TypeId>) {
    match &types.get(ty).kind {
        TypeKind::Struct { .. } => out.push(ty),
        TypeKind::Array { elem, .. } => by_value_structs(types, *elem, out),
        _ => {}
    }
}

/// Reject structs that contain themselves by value
///
/// `marks` holds `false` while a type is on the DFS stack and `true` once it
/// is finished.
fn check_value_cycles(
    types: &TypeTable,
    id: TypeId,
    marks: &mut HashMap<TypeId, bool>,
) -> Result<()> {
    match marks.get(&id) {
        Some(true) => return Ok(()),
        Some(false) => {
            return Err(schema_invalid(format!(
                "type {} contains itself by value",
                qualified(types, id)
            )))
        }
        None => {}
    }
    marks.insert(id, false);
    if let TypeKind::Struct { fields } = &types.get(id).kind {
        let mut contained = Vec::new();
        for field in fields {
            by_value_structs(types, field.ty, &mut contained);
        }
        for inner in contained {
            check_value_cycles(types, inner, marks)?;
        }
    }
    marks.insert(id, true);
    Ok(())
}

fn scalar_class(types: &TypeTable, ty: TypeId) -> Option<ScalarClass> {
    match types.get(ty).kind {
        TypeKind::Scalar(builtin) => Some(builtin.class()),
        _ => None,
    }
}

fn check_hint(types: &TypeTable, id: TypeId, hint: DecodeHint) -> Result<()> {
    let fits = match (&types.get(id).kind, hint) {
        (TypeKind::Struct { fields }, DecodeHint::IntOrString) => {
            let classes: Vec<_> = fields.iter().map(|f| scalar_class(types, f.ty)).collect();
            classes
                == [
                    Some(ScalarClass::Signed),
                    Some(ScalarClass::Signed),
                    Some(ScalarClass::String),
                ]
        }
        (TypeKind::Scalar(builtin), DecodeHint::ScalarString) => {
            builtin.class() == ScalarClass::String
        }
        _ => false,
    };
    if fits {
        Ok(())
    } else {
        Err(schema_invalid(format!(
            "type {} cannot use the {:?} decode hint",
            qualified(types, id),
            hint
        )))
    }
}
