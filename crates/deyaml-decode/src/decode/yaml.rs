//! YAML manifest decoding
//!
//! Every document in a stream becomes one heap slot holding the struct bound
//! to its `apiVersion`/`kind`. The resulting graph's root is a
//! `[]runtime.Object` whose elements point at those slots, in input order.

#![allow(clippy::result_large_err)]

use std::collections::HashSet;
use std::path::PathBuf;

use serde::Deserialize;
use serde_yaml::{Mapping, Value as Yaml};

use deyaml_core::errors::{DeyamlError, ExError};
use deyaml_core::model::{Field, Graph, ScalarClass, SlotId, TypeId, TypeKind, TypeTable, Value};
use deyaml_core::{log_op_end, log_op_error, log_op_start};

use crate::errors::{
    decode_mismatch, io_error, missing_type_meta, out_of_range, unknown_field, unknown_kind,
    yaml_parse, Result,
};
use crate::schema::{DecodeHint, ObjectType, Scheme};

/// Decoder configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Reject mapping keys that match no struct field instead of skipping them
    pub strict: bool,
}

impl DecodeOptions {
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Decodes manifests into graphs typed by a [`Scheme`]
pub struct Decoder<'s> {
    scheme: &'s Scheme,
    options: DecodeOptions,
}

/// Graph under construction plus the root elements decoded so far
struct Session {
    graph: Graph,
    objects: Vec<Value>,
}

impl<'s> Decoder<'s> {
    pub fn new(scheme: &'s Scheme) -> Self {
        Self {
            scheme,
            options: DecodeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    /// Decode a (possibly multi-document) YAML string
    ///
    /// # Errors
    ///
    /// Returns the first decode failure, tagged with its document index and
    /// field path.
    pub fn decode_str(&self, yaml: &str) -> Result<Graph> {
        self.run(1, |session| self.decode_stream(session, None, yaml))
    }

    /// Decode files in order into one graph
    ///
    /// # Errors
    ///
    /// Returns an IO error for unreadable files, otherwise the first decode
    /// failure tagged with its file, document index and field path.
    pub fn decode_files(&self, paths: &[PathBuf]) -> Result<Graph> {
        self.run(paths.len(), |session| {
            for path in paths {
                let text = std::fs::read_to_string(path)
                    .map_err(|e| io_error("read_manifest", path, e))?;
                self.decode_stream(session, Some(&path.display().to_string()), &text)?;
            }
            Ok(())
        })
    }

    fn run(
        &self,
        source_count: usize,
        body: impl FnOnce(&mut Session) -> Result<()>,
    ) -> Result<Graph> {
        log_op_start!(
            "decode",
            source_count = source_count,
            strict = self.options.strict
        );
        let start = std::time::Instant::now();

        let mut session = Session {
            graph: Graph::new(self.scheme.type_table()),
            objects: Vec::new(),
        };
        body(&mut session).map_err(|e| {
            log_op_error!(
                "decode",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        let object_count = session.objects.len();
        let mut graph = session.graph;
        graph.set_root(
            self.scheme.root_type(),
            Value::Slice(Some(session.objects)),
        );

        log_op_end!(
            "decode",
            duration_ms = start.elapsed().as_millis() as u64,
            object_count = object_count,
            slot_count = graph.slot_count()
        );
        Ok(graph)
    }

    fn decode_stream(&self, session: &mut Session, file: Option<&str>, text: &str) -> Result<()> {
        let locate = |err: ExError, document: usize| match file {
            Some(file) => err.with_document(document).with_file(file),
            None => err.with_document(document),
        };

        for (index, document) in serde_yaml::Deserializer::from_str(text).enumerate() {
            let yaml = Yaml::deserialize(document).map_err(|e| locate(yaml_parse(e), index))?;
            if yaml.is_null() {
                continue;
            }
            let (object, slot) = self
                .decode_object(&mut session.graph, &yaml, "", Some(index))
                .map_err(|e| locate(e, index))?;
            session
                .objects
                .push(Value::dynamic(object.pointer, Value::Pointer(Some(slot))));
        }
        Ok(())
    }

    /// Decode a mapping carrying its own `apiVersion`/`kind` into a new slot
    fn decode_object(
        &self,
        graph: &mut Graph,
        yaml: &Yaml,
        path: &str,
        document: Option<usize>,
    ) -> Result<(ObjectType, SlotId)> {
        let mapping = untag(yaml)
            .as_mapping()
            .ok_or_else(|| decode_mismatch(shown(path), "mapping", describe(yaml)))?;

        let api_version = type_meta(mapping, "apiVersion", path, document)?;
        let kind = type_meta(mapping, "kind", path, document)?;

        let object = self
            .scheme
            .object_type(api_version, kind)
            .ok_or_else(|| unknown_kind(api_version, kind))?;
        let value = self.decode_struct(graph, object.ty, mapping, path, true)?;
        Ok((object, graph.alloc(object.ty, value)))
    }

    fn types(&self) -> &'s TypeTable {
        self.scheme.types()
    }

    fn decode_value(&self, graph: &mut Graph, ty: TypeId, yaml: &Yaml, path: &str) -> Result<Value> {
        let types = self.types();
        let yaml = untag(yaml);
        if yaml.is_null() {
            return Ok(Value::zero(types, ty));
        }
        if let Some(hint) = self.scheme.hint(ty) {
            return self.decode_hinted(graph, ty, hint, yaml, path);
        }

        match &types.get(ty).kind {
            TypeKind::Scalar(builtin) => {
                decode_scalar(builtin.class(), builtin.bits(), ty, types, yaml, path)
            }
            TypeKind::Struct { .. } => {
                let mapping = yaml
                    .as_mapping()
                    .ok_or_else(|| decode_mismatch(shown(path), types.display_name(ty), describe(yaml)))?;
                self.decode_struct(graph, ty, mapping, path, true)
            }
            TypeKind::Map { key, value } => {
                let mapping = yaml
                    .as_mapping()
                    .ok_or_else(|| decode_mismatch(shown(path), types.display_name(ty), describe(yaml)))?;
                let mut entries = Vec::with_capacity(mapping.len());
                for (k, v) in mapping {
                    let entry_path = key_path(path, &scalar_text(k));
                    let decoded_key = self.decode_key(graph, *key, k, &entry_path)?;
                    let decoded_value = self.decode_value(graph, *value, v, &entry_path)?;
                    entries.push((decoded_key, decoded_value));
                }
                Ok(Value::Map(Some(entries)))
            }
            TypeKind::Slice { elem } => {
                if let (TypeKind::Scalar(builtin), Yaml::String(encoded)) = (&types.get(*elem).kind, yaml) {
                    if builtin.class() == ScalarClass::Unsigned && builtin.bits() == 8 {
                        return decode_bytes(encoded, path);
                    }
                }
                let items = yaml
                    .as_sequence()
                    .ok_or_else(|| decode_mismatch(shown(path), types.display_name(ty), describe(yaml)))?;
                let mut values = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    values.push(self.decode_value(graph, *elem, item, &index_path(path, index))?);
                }
                Ok(Value::Slice(Some(values)))
            }
            TypeKind::Array { elem, len } => {
                let items = yaml
                    .as_sequence()
                    .ok_or_else(|| decode_mismatch(shown(path), types.display_name(ty), describe(yaml)))?;
                if items.len() > *len {
                    return Err(decode_mismatch(
                        shown(path),
                        types.display_name(ty),
                        format!("sequence of {}", items.len()),
                    ));
                }
                let mut values = Vec::with_capacity(*len);
                for (index, item) in items.iter().enumerate() {
                    values.push(self.decode_value(graph, *elem, item, &index_path(path, index))?);
                }
                values.resize_with(*len, || Value::zero(types, *elem));
                Ok(Value::Array(values))
            }
            TypeKind::Pointer { elem } => {
                let value = self.decode_value(graph, *elem, yaml, path)?;
                Ok(Value::Pointer(Some(graph.alloc(*elem, value))))
            }
            TypeKind::Interface { required: false } => self.decode_dynamic(yaml, path),
            TypeKind::Interface { required: true } => {
                let (object, slot) = self.decode_object(graph, yaml, path, None)?;
                Ok(Value::dynamic(object.pointer, Value::Pointer(Some(slot))))
            }
            TypeKind::Func | TypeKind::OpaquePointer => Err(decode_mismatch(
                shown(path),
                format!("{} (not representable in YAML)", types.display_name(ty)),
                describe(yaml),
            )),
        }
    }

    /// Decode a struct whose fields read keys from `mapping`
    ///
    /// Inline fields read from the same mapping. `owns_mapping` is false for
    /// those nested calls so leftover keys are only checked once.
    fn decode_struct(
        &self,
        graph: &mut Graph,
        ty: TypeId,
        mapping: &Mapping,
        path: &str,
        owns_mapping: bool,
    ) -> Result<Value> {
        let types = self.types();
        let fields = match &types.get(ty).kind {
            TypeKind::Struct { fields } => fields,
            _ => {
                return Err(ExError::from(DeyamlError::Internal {
                    message: format!("{} is not a struct", types.display_name(ty)),
                })
                .with_path(shown(path)))
            }
        };

        let mut values = Vec::with_capacity(fields.len());
        for field in fields {
            let value = if field.inline {
                self.decode_struct(graph, field.ty, mapping, path, false)?
            } else {
                match mapping.get(field.key.as_str()) {
                    Some(yaml) => {
                        self.decode_value(graph, field.ty, yaml, &field_path(path, &field.key))?
                    }
                    None => Value::zero(types, field.ty),
                }
            };
            values.push(value);
        }

        if owns_mapping {
            self.check_unknown_keys(fields, mapping, path)?;
        }
        Ok(Value::Struct(values))
    }

    fn check_unknown_keys(&self, fields: &[Field], mapping: &Mapping, path: &str) -> Result<()> {
        let mut known = HashSet::new();
        known_keys(self.types(), fields, &mut known);

        for key in mapping.keys() {
            let name = scalar_text(key);
            if key.as_str().is_some_and(|k| known.contains(k)) {
                continue;
            }
            if self.options.strict {
                return Err(unknown_field(shown(path), &name));
            }
            tracing::warn!(path = shown(path), field = %name, "Ignoring unknown field");
        }
        Ok(())
    }

    /// Map keys of string type accept any scalar, as YAML keys often are
    /// unquoted numbers or booleans
    fn decode_key(&self, graph: &mut Graph, ty: TypeId, yaml: &Yaml, path: &str) -> Result<Value> {
        let types = self.types();
        if let TypeKind::Scalar(builtin) = &types.get(ty).kind {
            if builtin.class() == ScalarClass::String
                && matches!(untag(yaml), Yaml::Number(_) | Yaml::Bool(_))
            {
                return Ok(Value::Str(scalar_text(yaml)));
            }
        }
        self.decode_value(graph, ty, yaml, path)
    }

    fn decode_hinted(
        &self,
        graph: &mut Graph,
        ty: TypeId,
        hint: DecodeHint,
        yaml: &Yaml,
        path: &str,
    ) -> Result<Value> {
        let types = self.types();
        match hint {
            DecodeHint::ScalarString => match yaml {
                Yaml::String(_) | Yaml::Number(_) | Yaml::Bool(_) => {
                    Ok(Value::Str(scalar_text(yaml)))
                }
                _ => Err(decode_mismatch(shown(path), "scalar", describe(yaml))),
            },
            DecodeHint::IntOrString => {
                let fields = match &types.get(ty).kind {
                    TypeKind::Struct { fields } if fields.len() == 3 => fields,
                    _ => {
                        return Err(ExError::from(DeyamlError::Internal {
                            message: format!(
                                "{} does not have the int-or-string layout",
                                types.display_name(ty)
                            ),
                        })
                        .with_path(shown(path)))
                    }
                };
                let mut values: Vec<Value> =
                    fields.iter().map(|f| Value::zero(types, f.ty)).collect();
                match yaml {
                    Yaml::Number(_) => {
                        values[1] = self.decode_value(graph, fields[1].ty, yaml, path)?;
                    }
                    Yaml::String(s) => {
                        values[0] = Value::Int(1);
                        values[2] = Value::Str(s.clone());
                    }
                    _ => return Err(decode_mismatch(shown(path), "int or string", describe(yaml))),
                }
                Ok(Value::Struct(values))
            }
        }
    }

    /// Decode into `interface{}`, taking the dynamic type from the node
    fn decode_dynamic(&self, yaml: &Yaml, path: &str) -> Result<Value> {
        let dynamic = self.scheme.dynamic_types();
        let (ty, value) = match untag(yaml) {
            Yaml::Null => return Ok(Value::Interface(None)),
            Yaml::Bool(b) => (dynamic.bool, Value::Bool(*b)),
            Yaml::Number(n) => match n.as_i64() {
                Some(i) => (dynamic.int, Value::Int(i)),
                None => (dynamic.float, Value::Float(n.as_f64().unwrap_or(f64::NAN))),
            },
            Yaml::String(s) => (dynamic.string, Value::Str(s.clone())),
            Yaml::Sequence(items) => {
                let mut values = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    values.push(self.decode_dynamic(item, &index_path(path, index))?);
                }
                (dynamic.list, Value::Slice(Some(values)))
            }
            Yaml::Mapping(mapping) => {
                let mut entries = Vec::with_capacity(mapping.len());
                for (k, v) in mapping {
                    let key = scalar_text(k);
                    let value = self.decode_dynamic(v, &key_path(path, &key))?;
                    entries.push((Value::Str(key), value));
                }
                (dynamic.map, Value::Map(Some(entries)))
            }
            Yaml::Tagged(tagged) => return self.decode_dynamic(&tagged.value, path),
        };
        Ok(Value::dynamic(ty, value))
    }
}

/// Read `apiVersion` or `kind`; top-level documents report the document
/// index, nested objects the field path
fn type_meta<'m>(
    mapping: &'m Mapping,
    field: &str,
    path: &str,
    document: Option<usize>,
) -> Result<&'m str> {
    mapping
        .get(field)
        .and_then(Yaml::as_str)
        .ok_or_else(|| match document {
            Some(document) => missing_type_meta(document, field),
            None => decode_mismatch(
                &field_path(path, field),
                "string",
                mapping.get(field).map(describe).unwrap_or("nothing"),
            ),
        })
}

fn decode_scalar(
    class: ScalarClass,
    bits: u32,
    ty: TypeId,
    types: &TypeTable,
    yaml: &Yaml,
    path: &str,
) -> Result<Value> {
    let mismatch = || decode_mismatch(shown(path), types.display_name(ty), describe(yaml));
    match class {
        ScalarClass::Bool => yaml.as_bool().map(Value::Bool).ok_or_else(mismatch),
        ScalarClass::String => yaml
            .as_str()
            .map(|s| Value::Str(s.to_string()))
            .ok_or_else(mismatch),
        ScalarClass::Signed => {
            let Yaml::Number(n) = yaml else {
                return Err(mismatch());
            };
            let (min, max) = signed_range(bits);
            match n.as_i64() {
                Some(i) if (min..=max).contains(&i) => Ok(Value::Int(i)),
                Some(_) => Err(out_of_range(shown(path), n.to_string(), types.display_name(ty))),
                None if n.is_f64() => Err(mismatch()),
                None => Err(out_of_range(shown(path), n.to_string(), types.display_name(ty))),
            }
        }
        ScalarClass::Unsigned => {
            let Yaml::Number(n) = yaml else {
                return Err(mismatch());
            };
            match n.as_u64() {
                Some(u) if u <= unsigned_max(bits) => Ok(Value::Uint(u)),
                Some(_) => Err(out_of_range(shown(path), n.to_string(), types.display_name(ty))),
                None if n.is_f64() => Err(mismatch()),
                None => Err(out_of_range(shown(path), n.to_string(), types.display_name(ty))),
            }
        }
        ScalarClass::Float => {
            let value = yaml.as_f64().ok_or_else(mismatch)?;
            if bits == 32 && value.is_finite() && value.abs() > f64::from(f32::MAX) {
                return Err(out_of_range(shown(path), value.to_string(), types.display_name(ty)));
            }
            Ok(Value::Float(value))
        }
        ScalarClass::Complex => Err(decode_mismatch(
            shown(path),
            format!("{} (not representable in YAML)", types.display_name(ty)),
            describe(yaml),
        )),
    }
}

fn decode_bytes(encoded: &str, path: &str) -> Result<Value> {
    let bytes = base64::Engine::decode(&base64::engine::general_purpose::STANDARD, encoded)
        .map_err(|e| decode_mismatch(shown(path), "base64 data", format!("string ({})", e)))?;
    Ok(Value::Slice(Some(
        bytes.into_iter().map(|b| Value::Uint(u64::from(b))).collect(),
    )))
}

fn known_keys<'t>(types: &'t TypeTable, fields: &'t [Field], out: &mut HashSet<&'t str>) {
    for field in fields {
        if field.inline {
            if let TypeKind::Struct { fields: inner } = &types.get(field.ty).kind {
                known_keys(types, inner, out);
            }
        } else {
            out.insert(field.key.as_str());
        }
    }
}

fn signed_range(bits: u32) -> (i64, i64) {
    if bits >= 64 {
        (i64::MIN, i64::MAX)
    } else {
        (-(1i64 << (bits - 1)), (1i64 << (bits - 1)) - 1)
    }
}

fn unsigned_max(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

fn untag(yaml: &Yaml) -> &Yaml {
    match yaml {
        Yaml::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

fn describe(yaml: &Yaml) -> &'static str {
    match yaml {
        Yaml::Null => "null",
        Yaml::Bool(_) => "bool",
        Yaml::Number(_) => "number",
        Yaml::String(_) => "string",
        Yaml::Sequence(_) => "sequence",
        Yaml::Mapping(_) => "mapping",
        Yaml::Tagged(tagged) => describe(&tagged.value),
    }
}

/// Text of a scalar node; collections fall back to their kind
fn scalar_text(yaml: &Yaml) -> String {
    match untag(yaml) {
        Yaml::String(s) => s.clone(),
        Yaml::Number(n) => n.to_string(),
        Yaml::Bool(b) => b.to_string(),
        other => describe(other).to_string(),
    }
}

fn shown(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}

fn field_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn index_path(parent: &str, index: usize) -> String {
    format!("{}[{}]", parent, index)
}

fn key_path(parent: &str, key: &str) -> String {
    format!("{}[{}]", parent, key)
}
