//! Schema file format
//!
//! Defines the YAML structure that declares the types a manifest can decode
//! into and binds `apiVersion`/`kind` pairs to those types.

use serde::{Deserialize, Serialize};

/// Top-level schema file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaFile {
    /// Named type definitions
    #[serde(default)]
    pub types: Vec<TypeDef>,

    /// `apiVersion`/`kind` bindings
    #[serde(default)]
    pub kinds: Vec<KindBinding>,

    /// Qualified name of the variant type held by the root slice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
}

/// A named type definition
///
/// Exactly one of `struct`, `scalar`, `map`, `slice` or `interface` must be
/// set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDef {
    /// Type name (`Deployment`)
    pub name: String,

    /// Declaring namespace (`k8s.io/api/apps/v1`)
    pub namespace: String,

    /// Struct fields in declaration order
    #[serde(default, rename = "struct", skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldDef>>,

    /// Underlying builtin of a named scalar
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scalar: Option<String>,

    /// Key and value expressions of a named map
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<MapDef>,

    /// Element expression of a named slice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slice: Option<String>,

    /// Named interface
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<InterfaceDef>,

    /// Alternative YAML shapes the type accepts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decode: Option<DecodeHint>,
}

impl TypeDef {
    /// Number of shapes set on this definition
    pub fn shape_count(&self) -> usize {
        [
            self.fields.is_some(),
            self.scalar.is_some(),
            self.map.is_some(),
            self.slice.is_some(),
            self.interface.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }

    /// `namespace.Name` spelling
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }
}

/// A struct field definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDef {
    /// Field name as printed (`ObjectMeta`)
    pub name: String,

    /// Serialized key; defaults to the name with a lowercase first letter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Type expression (`*int32`, `[]Container`, `map[string]string`)
    #[serde(rename = "type")]
    pub ty: String,

    /// Embedded field whose keys live in the parent mapping
    #[serde(default)]
    pub inline: bool,
}

impl FieldDef {
    /// Key the decoder matches against
    pub fn effective_key(&self) -> String {
        if let Some(key) = &self.key {
            return key.clone();
        }
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first.to_lowercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// Key and value of a named map
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapDef {
    pub key: String,
    pub value: String,
}

/// Named interface definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterfaceDef {
    /// Unset values print as `Type(nil)`; nested mappings decode by their
    /// own `apiVersion`/`kind`
    #[serde(default)]
    pub required: bool,
}

/// Alternative YAML shapes a type accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecodeHint {
    /// Struct `{Type, IntVal, StrVal}` filled from an integer or a string
    IntOrString,
    /// Named string filled from any scalar
    ScalarString,
}

/// Binds an `apiVersion`/`kind` pair to a struct type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KindBinding {
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    pub kind: String,

    /// Qualified type name (`k8s.io/api/apps/v1.Deployment`)
    #[serde(rename = "type")]
    pub ty: String,
}
