//! Schema definitions and the scheme they build

mod embedded;
pub mod expr;
pub mod format;
pub mod scheme;

pub use expr::TypeExpr;
pub use format::{DecodeHint, FieldDef, InterfaceDef, KindBinding, MapDef, SchemaFile, TypeDef};
pub use scheme::{DynamicTypes, ObjectType, Scheme, SchemeBuilder, DEFAULT_OBJECT_TYPE};
