//! deyaml Core - typed value graphs rendered as Go source
//!
//! This crate provides the rendering kernel for deyaml, including:
//! - A type descriptor table and value graph arena (`model`)
//! - Namespace collection over value graphs (`collect`)
//! - Collision-free import alias resolution (`alias`)
//! - A cycle-safe structural printer emitting Go composite literals (`render`)
//! - Go source file assembly (`emit`)
//!
//! Decoding YAML into graphs lives in `deyaml-decode`.

pub mod alias;
pub mod collect;
pub mod emit;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod render;

// Re-export commonly used types
pub use alias::{resolve, AliasTable};
pub use collect::collect;
pub use emit::{generate, GeneratedSource, RenderOptions};
pub use errors::{DeyamlError, ExError, ExErrorKind, Result};
pub use model::{Graph, TypeId, TypeTable, Value, ValueRef};
pub use render::{render, Printer};
