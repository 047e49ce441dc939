//! deyaml Decode - schema-driven YAML decoding into value graphs
//!
//! Provides:
//! - A schema file format declaring named types and `apiVersion`/`kind`
//!   bindings, with an embedded Kubernetes subset
//! - Go-style type expressions (`*int32`, `map[string][]byte`)
//! - A multi-document YAML decoder producing `[]runtime.Object` graphs
//! - Manifest path expansion for files and directories

pub mod decode;
pub mod errors;
pub mod input;
pub mod schema;

// Re-export key types
pub use decode::{DecodeOptions, Decoder};
pub use errors::Result;
pub use input::expand_paths;
pub use schema::{Scheme, SchemeBuilder};
