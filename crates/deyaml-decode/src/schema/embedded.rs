//! Embedded Kubernetes schema
//!
//! Schema files are embedded at compile time using include_str!

/// Embedded schema metadata
pub struct EmbeddedSchema {
    pub name: &'static str,
    pub yaml: &'static str,
}

/// Get all embedded schema files
pub fn embedded_schemas() -> Vec<EmbeddedSchema> {
    vec![
        EmbeddedSchema {
            name: "apimachinery",
            yaml: include_str!("../../schemas/apimachinery.yaml"),
        },
        EmbeddedSchema {
            name: "core_v1",
            yaml: include_str!("../../schemas/core_v1.yaml"),
        },
        EmbeddedSchema {
            name: "apps_v1",
            yaml: include_str!("../../schemas/apps_v1.yaml"),
        },
    ]
}
