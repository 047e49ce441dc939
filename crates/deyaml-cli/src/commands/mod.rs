//! Subcommands and the input handling they share

pub mod generate;
pub mod imports;

use std::path::PathBuf;

use clap::Args;
use deyaml_core::model::Graph;
use deyaml_decode::{expand_paths, DecodeOptions, Decoder, SchemeBuilder};

/// Manifest and schema inputs
#[derive(Debug, Args)]
pub struct InputArgs {
    /// Manifest files, or directories searched for .yaml/.yml files
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Schema file layered over the embedded Kubernetes types (repeatable)
    #[arg(long = "schema", value_name = "FILE")]
    pub schemas: Vec<PathBuf>,

    /// Fail on fields the schema does not declare
    #[arg(long)]
    pub strict: bool,
}

/// Build the scheme and decode every input into one graph
pub fn load_graph(input: &InputArgs) -> Result<Graph, Box<dyn std::error::Error>> {
    let mut builder = SchemeBuilder::with_embedded()?;
    for schema in &input.schemas {
        builder.add_file(schema)?;
    }
    let scheme = builder.build()?;

    let files = expand_paths(&input.paths)?;
    let graph = Decoder::new(&scheme)
        .with_options(DecodeOptions::default().with_strict(input.strict))
        .decode_files(&files)?;
    Ok(graph)
}
