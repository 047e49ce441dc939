//! Generate command
//!
//! Usage: deyaml generate <PATH>... [--package <NAME>] [--var <NAME>] [--output <FILE>]

use std::path::PathBuf;

use clap::Args;
use deyaml_core::emit::{generate, RenderOptions, DEFAULT_PACKAGE_NAME, DEFAULT_VAR_NAME};
use deyaml_core::render::DEFAULT_MAX_DEPTH;

use super::{load_graph, InputArgs};

#[derive(Debug, Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Package clause of the generated file
    #[arg(long, default_value = DEFAULT_PACKAGE_NAME)]
    pub package: String,

    /// Name of the declared variable
    #[arg(long = "var", default_value = DEFAULT_VAR_NAME)]
    pub var_name: String,

    /// Pointer/interface nesting printed before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute generate command
pub fn execute(args: GenerateArgs) -> Result<(), Box<dyn std::error::Error>> {
    for (what, name) in [("package", &args.package), ("variable", &args.var_name)] {
        if !is_go_identifier(name) {
            return Err(format!("invalid {} name '{}'", what, name).into());
        }
    }

    let graph = load_graph(&args.input)?;
    let options = RenderOptions::default()
        .with_max_depth(args.max_depth)
        .with_package_name(args.package)
        .with_var_name(args.var_name);
    let generated = generate(&graph, &options);

    if let Some(output_path) = args.output {
        std::fs::write(&output_path, &generated.source)?;
        println!("✓ Generated {}", output_path.display());
    } else {
        print!("{}", generated.source);
    }

    Ok(())
}

fn is_go_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}
