//! Imports command
//!
//! Usage: deyaml imports <PATH>... [--json]

use clap::Args;
use deyaml_core::emit::{import_lines, imports};

use super::{load_graph, InputArgs};

#[derive(Debug, Args)]
pub struct ImportsArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Print a JSON object mapping each path to its alias
    #[arg(long)]
    pub json: bool,
}

/// Execute imports command
pub fn execute(args: ImportsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let graph = load_graph(&args.input)?;
    let aliases = imports(&graph);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&aliases)?);
    } else {
        for line in import_lines(&aliases) {
            println!("{}", line);
        }
    }

    Ok(())
}
