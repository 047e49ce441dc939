//! deyaml CLI
//!
//! Command-line interface for deyaml

use clap::{Parser, Subcommand};
use deyaml_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "deyaml")]
#[command(about = "deyaml - Kubernetes manifests as Go object literals", long_about = None)]
struct Cli {
    /// Human-readable debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate a Go source file declaring the decoded objects
    Generate(commands::generate::GenerateArgs),
    /// Print the import table the generated file would use
    Imports(commands::imports::ImportsArgs),
}

fn main() {
    let cli = Cli::parse();

    init(if cli.verbose {
        Profile::Development
    } else {
        Profile::Production
    });

    let result = match cli.command {
        Commands::Generate(args) => commands::generate::execute(args),
        Commands::Imports(args) => commands::imports::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
