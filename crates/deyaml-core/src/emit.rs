//! Go source emission
//!
//! Assembles the generated file: package clause, import block and a single
//! `var` declaration holding the rendered root value.

use crate::alias::{resolve, AliasTable};
use crate::collect::collect;
use crate::model::{last_segment, Graph};
use crate::render::{literal, Printer, DEFAULT_MAX_DEPTH};
use crate::{log_op_end, log_op_start};

pub const DEFAULT_PACKAGE_NAME: &str = "example";
pub const DEFAULT_VAR_NAME: &str = "objects";

/// Options controlling the generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub max_depth: usize,
    pub package_name: String,
    pub var_name: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            package_name: DEFAULT_PACKAGE_NAME.to_string(),
            var_name: DEFAULT_VAR_NAME.to_string(),
        }
    }
}

impl RenderOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_package_name(mut self, package_name: impl Into<String>) -> Self {
        self.package_name = package_name.into();
        self
    }

    pub fn with_var_name(mut self, var_name: impl Into<String>) -> Self {
        self.var_name = var_name.into();
        self
    }
}

/// A generated Go file plus the import table it was built with
#[derive(Debug, Clone)]
pub struct GeneratedSource {
    pub source: String,
    pub aliases: AliasTable,
}

/// Collect and resolve the imports a graph needs
pub fn imports(graph: &Graph) -> AliasTable {
    resolve(collect(graph.root()))
}

/// Import block lines: `"path"` or `alias "path"`, sorted by path
///
/// An unaliased path whose last segment is not a valid identifier is still
/// written with the identifier the printer refers to it by.
pub fn import_lines(aliases: &AliasTable) -> Vec<String> {
    aliases
        .iter()
        .map(|(namespace, _)| {
            let name = aliases.import_name(namespace);
            if name == last_segment(namespace) {
                literal::quote(namespace)
            } else {
                format!("{} {}", name, literal::quote(namespace))
            }
        })
        .collect()
}

/// Generate a Go source file declaring the graph's root value
///
/// A graph without a root declares the variable as `nil`.
pub fn generate(graph: &Graph, options: &RenderOptions) -> GeneratedSource {
    log_op_start!("generate", package = %options.package_name);
    let start = std::time::Instant::now();

    let aliases = imports(graph);

    let mut source = format!("package {}\n\n", options.package_name);
    let lines = import_lines(&aliases);
    if !lines.is_empty() {
        source.push_str("import (\n");
        for line in &lines {
            source.push('\t');
            source.push_str(line);
            source.push('\n');
        }
        source.push_str(")\n\n");
    }

    let body = match graph.root() {
        Some(root) => Printer::new(&aliases)
            .with_max_depth(options.max_depth)
            .render(root),
        None => "nil".to_string(),
    };
    source.push_str(&format!("var {} = {}\n", options.var_name, body));

    log_op_end!(
        "generate",
        duration_ms = start.elapsed().as_millis() as u64,
        namespace_count = aliases.len(),
        output_len = source.len()
    );
    GeneratedSource { source, aliases }
}
