//! Generate Demonstration
//!
//! Decodes a two-document manifest stream against the embedded Kubernetes
//! scheme and prints the import table and the generated Go source.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use deyaml_core::emit::{generate, import_lines, imports, RenderOptions};
use deyaml_decode::{Decoder, SchemeBuilder};

const MANIFESTS: &str = "\
apiVersion: v1
kind: Service
metadata:
  name: web
spec:
  selector:
    app: web
  ports:
    - port: 80
      targetPort: http
---
apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
spec:
  replicas: 2
  selector:
    matchLabels:
      app: web
  template:
    metadata:
      labels:
        app: web
    spec:
      containers:
        - name: web
          image: nginx:1.25
          ports:
            - name: http
              containerPort: 80
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== deyaml Generate Demo ===\n");

    let scheme = SchemeBuilder::with_embedded()?.build()?;
    println!("Built scheme with {} kinds\n", scheme.kinds().count());

    let graph = Decoder::new(&scheme).decode_str(MANIFESTS)?;
    println!("Decoded {} pointer slots\n", graph.slot_count());

    println!("## Imports\n");
    for line in import_lines(&imports(&graph)) {
        println!("  {}", line);
    }

    println!("\n## Source\n");
    let generated = generate(&graph, &RenderOptions::default().with_var_name("web"));
    print!("{}", generated.source);

    Ok(())
}
