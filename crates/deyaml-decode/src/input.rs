//! Manifest path expansion

use std::path::{Path, PathBuf};

use crate::errors::{invalid_input, io_error, Result};

/// True for `.yaml` and `.yml` files
pub fn is_manifest(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Expand command-line paths into the manifest files to decode
///
/// Files are kept as given, whatever their extension. Directories are walked
/// recursively for manifests, sorted by path. Argument order is preserved.
///
/// # Errors
///
/// Returns an IO error for a path that cannot be read, and `InvalidInput`
/// when no manifests are found at all.
pub fn expand_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        let metadata = std::fs::metadata(path).map_err(|e| io_error("expand_paths", path, e))?;
        if metadata.is_dir() {
            let mut found = Vec::new();
            walk(path, &mut found)?;
            found.sort();
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }
    if files.is_empty() {
        return Err(invalid_input("expand_paths", "no .yaml or .yml files found"));
    }
    Ok(files)
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_error("expand_paths", dir, e))?;
    for entry in entries {
        let path = entry.map_err(|e| io_error("expand_paths", dir, e))?.path();
        if path.is_dir() {
            walk(&path, out)?;
        } else if is_manifest(&path) {
            out.push(path);
        }
    }
    Ok(())
}
