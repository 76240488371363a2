//! Loading of the on-disk inputs: state outlines, city registry, edge list and frame records.

pub(crate) mod cities;
pub(crate) mod frames;
pub(crate) mod states;

use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{CityweaveError, CityweaveResult};
use crate::map::edges::{EdgePair, parse_edge_list};

/// Check that `path` is an existing file with extension `ext` (case-insensitive).
pub fn require_file(path: &Path, ext: &str) -> CityweaveResult<()> {
    if !path.exists() {
        return Err(CityweaveError::input(format!(
            "file '{}' does not exist",
            path.display()
        )));
    }
    if !path.is_file() {
        return Err(CityweaveError::input(format!(
            "'{}' is not a file",
            path.display()
        )));
    }
    let matches = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext));
    if !matches {
        return Err(CityweaveError::input(format!(
            "'{}': only '.{ext}' files are accepted",
            path.display()
        )));
    }
    Ok(())
}

/// Read and parse an edge-list file.
#[tracing::instrument]
pub fn read_edge_list(path: &Path) -> CityweaveResult<Vec<EdgePair>> {
    if !path.is_file() {
        return Err(CityweaveError::input(format!(
            "edge list '{}' does not exist",
            path.display()
        )));
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read edge list '{}'", path.display()))?;
    let pairs = parse_edge_list(&text, path)?;
    tracing::info!(edges = pairs.len(), "read edge list");
    Ok(pairs)
}
