use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{CityweaveError, CityweaveResult};
use crate::frames::{FrameFile, is_frame_record, number_frames};

/// List the `*.txt` frame records in `dir`, sorted lexicographically by file name.
///
/// Callers name files so that lexicographic order is playback order (zero-padded indices). An
/// empty directory yields an empty list; deciding that there is nothing to animate is the
/// driver's job.
#[tracing::instrument]
pub fn discover_frames(dir: &Path) -> CityweaveResult<Vec<FrameFile>> {
    if !dir.is_dir() {
        return Err(CityweaveError::input(format!(
            "frame directory '{}' does not exist",
            dir.display()
        )));
    }

    let rd = std::fs::read_dir(dir)
        .with_context(|| format!("list frame directory '{}'", dir.display()))?;
    let mut paths = Vec::<PathBuf>::new();
    for entry in rd {
        let entry = entry.with_context(|| format!("list frame directory '{}'", dir.display()))?;
        let path = entry.path();
        if is_frame_record(&path) {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    tracing::info!(frames = paths.len(), dir = %dir.display(), "discovered frame records");
    Ok(number_frames(paths))
}
