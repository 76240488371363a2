//! Per-frame traversal snapshots.

pub(crate) mod state;

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::foundation::core::FrameIndex;
use crate::foundation::error::CityweaveResult;
use state::FrameState;

/// One frame record file at its position in the animation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameFile {
    /// Position in playback order.
    pub index: FrameIndex,
    /// Location on disk.
    pub path: PathBuf,
}

impl FrameFile {
    /// File name used in frame captions.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Caption drawn on the rendered frame.
    pub fn caption(&self) -> String {
        format!("Frame {} File: {}", self.index.0, self.name())
    }

    /// Parse this frame.
    pub fn load(&self) -> CityweaveResult<FrameState> {
        FrameState::load(&self.path)
    }
}

/// Number an already ordered list of paths `0..N`.
pub fn number_frames(paths: impl IntoIterator<Item = PathBuf>) -> Vec<FrameFile> {
    paths
        .into_iter()
        .enumerate()
        .map(|(i, path)| FrameFile {
            index: FrameIndex(i as u64),
            path,
        })
        .collect()
}

/// Parse every frame in parallel. The result is in `files` order; the first failure (in frame
/// order) is returned.
pub fn load_all(files: &[FrameFile]) -> CityweaveResult<Vec<FrameState>> {
    let parsed: Vec<CityweaveResult<FrameState>> = files.par_iter().map(FrameFile::load).collect();
    parsed.into_iter().collect()
}

/// `true` when `path` looks like a frame record file.
pub(crate) fn is_frame_record(path: &Path) -> bool {
    path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("txt")
}
