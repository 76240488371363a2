use std::path::{Path, PathBuf};

use crate::encode::sink::{FrameOrder, FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{CityweaveError, CityweaveResult};
use crate::render::FrameRGBA;

/// Writes `frame_00000.png`, `frame_00001.png`, ... into a directory.
///
/// `begin` deletes `frame_*.png` files left by an earlier run, so the directory always holds
/// exactly the frames of the latest run.
pub struct PngSequenceSink {
    dir: PathBuf,
    created_dir: bool,
    written: Vec<PathBuf>,
    cfg: Option<SinkConfig>,
    order: FrameOrder,
}

impl PngSequenceSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            created_dir: false,
            written: Vec::new(),
            cfg: None,
            order: FrameOrder::default(),
        }
    }

    /// File name used for frame `idx`.
    pub fn file_name(idx: FrameIndex) -> String {
        format!("frame_{:05}.png", idx.0)
    }

    fn is_frame_file(name: &str) -> bool {
        name.starts_with("frame_") && name.ends_with(".png")
    }

    fn remove_stale_frames(&self) -> CityweaveResult<usize> {
        use anyhow::Context as _;
        let rd = std::fs::read_dir(&self.dir)
            .with_context(|| format!("list output directory '{}'", self.dir.display()))?;
        let mut removed = 0;
        for entry in rd {
            let path = entry
                .with_context(|| format!("list output directory '{}'", self.dir.display()))?
                .path();
            let stale = path.is_file()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(Self::is_frame_file);
            if stale {
                std::fs::remove_file(&path).map_err(|e| {
                    CityweaveError::export(&path, format!("remove stale frame failed: {e}"))
                })?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Files written so far, in frame order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> CityweaveResult<()> {
        use anyhow::Context as _;
        if self.dir.is_file() {
            return Err(CityweaveError::export(&self.dir, "output path is a file"));
        }
        self.created_dir = !self.dir.exists();
        if self.created_dir {
            std::fs::create_dir_all(&self.dir)
                .with_context(|| format!("create output directory '{}'", self.dir.display()))?;
        } else {
            let removed = self.remove_stale_frames()?;
            if removed > 0 {
                tracing::info!(dir = %self.dir.display(), removed, "removed frames of an earlier run");
            }
        }
        self.written.clear();
        self.cfg = Some(cfg);
        self.order = FrameOrder::default();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> CityweaveResult<()> {
        let Some(cfg) = self.cfg else {
            return Err(CityweaveError::export(&self.dir, "png sink not started"));
        };
        self.order.check(&cfg, idx, frame)?;

        let path = self.dir.join(Self::file_name(idx));
        write_png(&path, frame)?;
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> CityweaveResult<()> {
        self.cfg = None;
        tracing::info!(
            dir = %self.dir.display(),
            frames = self.written.len(),
            "png sequence written"
        );
        Ok(())
    }

    fn abort(&mut self) {
        for p in self.written.drain(..) {
            let _ = std::fs::remove_file(p);
        }
        if self.created_dir {
            let _ = std::fs::remove_dir(&self.dir);
            self.created_dir = false;
        }
        self.cfg = None;
    }
}

/// Write one frame as a straight-alpha PNG.
pub fn write_png(path: &Path, frame: &FrameRGBA) -> CityweaveResult<()> {
    image::save_buffer_with_format(
        path,
        &frame.to_straight_rgba(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| CityweaveError::export(path, e.to_string()))
}
