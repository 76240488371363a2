use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};

use crate::encode::ffmpeg::ensure_parent_dir;
use crate::encode::sink::{FrameOrder, FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{CityweaveError, CityweaveResult};
use crate::render::FrameRGBA;

/// Encoded GIF bytes, shared with the encoder so they can be taken back after it is dropped.
#[derive(Clone, Default)]
struct GifBuffer(Arc<Mutex<Vec<u8>>>);

impl GifBuffer {
    fn take(&self) -> Vec<u8> {
        std::mem::take(&mut *self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Write for GifBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Looping animated GIF; each frame is shown for the playback interval.
///
/// Frames are encoded in memory. `end` writes them to `<out>.partial`, syncs it and renames it
/// into place; any write failure is reported and leaves no file behind.
pub struct GifSink {
    out_path: PathBuf,
    partial_path: PathBuf,
    encoder: Option<GifEncoder<GifBuffer>>,
    buffer: GifBuffer,
    cfg: Option<SinkConfig>,
    order: FrameOrder,
}

impl GifSink {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        let out_path = out_path.into();
        let partial_path = partial_path_for(&out_path);
        Self {
            out_path,
            partial_path,
            encoder: None,
            buffer: GifBuffer::default(),
            cfg: None,
            order: FrameOrder::default(),
        }
    }

    fn write_partial(&self, bytes: &[u8]) -> CityweaveResult<()> {
        let fail = |what: &str, e: std::io::Error| {
            CityweaveError::export(&self.out_path, format!("{what} failed: {e}"))
        };
        let mut file = File::create(&self.partial_path).map_err(|e| fail("create", e))?;
        file.write_all(bytes).map_err(|e| fail("write", e))?;
        file.sync_all().map_err(|e| fail("sync", e))?;
        std::fs::rename(&self.partial_path, &self.out_path).map_err(|e| fail("rename", e))
    }
}

fn partial_path_for(out: &Path) -> PathBuf {
    let mut name = out.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".partial");
    out.with_file_name(name)
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> CityweaveResult<()> {
        if cfg.frame_interval_ms == 0 {
            return Err(CityweaveError::export(
                &self.out_path,
                "frame interval must be > 0 ms",
            ));
        }
        ensure_parent_dir(&self.out_path)?;
        self.buffer = GifBuffer::default();
        let mut encoder = GifEncoder::new(self.buffer.clone());
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| CityweaveError::export(&self.out_path, e.to_string()))?;

        tracing::info!(
            out = %self.out_path.display(),
            interval_ms = cfg.frame_interval_ms,
            "gif encode started"
        );
        self.encoder = Some(encoder);
        self.cfg = Some(cfg);
        self.order = FrameOrder::default();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> CityweaveResult<()> {
        let (Some(cfg), Some(encoder)) = (self.cfg, self.encoder.as_mut()) else {
            return Err(CityweaveError::export(&self.out_path, "gif sink not started"));
        };
        self.order.check(&cfg, idx, frame)?;

        let img = RgbaImage::from_raw(frame.width, frame.height, frame.to_straight_rgba())
            .ok_or_else(|| CityweaveError::render("frame buffer does not match its size"))?;
        let delay = Delay::from_numer_denom_ms(cfg.frame_interval_ms, 1);
        encoder
            .encode_frame(Frame::from_parts(img, 0, 0, delay))
            .map_err(|e| CityweaveError::export(&self.out_path, e.to_string()))
    }

    fn end(&mut self) -> CityweaveResult<()> {
        let Some(encoder) = self.encoder.take() else {
            return Err(CityweaveError::export(&self.out_path, "gif sink not started"));
        };
        // Dropping the encoder appends the trailer to the in-memory buffer.
        drop(encoder);
        let bytes = self.buffer.take();
        if let Err(e) = self.write_partial(&bytes) {
            self.abort();
            return Err(e);
        }
        self.cfg = None;
        tracing::info!(out = %self.out_path.display(), bytes = bytes.len(), "gif written");
        Ok(())
    }

    fn abort(&mut self) {
        drop(self.encoder.take());
        self.buffer.take();
        self.cfg = None;
        if self.partial_path.symlink_metadata().is_ok() {
            let _ = std::fs::remove_file(&self.partial_path);
        }
    }
}
