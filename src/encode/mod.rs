//! Frame sinks: MP4 via `ffmpeg`, animated GIF, PNG sequence and in-memory capture.

pub mod ffmpeg;
pub mod gif;
pub mod png_seq;
pub mod sink;

use std::path::Path;

use crate::foundation::core::Rgba8;
use sink::FrameSink;

/// Output format chosen from the output path's extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputKind {
    Mp4,
    Gif,
    /// Anything else is treated as a directory of PNG frames.
    PngSequence,
}

impl OutputKind {
    pub fn for_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("mp4") => Self::Mp4,
            Some("gif") => Self::Gif,
            _ => Self::PngSequence,
        }
    }
}

/// Build the sink for `path`; `background` flattens translucent pixels for MP4.
pub fn sink_for_path(path: &Path, background: Rgba8) -> Box<dyn FrameSink> {
    match OutputKind::for_path(path) {
        OutputKind::Mp4 => {
            let bg = [background.r, background.g, background.b, 255];
            Box::new(ffmpeg::FfmpegSink::new(path, bg))
        }
        OutputKind::Gif => Box::new(gif::GifSink::new(path)),
        OutputKind::PngSequence => Box::new(png_seq::PngSequenceSink::new(path)),
    }
}
