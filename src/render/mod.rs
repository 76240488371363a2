//! Scene compilation and CPU rasterization.

pub(crate) mod cpu;
pub(crate) mod plan;
pub(crate) mod style;
pub(crate) mod text;
pub(crate) mod viewport;

use crate::foundation::core::{Canvas, FrameIndex};
use crate::foundation::error::CityweaveResult;
use crate::frames::state::FrameState;

/// A rendered frame as RGBA8 pixels.
///
/// Pixels are premultiplied when `premultiplied` is set (what the CPU renderer produces).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)`; `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data.get(i..i + 4).map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Straight-alpha copy of the pixel data, as image encoders expect.
    pub fn to_straight_rgba(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.premultiplied {
            for px in out.chunks_exact_mut(4) {
                let a = u16::from(px[3]);
                if a == 0 || a == 255 {
                    continue;
                }
                for c in &mut px[..3] {
                    *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
                }
            }
        }
        out
    }
}

/// Something that turns one frame's node statuses into pixels.
///
/// The animation driver only talks to this trait, so tests can substitute a recorder.
pub trait FrameRenderer {
    /// Output size; constant for the renderer's lifetime.
    fn canvas(&self) -> Canvas;

    /// Draw the complete scene for frame `idx`.
    fn render(
        &mut self,
        idx: FrameIndex,
        frame: &FrameState,
        caption: &str,
    ) -> CityweaveResult<FrameRGBA>;
}
