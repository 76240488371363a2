use crate::foundation::error::{CityweaveError, CityweaveResult};

pub use kurbo::{Affine, BezPath, Point, Rect};

/// Absolute 0-based frame index in animation order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> CityweaveResult<Self> {
        if den == 0 {
            return Err(CityweaveError::input("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(CityweaveError::input("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Largest edge the CPU raster context accepts.
    pub const MAX_DIM: u32 = u16::MAX as u32;

    /// Create a validated canvas.
    pub fn new(width: u32, height: u32) -> CityweaveResult<Self> {
        if width == 0 || height == 0 {
            return Err(CityweaveError::input("canvas width/height must be non-zero"));
        }
        if width > Self::MAX_DIM || height > Self::MAX_DIM {
            return Err(CityweaveError::input(format!(
                "canvas {width}x{height} exceeds {0}x{0}",
                Self::MAX_DIM
            )));
        }
        Ok(Self { width, height })
    }

    /// Canvas matching a figure size in inches at a given dpi, rounded down to even pixels so
    /// the result stays encodable as yuv420p.
    pub fn from_figsize(width_in: f64, height_in: f64, dpi: f64) -> CityweaveResult<Self> {
        if !(width_in.is_finite() && height_in.is_finite() && dpi.is_finite()) {
            return Err(CityweaveError::input("figsize and dpi must be finite"));
        }
        let to_px = |inches: f64| -> u32 {
            let px = (inches * dpi).floor().max(0.0) as u32;
            px - (px % 2)
        };
        Self::new(to_px(width_in), to_px(height_in))
    }

    /// Size of one straight RGBA8 frame in bytes.
    pub fn rgba8_len(self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }
}

impl Default for Canvas {
    /// 12x5 inches at 100 dpi.
    fn default() -> Self {
        Self {
            width: 1200,
            height: 500,
        }
    }
}

/// Straight-alpha RGBA8 colour. The default is transparent black.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque colour from RGB.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Colour from RGBA.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same colour with alpha multiplied by `alpha` (clamped to `[0, 1]`).
    pub fn with_alpha_mul(self, alpha: f64) -> Self {
        let a = (f64::from(self.a) * alpha.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    /// Premultiplied RGBA8 bytes.
    pub fn to_premul_array(self) -> [u8; 4] {
        let a16 = u16::from(self.a);
        let premul = |c: u8| -> u8 { (((u16::from(c) * a16) + 127) / 255) as u8 };
        [premul(self.r), premul(self.g), premul(self.b), self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
