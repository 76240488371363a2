use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgba8;
use crate::foundation::error::{CityweaveError, CityweaveResult};

/// Marker glyph used for a node layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerShape {
    #[serde(rename = "o")]
    Circle,
    #[serde(rename = "x")]
    Cross,
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "*")]
    Star,
    #[serde(rename = "s")]
    Square,
    #[serde(rename = "^")]
    Triangle,
    #[serde(rename = "D")]
    Diamond,
}

impl MarkerShape {
    /// Line-only markers are stroked; the rest are filled.
    pub fn is_stroked(self) -> bool {
        matches!(self, Self::Cross | Self::Plus)
    }
}

/// Categorical palette used for the state fill.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    #[default]
    Pastel1,
    Pastel2,
    Set3,
    Tab10,
    Viridis,
}

const PASTEL1: [u32; 9] = [
    0xfbb4ae, 0xb3cde3, 0xccebc5, 0xdecbe4, 0xfed9a6, 0xffffcc, 0xe5d8bd, 0xfddaec, 0xf2f2f2,
];
const PASTEL2: [u32; 8] = [
    0xb3e2cd, 0xfdcdac, 0xcbd5e8, 0xf4cae4, 0xe6f5c9, 0xfff2ae, 0xf1e2cc, 0xcccccc,
];
const SET3: [u32; 12] = [
    0x8dd3c7, 0xffffb3, 0xbebada, 0xfb8072, 0x80b1d3, 0xfdb462, 0xb3de69, 0xfccde5, 0xd9d9d9,
    0xbc80bd, 0xccebc5, 0xffed6f,
];
const TAB10: [u32; 10] = [
    0x1f77b4, 0xff7f0e, 0x2ca02c, 0xd62728, 0x9467bd, 0x8c564b, 0xe377c2, 0x7f7f7f, 0xbcbd22,
    0x17becf,
];
// Evenly spaced stops, linearly interpolated.
const VIRIDIS: [u32; 9] = [
    0x440154, 0x472d7b, 0x3b528b, 0x2c728e, 0x21918c, 0x28ae80, 0x5ec962, 0xaddc30, 0xfde725,
];

fn hex(c: u32) -> Rgba8 {
    Rgba8::rgb((c >> 16) as u8, (c >> 8) as u8, c as u8)
}

impl Colormap {
    /// Colour for item `i` of `n`, sampling the palette evenly across `[0, 1]`.
    pub fn color_at(self, i: usize, n: usize) -> Rgba8 {
        let t = if n <= 1 {
            0.0
        } else {
            i.min(n - 1) as f64 / (n - 1) as f64
        };
        let listed = |table: &[u32]| {
            let idx = ((t * table.len() as f64) as usize).min(table.len() - 1);
            hex(table[idx])
        };
        match self {
            Self::Pastel1 => listed(&PASTEL1),
            Self::Pastel2 => listed(&PASTEL2),
            Self::Set3 => listed(&SET3),
            Self::Tab10 => listed(&TAB10),
            Self::Viridis => {
                let pos = t * (VIRIDIS.len() - 1) as f64;
                let lo = (pos.floor() as usize).min(VIRIDIS.len() - 1);
                let hi = (lo + 1).min(VIRIDIS.len() - 1);
                let f = pos - lo as f64;
                let (a, b) = (hex(VIRIDIS[lo]), hex(VIRIDIS[hi]));
                let mix = |x: u8, y: u8| (f64::from(x) + (f64::from(y) - f64::from(x)) * f).round() as u8;
                Rgba8::rgb(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b))
            }
        }
    }
}

/// Marker appearance for one node class.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerStyle {
    pub shape: MarkerShape,
    /// Diameter in pixels.
    pub size: f64,
    pub color: Rgba8,
}

/// Every visual knob of a rendered frame.
///
/// Any field may be omitted from JSON; unknown fields are rejected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleConfig {
    pub boundary_linewidth: f64,
    pub boundary_color: Rgba8,
    pub fill_colormap: Colormap,
    pub normal_marker: MarkerShape,
    pub normal_size: f64,
    pub normal_color: Rgba8,
    pub visited_marker: MarkerShape,
    pub visited_size: f64,
    pub visited_color: Rgba8,
    pub ap_marker: MarkerShape,
    pub ap_size: f64,
    pub ap_color: Rgba8,
    pub edge_color: Rgba8,
    pub edge_alpha: f64,
    pub edge_linewidth: f64,
    pub background_color: Rgba8,
    pub label_color: Rgba8,
    pub label_size: f64,
    pub caption_color: Rgba8,
    pub caption_size: f64,
    pub show_labels: bool,
    /// Font file for labels and caption; the system sans-serif face when unset.
    pub font_path: Option<std::path::PathBuf>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            boundary_linewidth: 0.8,
            boundary_color: Rgba8::rgb(0, 0, 0),
            fill_colormap: Colormap::Pastel1,
            normal_marker: MarkerShape::Cross,
            normal_size: 4.0,
            normal_color: Rgba8::rgb(0, 0, 0),
            visited_marker: MarkerShape::Circle,
            visited_size: 10.0,
            visited_color: Rgba8::rgb(255, 255, 0),
            ap_marker: MarkerShape::Circle,
            ap_size: 10.0,
            ap_color: Rgba8::rgb(255, 0, 0),
            edge_color: Rgba8::rgb(0x66, 0x99, 0xcc),
            edge_alpha: 0.7,
            edge_linewidth: 1.5,
            background_color: Rgba8::rgb(255, 255, 255),
            label_color: Rgba8::rgb(255, 255, 255),
            label_size: 8.0,
            caption_color: Rgba8::rgb(0, 0, 0),
            caption_size: 14.0,
            show_labels: true,
            font_path: None,
        }
    }
}

impl StyleConfig {
    /// Parse a JSON style document and validate it.
    pub fn from_json_str(s: &str) -> CityweaveResult<Self> {
        let style: Self =
            serde_json::from_str(s).map_err(|e| CityweaveError::serde(e.to_string()))?;
        style.validate()?;
        Ok(style)
    }

    /// Reject non-finite or negative sizes and alphas outside `[0, 1]`.
    pub fn validate(&self) -> CityweaveResult<()> {
        let sizes = [
            ("boundary_linewidth", self.boundary_linewidth),
            ("normal_size", self.normal_size),
            ("visited_size", self.visited_size),
            ("ap_size", self.ap_size),
            ("edge_linewidth", self.edge_linewidth),
            ("label_size", self.label_size),
            ("caption_size", self.caption_size),
        ];
        for (name, v) in sizes {
            if !v.is_finite() || v < 0.0 {
                return Err(CityweaveError::input(format!(
                    "style.{name} must be finite and >= 0 (got {v})"
                )));
            }
        }
        if !self.edge_alpha.is_finite() || !(0.0..=1.0).contains(&self.edge_alpha) {
            return Err(CityweaveError::input(format!(
                "style.edge_alpha must be in [0, 1] (got {})",
                self.edge_alpha
            )));
        }
        Ok(())
    }

    pub fn normal(&self) -> MarkerStyle {
        MarkerStyle {
            shape: self.normal_marker,
            size: self.normal_size,
            color: self.normal_color,
        }
    }

    pub fn visited(&self) -> MarkerStyle {
        MarkerStyle {
            shape: self.visited_marker,
            size: self.visited_size,
            color: self.visited_color,
        }
    }

    pub fn articulation(&self) -> MarkerStyle {
        MarkerStyle {
            shape: self.ap_marker,
            size: self.ap_size,
            color: self.ap_color,
        }
    }

    /// Edge colour with `edge_alpha` applied.
    pub fn edge_paint(&self) -> Rgba8 {
        self.edge_color.with_alpha_mul(self.edge_alpha)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/style.rs"]
mod tests;
