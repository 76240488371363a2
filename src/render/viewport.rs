use crate::foundation::core::{Affine, Canvas, Point, Rect};
use crate::foundation::error::{CityweaveError, CityweaveResult};

/// Extent used along an axis whose data span is zero (a single city, say).
const MIN_SPAN_DEG: f64 = 1.0;

/// Mapping from `(lng, lat)` degrees to canvas pixels.
///
/// The map is fitted into `plot` with zero margins. One degree of latitude is drawn
/// `1 / cos(mid_lat)` times taller than one degree of longitude so shapes keep their
/// familiar proportions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    to_px: Affine,
    plot: Rect,
}

impl Viewport {
    /// Fit `bounds` into the canvas below a caption band of `top_band` pixels.
    pub fn fit(bounds: geo::Rect<f64>, canvas: Canvas, top_band: f64) -> CityweaveResult<Self> {
        let w = f64::from(canvas.width);
        let h = f64::from(canvas.height);
        if !top_band.is_finite() || top_band < 0.0 || top_band >= h {
            return Err(CityweaveError::render(format!(
                "caption band of {top_band}px leaves no room on a {}x{} canvas",
                canvas.width, canvas.height
            )));
        }
        let plot = Rect::new(0.0, top_band, w, h);

        let (mut min, mut max) = (bounds.min(), bounds.max());
        for (lo, hi) in [(&mut min.x, &mut max.x), (&mut min.y, &mut max.y)] {
            if *hi - *lo <= 0.0 {
                *lo -= MIN_SPAN_DEG / 2.0;
                *hi += MIN_SPAN_DEG / 2.0;
            }
        }

        let mid_lat = ((min.y + max.y) / 2.0).to_radians();
        let aspect = 1.0 / mid_lat.cos().max(1e-6);
        let data_w = max.x - min.x;
        let data_h = (max.y - min.y) * aspect;
        let scale = (plot.width() / data_w).min(plot.height() / data_h);
        if !scale.is_finite() || scale <= 0.0 {
            return Err(CityweaveError::render("map bounds cannot be fitted to the canvas"));
        }

        let ox = plot.x0 + (plot.width() - data_w * scale) / 2.0;
        let oy = plot.y0 + (plot.height() - data_h * scale) / 2.0;
        let sy = scale * aspect;
        let to_px = Affine::new([scale, 0.0, 0.0, -sy, ox - min.x * scale, oy + max.y * sy]);

        Ok(Self { to_px, plot })
    }

    /// Pixel position of a `(lng, lat)` coordinate.
    pub fn project(&self, c: geo::Coord<f64>) -> Point {
        self.to_px * Point::new(c.x, c.y)
    }

    /// Area the map is fitted into.
    pub fn plot_area(&self) -> Rect {
        self.plot
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/viewport.rs"]
mod tests;
