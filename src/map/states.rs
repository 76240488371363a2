use geo::{BoundingRect, Centroid};

use crate::foundation::error::{CityweaveError, CityweaveResult};

/// One state outline with its postal label and label anchor.
#[derive(Clone, Debug, PartialEq)]
pub struct StateGeometry {
    /// Postal abbreviation drawn at the centroid.
    pub label: String,
    /// Boundary polygons in `(lng, lat)` coordinates.
    pub geometry: geo::MultiPolygon<f64>,
    /// Label anchor.
    pub centroid: geo::Point<f64>,
}

impl StateGeometry {
    /// Build a state, deriving the centroid from the geometry.
    pub fn new(label: impl Into<String>, geometry: geo::MultiPolygon<f64>) -> CityweaveResult<Self> {
        let label = label.into();
        let centroid = geometry.centroid().ok_or_else(|| {
            CityweaveError::input(format!("state '{label}' has empty geometry"))
        })?;
        Ok(Self {
            label,
            geometry,
            centroid,
        })
    }

    /// Axis-aligned bounds in `(lng, lat)`.
    pub fn bounds(&self) -> Option<geo::Rect<f64>> {
        self.geometry.bounding_rect()
    }
}

/// Convenience constructor for an axis-aligned rectangular state (tests and demos).
pub fn rect_state(
    label: &str,
    min_lng: f64,
    min_lat: f64,
    max_lng: f64,
    max_lat: f64,
) -> CityweaveResult<StateGeometry> {
    let poly = geo::Rect::new(
        geo::coord! { x: min_lng, y: min_lat },
        geo::coord! { x: max_lng, y: max_lat },
    )
    .to_polygon();
    StateGeometry::new(label, geo::MultiPolygon(vec![poly]))
}
