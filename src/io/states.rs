use std::path::Path;

use anyhow::Context as _;
use shapefile::dbase::{FieldValue, Record};
use shapefile::{PolygonRing, Shape};

use crate::foundation::error::{CityweaveError, CityweaveResult};
use crate::io::require_file;
use crate::map::states::StateGeometry;

/// Attribute holding the postal abbreviation in census state shapefiles.
pub const DEFAULT_LABEL_FIELD: &str = "STUSPS";

/// Load state outlines from a `.shp` file (with its `.dbf` sidecar).
///
/// Each polygon record becomes one [`StateGeometry`] labelled by `label_field`.
#[tracing::instrument]
pub fn load_states(path: &Path, label_field: &str) -> CityweaveResult<Vec<StateGeometry>> {
    require_file(path, "shp")?;
    let mut reader = shapefile::Reader::from_path(path)
        .with_context(|| format!("open shapefile '{}'", path.display()))?;

    let mut states = Vec::new();
    for (i, result) in reader.iter_shapes_and_records().enumerate() {
        let (shape, record) = result.with_context(|| {
            format!("read shape+record #{i} from '{}'", path.display())
        })?;
        let label = label_from_record(&record, label_field)
            .map_err(|msg| CityweaveError::input(format!("{}: record #{i}: {msg}", path.display())))?;
        let geometry = match shape {
            Shape::Polygon(p) => polygon_to_geo(&p),
            Shape::NullShape => continue,
            other => {
                return Err(CityweaveError::input(format!(
                    "{}: record #{i} ({label}) is a {:?}, expected Polygon",
                    path.display(),
                    other.shapetype()
                )));
            }
        };
        states.push(StateGeometry::new(label, geometry)?);
    }

    tracing::info!(states = states.len(), "loaded state outlines");
    Ok(states)
}

fn label_from_record(record: &Record, field: &str) -> Result<String, String> {
    match record.get(field) {
        Some(FieldValue::Character(Some(s))) => Ok(s.trim().to_string()),
        Some(FieldValue::Character(None)) => Err(format!("field '{field}' is empty")),
        Some(other) => Err(format!("field '{field}' is not a character field ({other:?})")),
        None => Err(format!("missing label field '{field}'")),
    }
}

/// Convert a shapefile polygon into a multipolygon, attaching each inner ring to the outer ring
/// that precedes it.
fn polygon_to_geo(p: &shapefile::Polygon) -> geo::MultiPolygon<f64> {
    fn closed(points: &[shapefile::Point]) -> geo::LineString<f64> {
        let mut coords: Vec<geo::Coord<f64>> = points
            .iter()
            .map(|pt| geo::coord! { x: pt.x, y: pt.y })
            .collect();
        if let (Some(first), Some(last)) = (coords.first().copied(), coords.last().copied())
            && first != last
        {
            coords.push(first);
        }
        geo::LineString(coords)
    }

    let mut polys = Vec::new();
    let mut exterior: Option<geo::LineString<f64>> = None;
    let mut holes = Vec::new();
    for ring in p.rings() {
        match ring {
            PolygonRing::Outer(points) => {
                if let Some(ext) = exterior.take() {
                    polys.push(geo::Polygon::new(ext, std::mem::take(&mut holes)));
                }
                exterior = Some(closed(points));
            }
            PolygonRing::Inner(points) => holes.push(closed(points)),
        }
    }
    if let Some(ext) = exterior {
        polys.push(geo::Polygon::new(ext, holes));
    }
    geo::MultiPolygon(polys)
}

#[cfg(test)]
#[path = "../../tests/unit/io/states.rs"]
mod tests;
