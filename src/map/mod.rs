//! Immutable map inputs: the city table, state outlines and resolved edge geometry.

pub(crate) mod cities;
pub(crate) mod edges;
pub(crate) mod states;

use crate::foundation::error::CityweaveResult;
use cities::CityTable;
use edges::{EdgeGeometry, EdgePair};
use states::StateGeometry;

/// Everything that stays fixed for the whole animation.
///
/// Built once, then shared read-only by every frame.
#[derive(Clone, Debug)]
pub struct MapScene {
    /// State outlines in draw order.
    pub states: Vec<StateGeometry>,
    /// City lookup table.
    pub cities: CityTable,
    /// Resolved edges.
    pub edges: EdgeGeometry,
}

impl MapScene {
    /// Resolve `pairs` against `cities` and bundle the result.
    pub fn new(
        states: Vec<StateGeometry>,
        cities: CityTable,
        pairs: &[EdgePair],
    ) -> CityweaveResult<Self> {
        let edges = EdgeGeometry::build(pairs, &cities)?;
        Ok(Self {
            states,
            cities,
            edges,
        })
    }

    /// `(lng, lat)` bounds of all states and cities, if there is anything to bound.
    pub fn bounds(&self) -> Option<geo::Rect<f64>> {
        let mut acc: Option<(geo::Coord<f64>, geo::Coord<f64>)> = None;
        let mut extend = |min: geo::Coord<f64>, max: geo::Coord<f64>| {
            acc = Some(match acc {
                None => (min, max),
                Some((lo, hi)) => (
                    geo::coord! { x: lo.x.min(min.x), y: lo.y.min(min.y) },
                    geo::coord! { x: hi.x.max(max.x), y: hi.y.max(max.y) },
                ),
            });
        };
        for s in &self.states {
            if let Some(b) = s.bounds() {
                extend(b.min(), b.max());
            }
        }
        for c in self.cities.iter() {
            extend(c.coord(), c.coord());
        }
        acc.map(|(min, max)| geo::Rect::new(min, max))
    }
}
