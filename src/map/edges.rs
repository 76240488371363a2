use std::path::Path;

use crate::foundation::error::{CityweaveError, CityweaveResult};
use crate::map::cities::{CityTable, NodeId};

/// One undirected edge as listed in the edge file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EdgePair {
    /// First endpoint.
    pub source: NodeId,
    /// Second endpoint.
    pub destination: NodeId,
}

impl EdgePair {
    /// Edge between two raw ids.
    pub fn new(source: u32, destination: u32) -> Self {
        Self {
            source: NodeId(source),
            destination: NodeId(destination),
        }
    }
}

/// Parse an edge list: two whitespace-separated non-negative integers per line.
///
/// Blank lines and lines starting with `%` are skipped. `origin` only labels errors.
pub fn parse_edge_list(text: &str, origin: &Path) -> CityweaveResult<Vec<EdgePair>> {
    let mut out = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('%') {
            continue;
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        let [src, dst] = tokens.as_slice() else {
            return Err(CityweaveError::parse(
                origin,
                line_no,
                format!("expected 2 node ids, got {} tokens", tokens.len()),
            ));
        };
        let parse_id = |tok: &str| -> CityweaveResult<u32> {
            tok.parse::<u32>().map_err(|_| {
                CityweaveError::parse(
                    origin,
                    line_no,
                    format!("'{tok}' is not a non-negative integer node id"),
                )
            })
        };
        out.push(EdgePair::new(parse_id(src)?, parse_id(dst)?));
    }
    Ok(out)
}

/// Edge segments resolved once against the city table.
///
/// `segments()[i]` is the resolved form of `pairs()[i]`, running from the source's `(lng, lat)`
/// to the destination's `(lng, lat)`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeGeometry {
    pairs: Vec<EdgePair>,
    segments: Vec<geo::Line<f64>>,
}

impl EdgeGeometry {
    /// Resolve every pair. A single unknown endpoint fails the whole build.
    pub fn build(pairs: &[EdgePair], cities: &CityTable) -> CityweaveResult<Self> {
        let mut segments = Vec::with_capacity(pairs.len());
        for (i, e) in pairs.iter().enumerate() {
            let resolve = |id: NodeId| {
                cities.coord(id).map_err(|_| {
                    CityweaveError::reference(format!(
                        "edge #{i} ({} - {}) references node id {id} which is not in the city table",
                        e.source, e.destination
                    ))
                })
            };
            segments.push(geo::Line::new(resolve(e.source)?, resolve(e.destination)?));
        }
        tracing::info!(edges = segments.len(), "resolved edge geometry");
        Ok(Self {
            pairs: pairs.to_vec(),
            segments,
        })
    }

    /// Input pairs in order.
    pub fn pairs(&self) -> &[EdgePair] {
        &self.pairs
    }

    /// Resolved segments in input order.
    pub fn segments(&self) -> &[geo::Line<f64>] {
        &self.segments
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// `true` when there are no edges.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/map/edges.rs"]
mod tests;
