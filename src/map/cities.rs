use std::collections::HashMap;

use crate::foundation::error::{CityweaveError, CityweaveResult};

/// Stable node identifier shared by the city table, the edge list and every frame record.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct NodeId(pub u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One city: a geographic point plus descriptive fields.
#[derive(Clone, Debug, PartialEq)]
pub struct CityNode {
    /// Join key.
    pub id: NodeId,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// City name (descriptive only).
    pub name: String,
    /// Two-letter state code (descriptive only).
    pub state_code: String,
    /// Population, when the registry carries it.
    pub population: Option<u64>,
}

impl CityNode {
    /// City with coordinates only.
    pub fn at(id: u32, lat: f64, lng: f64) -> Self {
        Self {
            id: NodeId(id),
            lat,
            lng,
            name: String::new(),
            state_code: String::new(),
            population: None,
        }
    }

    /// Position in plotting order: `x = lng`, `y = lat`.
    pub fn coord(&self) -> geo::Coord<f64> {
        geo::coord! { x: self.lng, y: self.lat }
    }
}

// A direct-indexed table may waste at most this many slots per city.
const DENSE_SLOTS_PER_CITY: usize = 4;
const DENSE_SLACK: usize = 1024;

#[derive(Clone, Debug)]
enum IdIndex {
    Dense(Vec<Option<u32>>),
    Hashed(HashMap<NodeId, u32>),
}

/// Read-only `NodeId -> CityNode` lookup (the geo reference table).
///
/// Ids are used directly as array indices when the id space is dense enough; sparse id spaces
/// fall back to a hashed index. Either way lookups are O(1) and iteration follows input order.
#[derive(Clone, Debug)]
pub struct CityTable {
    nodes: Vec<CityNode>,
    index: IdIndex,
}

impl CityTable {
    /// Build the table, rejecting duplicate ids and out-of-range coordinates.
    pub fn from_nodes(nodes: Vec<CityNode>) -> CityweaveResult<Self> {
        if nodes.len() > u32::MAX as usize {
            return Err(CityweaveError::input("city table has too many rows"));
        }
        for n in &nodes {
            if !n.lat.is_finite() || !(-90.0..=90.0).contains(&n.lat) {
                return Err(CityweaveError::input(format!(
                    "city {} has invalid latitude {}",
                    n.id, n.lat
                )));
            }
            if !n.lng.is_finite() || !(-180.0..=180.0).contains(&n.lng) {
                return Err(CityweaveError::input(format!(
                    "city {} has invalid longitude {}",
                    n.id, n.lng
                )));
            }
        }

        let max_id = nodes.iter().map(|n| n.id.0 as usize).max();
        let dense = match max_id {
            Some(max) => max < nodes.len() * DENSE_SLOTS_PER_CITY + DENSE_SLACK,
            None => true,
        };

        let index = if dense {
            let mut slots = vec![None; max_id.map_or(0, |m| m + 1)];
            for (row, n) in nodes.iter().enumerate() {
                let slot = &mut slots[n.id.0 as usize];
                if slot.is_some() {
                    return Err(duplicate(n.id));
                }
                *slot = Some(row as u32);
            }
            IdIndex::Dense(slots)
        } else {
            let mut map = HashMap::with_capacity(nodes.len());
            for (row, n) in nodes.iter().enumerate() {
                if map.insert(n.id, row as u32).is_some() {
                    return Err(duplicate(n.id));
                }
            }
            IdIndex::Hashed(map)
        };

        tracing::debug!(cities = nodes.len(), dense, "built city table");
        Ok(Self { nodes, index })
    }

    fn row(&self, id: NodeId) -> Option<usize> {
        let row = match &self.index {
            IdIndex::Dense(slots) => slots.get(id.0 as usize).copied().flatten(),
            IdIndex::Hashed(map) => map.get(&id).copied(),
        };
        row.map(|r| r as usize)
    }

    /// Non-failing lookup.
    pub fn get(&self, id: NodeId) -> Option<&CityNode> {
        self.row(id).map(|r| &self.nodes[r])
    }

    /// Lookup that treats an unknown id as a referential integrity failure.
    pub fn lookup(&self, id: NodeId) -> CityweaveResult<&CityNode> {
        self.get(id).ok_or_else(|| {
            CityweaveError::reference(format!("node id {id} is not in the city table"))
        })
    }

    /// `(x = lng, y = lat)` of a node.
    pub fn coord(&self, id: NodeId) -> CityweaveResult<geo::Coord<f64>> {
        self.lookup(id).map(CityNode::coord)
    }

    /// `true` when `id` is present.
    pub fn contains(&self, id: NodeId) -> bool {
        self.row(id).is_some()
    }

    /// Node id of a city by name and state code.
    pub fn id_for(&self, name: &str, state_code: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|n| n.name == name && n.state_code == state_code)
            .map(|n| n.id)
    }

    /// Cities in input order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &CityNode> {
        self.nodes.iter()
    }

    /// Number of cities.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when the table has no cities.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// `true` when ids are used directly as indices.
    pub fn is_dense(&self) -> bool {
        matches!(self.index, IdIndex::Dense(_))
    }
}

fn duplicate(id: NodeId) -> CityweaveError {
    CityweaveError::input(format!("node id {id} appears more than once in the city table"))
}

#[cfg(test)]
#[path = "../../tests/unit/map/cities.rs"]
mod tests;
