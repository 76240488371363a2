use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{CityweaveError, CityweaveResult};
use crate::map::cities::{CityTable, NodeId};

/// Traversal status of one node in one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FrameStatus {
    /// The traversal has reached this node.
    pub visited: bool,
    /// The node is currently an articulation point.
    pub is_articulation_point: bool,
}

/// Which marker style a node is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeClass {
    /// Neither visited nor an articulation point.
    Normal,
    /// Visited, not an articulation point.
    Visited,
    /// Articulation point (regardless of visited).
    Articulation,
}

impl FrameStatus {
    /// Status with both flags set explicitly.
    pub fn new(visited: bool, is_articulation_point: bool) -> Self {
        Self {
            visited,
            is_articulation_point,
        }
    }

    /// Articulation status overrides visited status.
    pub fn class(self) -> NodeClass {
        if self.is_articulation_point {
            NodeClass::Articulation
        } else if self.visited {
            NodeClass::Visited
        } else {
            NodeClass::Normal
        }
    }
}

/// Per-node statuses for one frame.
///
/// A frame is a full snapshot: nodes absent from it are `(false, false)`, and it is never merged
/// with another frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameState {
    statuses: BTreeMap<NodeId, FrameStatus>,
}

impl FrameState {
    /// Empty snapshot (every node normal).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse frame text: `node_id visited(0|1) is_articulation_point(0|1)` per line.
    ///
    /// Blank lines are ignored. Anything else malformed, including a node listed twice, fails
    /// the whole frame. `origin` only labels errors.
    pub fn parse(text: &str, origin: &Path) -> CityweaveResult<Self> {
        let mut statuses = BTreeMap::new();
        for (i, line) in text.lines().enumerate() {
            let line_no = i + 1;
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.is_empty() {
                continue;
            }
            let [id, visited, ap] = tokens.as_slice() else {
                return Err(CityweaveError::parse(
                    origin,
                    line_no,
                    format!("expected 3 tokens, got {}", tokens.len()),
                ));
            };

            let id = id.parse::<u32>().map(NodeId).map_err(|_| {
                CityweaveError::parse(
                    origin,
                    line_no,
                    format!("'{id}' is not a non-negative integer node id"),
                )
            })?;
            let flag = |tok: &str, what: &str| -> CityweaveResult<bool> {
                match tok {
                    "0" => Ok(false),
                    "1" => Ok(true),
                    _ => Err(CityweaveError::parse(
                        origin,
                        line_no,
                        format!("{what} flag must be 0 or 1, got '{tok}'"),
                    )),
                }
            };
            let status = FrameStatus::new(flag(visited, "visited")?, flag(ap, "articulation")?);

            if statuses.insert(id, status).is_some() {
                return Err(CityweaveError::parse(
                    origin,
                    line_no,
                    format!("node id {id} is listed more than once"),
                ));
            }
        }
        Ok(Self { statuses })
    }

    /// Read and parse one frame file.
    #[tracing::instrument(level = "debug")]
    pub fn load(path: &Path) -> CityweaveResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read frame file '{}'", path.display()))?;
        Self::parse(&text, path)
    }

    /// Status of `id`, defaulting to `(false, false)` when absent.
    pub fn status(&self, id: NodeId) -> FrameStatus {
        self.statuses.get(&id).copied().unwrap_or_default()
    }

    /// Explicitly listed nodes, ascending by id.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, FrameStatus)> + '_ {
        self.statuses.iter().map(|(id, s)| (*id, *s))
    }

    /// Number of explicitly listed nodes.
    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    /// `true` when no node is listed.
    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    /// Number of listed nodes in `class`.
    pub fn count(&self, class: NodeClass) -> usize {
        self.statuses.values().filter(|s| s.class() == class).count()
    }

    /// Fail with a reference error if any listed node is missing from `cities`.
    pub fn validate_against(&self, cities: &CityTable) -> CityweaveResult<()> {
        match self.statuses.keys().find(|id| !cities.contains(**id)) {
            Some(id) => Err(CityweaveError::reference(format!(
                "frame lists node id {id} which is not in the city table"
            ))),
            None => Ok(()),
        }
    }
}

impl FromIterator<(NodeId, FrameStatus)> for FrameState {
    fn from_iter<T: IntoIterator<Item = (NodeId, FrameStatus)>>(iter: T) -> Self {
        Self {
            statuses: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frames/state.rs"]
mod tests;
