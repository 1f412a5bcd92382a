//! Graph-side data model: dense node ids and typed weighted edges.

use serde::{Deserialize, Serialize};

/// Dense node identifier. Assigned by the engine on first reference to a
/// path; never reused within a single engine instance.
pub type NodeId = u32;

/// Closed set of edge kinds the graph index understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// One module importing another.
    Imports,
    /// One function calling another.
    Calls,
    /// A type extending a base type.
    Extends,
    /// A type implementing an interface/trait.
    Implements,
    /// Any relationship not covered by the other kinds.
    Generic,
}

/// A directed, weighted edge between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Source node.
    pub from: NodeId,
    /// Destination node.
    pub to: NodeId,
    /// Structural weight used for routing. Always `>= 0`.
    pub weight: f32,
    /// The relationship this edge represents.
    pub kind: EdgeKind,
    /// An optional learned weight (e.g. from reinforcement-learning
    /// feedback external to the core). Participates in hybrid scoring,
    /// never in shortest-path routing.
    pub optional_weight: Option<f32>,
}

impl Edge {
    /// Construct a new edge. Does not validate `weight`; callers at the
    /// façade boundary are responsible for rejecting negative or NaN
    /// weights with [`crate::error::Error::InvalidArgument`].
    pub fn new(from: NodeId, to: NodeId, weight: f32, kind: EdgeKind) -> Self {
        Edge {
            from,
            to,
            weight,
            kind,
            optional_weight: None,
        }
    }

    /// Builder: attach a learned weight.
    pub fn with_optional_weight(mut self, w: f32) -> Self {
        self.optional_weight = Some(w);
        self
    }
}
