//! Edge outputs.

use crate::vector::NodeId;
use serde::{Deserialize, Serialize};

/// Ephemeral relation between two vectors, by position in the evaluated collection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Relation {
    pub a: usize,
    pub b: usize,
    pub r: f64,
}

impl Relation {
    /// Unordered index pair, lower index first.
    #[inline]
    pub fn key(&self) -> (usize, usize) {
        if self.a <= self.b {
            (self.a, self.b)
        } else {
            (self.b, self.a)
        }
    }
}

/// Weighted edge between two graph nodes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub weight: f64,
}

/// Edges produced by one correlation run.
pub type EdgeList = Vec<Edge>;
