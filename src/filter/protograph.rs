//! Concurrent bounded top-K edge structure backing k-NN filtering.
//!
//! One proto-node per vector, each holding at most `k` candidate edges sorted
//! strongest first behind its own lock. Both endpoints of a pair receive an
//! insertion attempt independently, so a pair can survive at one endpoint
//! and be rejected at the other.
//!
//! Strength is polarity-aware (`r`, `-r` or `|r|`). Ties are broken by the
//! lower neighbour index, which makes the retained set independent of
//! insertion order.

use crate::config::CorrelationPolarity;
use crate::edge::Relation;
use crate::filter::correlation_exceeds_threshold;
use parking_lot::Mutex;
use smallvec::SmallVec;
use std::cmp::Ordering;

/// Inline capacity of a proto-node's edge list before spilling to the heap.
const INLINE_EDGES: usize = 8;

type EdgeBuf = SmallVec<[ProtoEdge; INLINE_EDGES]>;

#[derive(Debug, Clone, Copy, PartialEq)]
struct ProtoEdge {
    neighbour: usize,
    r: f64,
}

#[derive(Debug, Default)]
struct ProtoNode {
    edges: Mutex<EdgeBuf>,
}

/// Per-node bounded top-K candidate edges.
#[derive(Debug)]
pub struct ProtoGraph {
    nodes: Vec<ProtoNode>,
    k: usize,
    polarity: CorrelationPolarity,
    threshold: f64,
}

impl ProtoGraph {
    /// Proto-graph over `size` vectors keeping at most `k` edges per node.
    ///
    /// Candidates must also satisfy `threshold` under `polarity`.
    pub fn new(size: usize, k: usize, polarity: CorrelationPolarity, threshold: f64) -> Self {
        let nodes = (0..size).map(|_| ProtoNode::default()).collect();
        Self {
            nodes,
            k,
            polarity,
            threshold,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Strongest first; equal strength orders by neighbour index.
    #[inline]
    fn compare(&self, x: &ProtoEdge, y: &ProtoEdge) -> Ordering {
        self.polarity
            .strength(y.r)
            .total_cmp(&self.polarity.strength(x.r))
            .then(x.neighbour.cmp(&y.neighbour))
    }

    /// Offer the pair `(a, b, r)` to both endpoints.
    ///
    /// Out of range indices are ignored.
    pub fn add(&self, a: usize, b: usize, r: f64) {
        if a >= self.nodes.len() || b >= self.nodes.len() {
            tracing::debug!(a, b, size = self.nodes.len(), "proto-graph index out of range");
            return;
        }

        self.add_to(a, b, r);
        self.add_to(b, a, r);
    }

    fn add_to(&self, node: usize, neighbour: usize, r: f64) {
        if self.k == 0 || !correlation_exceeds_threshold(self.polarity, r, self.threshold) {
            return;
        }

        let candidate = ProtoEdge { neighbour, r };
        let mut edges = self.nodes[node].edges.lock();

        if edges.len() >= self.k {
            match edges.last() {
                Some(worst) if self.compare(&candidate, worst) == Ordering::Less => {}
                _ => return,
            }
        }

        let position = edges.partition_point(|e| self.compare(e, &candidate) == Ordering::Less);
        edges.insert(position, candidate);
        edges.truncate(self.k);
    }

    /// Snapshot of the edges retained at `node`, strongest first.
    pub fn retained(&self, node: usize) -> Vec<(usize, f64)> {
        self.nodes
            .get(node)
            .map(|n| n.edges.lock().iter().map(|e| (e.neighbour, e.r)).collect())
            .unwrap_or_default()
    }
}

impl IntoIterator for ProtoGraph {
    type Item = Relation;
    type IntoIter = IntoIter;

    fn into_iter(self) -> IntoIter {
        IntoIter {
            lists: self
                .nodes
                .into_iter()
                .map(|n| n.edges.into_inner())
                .collect(),
            node: 0,
            edge: 0,
        }
    }
}

/// Iterator over retained edges, yielding each undirected pair once.
///
/// A pair retained at both endpoints is yielded from the lower index; a pair
/// retained only at the higher index is yielded from there.
#[derive(Debug)]
pub struct IntoIter {
    lists: Vec<EdgeBuf>,
    node: usize,
    edge: usize,
}

impl Iterator for IntoIter {
    type Item = Relation;

    fn next(&mut self) -> Option<Relation> {
        while self.node < self.lists.len() {
            let Some(&e) = self.lists[self.node].get(self.edge) else {
                self.node += 1;
                self.edge = 0;
                continue;
            };
            self.edge += 1;

            let (a, b) = (self.node, e.neighbour);
            if a > b && self.lists[b].iter().any(|back| back.neighbour == a) {
                continue;
            }

            return Some(Relation { a, b, r: e.r });
        }

        None
    }
}
