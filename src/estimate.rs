//! Predicting graph size as a function of threshold.
//!
//! Given the edges found at some minimum threshold (usually over a sample
//! of rows), [`graph_size_estimate`] reports how many nodes and edges would
//! remain at each of roughly 100 higher thresholds.

use crate::edge::Edge;
use crate::vector::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const NUM_SAMPLES: usize = 100;

/// Estimated graph size curves, ascending by `keys`.
///
/// `num_nodes[i]` and `num_edges[i]` estimate the graph size when only edges
/// with `|weight| >= keys[i]` are kept. Nodes without edges are not counted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphSizeEstimate {
    pub keys: Vec<f64>,
    pub num_nodes: Vec<f64>,
    pub num_edges: Vec<f64>,
}

impl GraphSizeEstimate {
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn push(&mut self, key: f64, nodes: f64, edges: f64) {
        self.keys.push(key);
        self.num_nodes.push(nodes);
        self.num_edges.push(edges);
    }
}

/// Build size curves from a sampled edge list.
///
/// Counts are multiplied by `nodes_scale` / `edges_scale` to extrapolate
/// from a sample to the full data set, then capped at `nodes_max` /
/// `edges_max`. An empty edge list yields an empty estimate.
pub fn graph_size_estimate(
    edges: &[Edge],
    nodes_scale: f64,
    edges_scale: f64,
    nodes_max: f64,
    edges_max: f64,
) -> GraphSizeEstimate {
    let mut estimate = GraphSizeEstimate::default();
    if edges.is_empty() {
        return estimate;
    }

    let mut sorted: Vec<&Edge> = edges.iter().collect();
    sorted.sort_by(|a, b| b.weight.abs().total_cmp(&a.weight.abs()));

    let smallest = sorted[sorted.len() - 1].weight.abs();
    let quantum = (1.0 - smallest) / (NUM_SAMPLES - 1) as f64;
    let mut cutoff = 1.0;

    let mut nodes: HashSet<NodeId> = HashSet::new();
    let mut num_edges = 0usize;
    let point = |nodes: &HashSet<NodeId>, num_edges: usize| {
        (
            (nodes.len() as f64 * nodes_scale).min(nodes_max),
            (num_edges as f64 * edges_scale).min(edges_max),
        )
    };

    for edge in &sorted {
        nodes.insert(edge.source);
        nodes.insert(edge.target);
        num_edges += 1;

        let weight = edge.weight.abs();
        if weight <= cutoff {
            let (n, e) = point(&nodes, num_edges);
            estimate.push(weight, n, e);
            cutoff -= quantum;
        }
    }

    let (n, e) = point(&nodes, num_edges);
    estimate.push(smallest, n, e);

    estimate.keys.reverse();
    estimate.num_nodes.reverse();
    estimate.num_edges.reverse();

    tracing::debug!(
        edges = edges.len(),
        samples = estimate.keys.len(),
        "graph size estimate"
    );

    estimate
}
