//! Edge retention strategies.
//!
//! The evaluator feeds every finite `(a, b, r)` it produces into a
//! [`FilterStrategy`]. Each worker task owns a `Local` accumulator; the
//! strategy merges those once all tasks have finished.
//!
//! - [`ThresholdFilter`]: keep a pair iff it exceeds a polarity-aware
//!   threshold. Accumulates per task, concatenates on merge.
//! - [`KnnFilter`]: route pairs into a shared [`ProtoGraph`], which bounds
//!   each node to its `k` strongest edges.

pub mod protograph;

pub use protograph::ProtoGraph;

use crate::config::CorrelationPolarity;
use crate::edge::Relation;

/// Whether `r` counts as a correlation under `polarity` at `threshold`.
///
/// - Positive: `r >= threshold`
/// - Negative: `r <= -threshold`
/// - Both: `|r| >= threshold`
#[inline]
#[must_use]
pub fn correlation_exceeds_threshold(polarity: CorrelationPolarity, r: f64, threshold: f64) -> bool {
    match polarity {
        CorrelationPolarity::Positive => r >= threshold,
        CorrelationPolarity::Negative => r <= -threshold,
        CorrelationPolarity::Both => r.abs() >= threshold,
    }
}

/// A sink for pairwise results, shared by all worker tasks.
pub trait FilterStrategy: Sync {
    /// Per-task accumulator.
    type Local: Send;

    fn local(&self) -> Self::Local;

    /// Offer a finite result for the pair `(a, b)`.
    fn add(&self, local: &mut Self::Local, a: usize, b: usize, r: f64);

    /// Merge the per-task accumulators into the final relation list.
    fn results(self, locals: Vec<Self::Local>) -> Vec<Relation>;
}

/// Keep pairs exceeding a polarity-aware threshold.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdFilter {
    pub polarity: CorrelationPolarity,
    pub threshold: f64,
}

impl ThresholdFilter {
    pub fn new(polarity: CorrelationPolarity, threshold: f64) -> Self {
        Self {
            polarity,
            threshold,
        }
    }
}

impl FilterStrategy for ThresholdFilter {
    type Local = Vec<Relation>;

    fn local(&self) -> Vec<Relation> {
        Vec::new()
    }

    #[inline]
    fn add(&self, local: &mut Vec<Relation>, a: usize, b: usize, r: f64) {
        if correlation_exceeds_threshold(self.polarity, r, self.threshold) {
            local.push(Relation { a, b, r });
        }
    }

    fn results(self, locals: Vec<Vec<Relation>>) -> Vec<Relation> {
        let total = locals.iter().map(Vec::len).sum();
        let mut merged = Vec::with_capacity(total);
        for local in locals {
            merged.extend(local);
        }
        merged
    }
}

/// Keep at most `k` strongest pairs per node.
#[derive(Debug)]
pub struct KnnFilter {
    graph: ProtoGraph,
}

impl KnnFilter {
    pub fn new(size: usize, k: usize, polarity: CorrelationPolarity, threshold: f64) -> Self {
        Self {
            graph: ProtoGraph::new(size, k, polarity, threshold),
        }
    }

    pub fn graph(&self) -> &ProtoGraph {
        &self.graph
    }
}

impl FilterStrategy for KnnFilter {
    type Local = ();

    fn local(&self) {}

    #[inline]
    fn add(&self, _local: &mut (), a: usize, b: usize, r: f64) {
        self.graph.add(a, b, r);
    }

    fn results(self, _locals: Vec<()>) -> Vec<Relation> {
        self.graph.into_iter().collect()
    }
}
