//! Pairwise correlation algorithms.
//!
//! Every algorithm implements [`CorrelationAlgorithm`]: a symmetric
//! `evaluate(size, a, b)` plus optional hooks the evaluator runs once before
//! the parallel phase:
//!
//! - [`CorrelationAlgorithm::generate_rankings`] warms per-vector rank caches
//!   (Spearman).
//! - [`CorrelationAlgorithm::preprocess`] derives a transformed copy of the
//!   whole collection (Bicor). The input vectors are never mutated.
//!
//! Results may be non-finite (zero variance, empty denominators). Callers
//! drop such pairs; they are not errors.
//!
//! | Algorithm | Data | Range |
//! |-----------|------|-------|
//! | Pearson | continuous | [-1, 1] |
//! | Spearman rank | continuous | [-1, 1] |
//! | Euclidean similarity | continuous | (0, 1] |
//! | Cosine similarity | continuous | [-1, 1] |
//! | Bicor | continuous | [-1, 1] |
//! | Jaccard | tokenised | [0, 1] |
//! | Simple matching coefficient | tokenised | [0, 1] |

pub mod continuous;
pub mod discrete;

pub use continuous::{
    Bicor, CosineSimilarity, EuclideanDistance, EuclideanSimilarity, Pearson, SpearmanRank,
};
pub use discrete::{Jaccard, SimpleMatchingCoefficient};

use crate::config::{AlgorithmKind, CorrelationPolarity};
use crate::vector::RowVector;
use std::borrow::Cow;

/// Labelling metadata for an algorithm. Not part of the computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlgorithmInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub attribute_name: &'static str,
    pub attribute_description: &'static str,
}

impl AlgorithmInfo {
    /// Name of the edge attribute for a polarity. Signed polarities other
    /// than positive are labelled by absolute value.
    pub fn attribute_name_for(&self, polarity: CorrelationPolarity) -> String {
        match polarity {
            CorrelationPolarity::Positive => self.attribute_name.to_string(),
            CorrelationPolarity::Negative | CorrelationPolarity::Both => {
                format!("Absolute {}", self.attribute_name)
            }
        }
    }
}

/// Labelling metadata for a selectable algorithm.
pub fn info_for(kind: AlgorithmKind) -> &'static AlgorithmInfo {
    match kind {
        AlgorithmKind::Pearson => Pearson.info(),
        AlgorithmKind::SpearmanRank => SpearmanRank.info(),
        AlgorithmKind::EuclideanSimilarity => EuclideanSimilarity.info(),
        AlgorithmKind::CosineSimilarity => CosineSimilarity.info(),
        AlgorithmKind::Bicor => Bicor.info(),
        AlgorithmKind::Jaccard => Jaccard::default().info(),
        AlgorithmKind::SimpleMatchingCoefficient => SimpleMatchingCoefficient::default().info(),
    }
}

/// A symmetric pairwise metric over vectors of type `Self::Vector`.
pub trait CorrelationAlgorithm: Sync {
    type Vector: RowVector + Clone + Sync;

    fn info(&self) -> &'static AlgorithmInfo;

    /// Compute rank caches for every vector before evaluation.
    fn generate_rankings(&self, _vectors: &[Self::Vector]) {}

    /// Derive the representation evaluated in place of `vectors`.
    ///
    /// Runs single-threaded with respect to the pairwise phase; the default
    /// borrows the input unchanged.
    fn preprocess<'a>(&self, _size: usize, vectors: &'a [Self::Vector]) -> Cow<'a, [Self::Vector]> {
        Cow::Borrowed(vectors)
    }

    /// Correlation between `a` and `b`, both of length `size`.
    fn evaluate(&self, size: usize, a: &Self::Vector, b: &Self::Vector) -> f64;
}
