//! Correlation algorithms over continuous vectors.

use super::{AlgorithmInfo, CorrelationAlgorithm};
use crate::vector::{median, ContinuousDataVector};
use rayon::prelude::*;
use std::borrow::Cow;

#[inline]
fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[inline]
fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

#[inline]
fn pearson(size: usize, a: &ContinuousDataVector, b: &ContinuousDataVector) -> f64 {
    let numerator = (size as f64 * dot(a.data(), b.data())) - (a.sum() * b.sum());
    let denominator = a.variability() * b.variability();
    numerator / denominator
}

/// Pearson product-moment correlation.
///
/// `r = (n·Σab − Σa·Σb) / (variability(a)·variability(b))`, using the sums
/// cached by [`ContinuousDataVector::update`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Pearson;

static PEARSON_INFO: AlgorithmInfo = AlgorithmInfo {
    name: "Pearson",
    description: "The Pearson Correlation Coefficient is an indication of the linear \
        relationship between two variables.",
    attribute_name: "Pearson",
    attribute_description: "The Pearson Correlation Coefficient is an indication of the \
        linear relationship between two variables.",
};

impl CorrelationAlgorithm for Pearson {
    type Vector = ContinuousDataVector;

    fn info(&self) -> &'static AlgorithmInfo {
        &PEARSON_INFO
    }

    fn evaluate(&self, size: usize, a: &ContinuousDataVector, b: &ContinuousDataVector) -> f64 {
        pearson(size, a, b)
    }
}

/// Spearman rank correlation: Pearson over rank-transformed vectors.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpearmanRank;

static SPEARMAN_INFO: AlgorithmInfo = AlgorithmInfo {
    name: "Spearman Rank",
    description: "Spearman's rank correlation coefficient is a nonparametric measure of \
        the statistical dependence between the rankings of two variables. It assesses how \
        well the relationship between two variables can be described using a monotonic function.",
    attribute_name: "Spearman Rank",
    attribute_description: "Spearman's rank correlation coefficient assesses how well the \
        relationship between two variables can be described using a monotonic function.",
};

impl CorrelationAlgorithm for SpearmanRank {
    type Vector = ContinuousDataVector;

    fn info(&self) -> &'static AlgorithmInfo {
        &SPEARMAN_INFO
    }

    fn generate_rankings(&self, vectors: &[ContinuousDataVector]) {
        vectors.par_iter().for_each(|v| {
            v.ranking();
        });
    }

    fn evaluate(&self, size: usize, a: &ContinuousDataVector, b: &ContinuousDataVector) -> f64 {
        pearson(size, a.ranking(), b.ranking())
    }
}

/// Similarity derived from Euclidean distance: `1 / (1 + ‖a − b‖)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EuclideanSimilarity;

static EUCLIDEAN_SIMILARITY_INFO: AlgorithmInfo = AlgorithmInfo {
    name: "Euclidean Similarity",
    description: "Euclidean Similarity is the inverse of one plus the Euclidean distance \
        between two vectors, giving a value in the range (0, 1].",
    attribute_name: "Euclidean Similarity",
    attribute_description: "The inverse of one plus the Euclidean distance between the \
        data of the connected nodes.",
};

impl CorrelationAlgorithm for EuclideanSimilarity {
    type Vector = ContinuousDataVector;

    fn info(&self) -> &'static AlgorithmInfo {
        &EUCLIDEAN_SIMILARITY_INFO
    }

    fn evaluate(&self, _size: usize, a: &ContinuousDataVector, b: &ContinuousDataVector) -> f64 {
        1.0 / (1.0 + squared_distance(a.data(), b.data()).sqrt())
    }
}

/// Cosine similarity: `Σab / (‖a‖·‖b‖)`, 0 when either vector is all zeros.
#[derive(Debug, Clone, Copy, Default)]
pub struct CosineSimilarity;

static COSINE_INFO: AlgorithmInfo = AlgorithmInfo {
    name: "Cosine Similarity",
    description: "Cosine Similarity is the cosine of the angle between two vectors, \
        irrespective of their magnitudes.",
    attribute_name: "Cosine Similarity",
    attribute_description: "The cosine of the angle between the data of the connected nodes.",
};

impl CorrelationAlgorithm for CosineSimilarity {
    type Vector = ContinuousDataVector;

    fn info(&self) -> &'static AlgorithmInfo {
        &COSINE_INFO
    }

    fn evaluate(&self, _size: usize, a: &ContinuousDataVector, b: &ContinuousDataVector) -> f64 {
        let magnitude = a.magnitude() * b.magnitude();
        if magnitude == 0.0 {
            return 0.0;
        }

        dot(a.data(), b.data()) / magnitude
    }
}

/// Biweight midcorrelation, a median based correlation robust to outliers.
///
/// Each vector is centred on its median and every deviation weighted by
/// Tukey's biweight `(1 − u²)²`, where `u = (x − med) / (9·MAD)`. Deviations
/// with `|u| ≥ 1` get zero weight. The pairwise value is the normalised inner
/// product of the weighted vectors.
///
/// A vector whose MAD is zero is mean-centred without weighting instead,
/// which makes its correlations Pearson-equivalent. A constant vector becomes
/// all zeros, so every pair involving it is 0/0 and dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bicor;

static BICOR_INFO: AlgorithmInfo = AlgorithmInfo {
    name: "Bicor",
    description: "Biweight midcorrelation is a median based correlation measure that is \
        more robust to outliers than the Pearson Correlation Coefficient.",
    attribute_name: "Bicor",
    attribute_description: "The biweight midcorrelation between the data of the connected nodes.",
};

/// Scale applied to the median absolute deviation.
const BICOR_MAD_SCALE: f64 = 9.0;

fn bicor_transform(values: &[f64]) -> Vec<f64> {
    if values.iter().all(|&v| v == values[0]) {
        return vec![0.0; values.len()];
    }

    let med = median(values);
    let deviations: Vec<f64> = values.iter().map(|v| (v - med).abs()).collect();
    let mad = median(&deviations);

    if mad == 0.0 || !mad.is_finite() {
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        return values.iter().map(|v| v - mean).collect();
    }

    values
        .iter()
        .map(|&v| {
            let u = (v - med) / (BICOR_MAD_SCALE * mad);
            let weight = if u.abs() < 1.0 {
                let w = 1.0 - (u * u);
                w * w
            } else {
                0.0
            };
            (v - med) * weight
        })
        .collect()
}

impl CorrelationAlgorithm for Bicor {
    type Vector = ContinuousDataVector;

    fn info(&self) -> &'static AlgorithmInfo {
        &BICOR_INFO
    }

    fn preprocess<'a>(
        &self,
        _size: usize,
        vectors: &'a [ContinuousDataVector],
    ) -> Cow<'a, [ContinuousDataVector]> {
        let transformed = vectors
            .iter()
            .map(|v| {
                ContinuousDataVector::new(bicor_transform(v.data()), v.node_id())
                    .with_cost(v.compute_cost_hint())
            })
            .collect();

        Cow::Owned(transformed)
    }

    fn evaluate(&self, _size: usize, a: &ContinuousDataVector, b: &ContinuousDataVector) -> f64 {
        dot(a.data(), b.data()) / (a.magnitude() * b.magnitude())
    }
}

/// Plain Euclidean distance, used to build clustering distance matrices.
#[derive(Debug, Clone, Copy, Default)]
pub struct EuclideanDistance;

static EUCLIDEAN_DISTANCE_INFO: AlgorithmInfo = AlgorithmInfo {
    name: "Euclidean Distance",
    description: "The straight line distance between two vectors.",
    attribute_name: "Euclidean Distance",
    attribute_description: "The straight line distance between the data of the connected nodes.",
};

impl CorrelationAlgorithm for EuclideanDistance {
    type Vector = ContinuousDataVector;

    fn info(&self) -> &'static AlgorithmInfo {
        &EUCLIDEAN_DISTANCE_INFO
    }

    fn evaluate(&self, _size: usize, a: &ContinuousDataVector, b: &ContinuousDataVector) -> f64 {
        squared_distance(a.data(), b.data()).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::NodeId;

    fn v(values: &[f64]) -> ContinuousDataVector {
        ContinuousDataVector::new(values.to_vec(), NodeId(0))
    }

    #[test]
    fn pearson_perfect_and_inverse() {
        let a = v(&[1.0, 2.0, 3.0, 4.0]);
        let b = v(&[2.0, 4.0, 6.0, 8.0]);
        let c = v(&[4.0, 3.0, 2.0, 1.0]);
        assert!((Pearson.evaluate(4, &a, &b) - 1.0).abs() < 1e-12);
        assert!((Pearson.evaluate(4, &a, &c) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_of_constant_vector_is_not_finite() {
        let a = v(&[1.0, 1.0, 1.0]);
        assert!(!Pearson.evaluate(3, &a, &a).is_finite());
    }

    #[test]
    fn pearson_of_constant_fractional_vectors_is_not_finite() {
        let a = v(&[0.1; 10]);
        let b = v(&[0.7; 10]);
        let c = v(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
        assert!(!Pearson.evaluate(10, &a, &a).is_finite());
        assert!(!Pearson.evaluate(10, &a, &b).is_finite());
        assert!(!Pearson.evaluate(10, &a, &c).is_finite());
    }

    #[test]
    fn spearman_sees_monotonic_relationships() {
        let a = v(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let b = v(&[1.0, 4.0, 9.0, 16.0, 100.0]);
        let r = SpearmanRank.evaluate(5, &a, &b);
        assert!((r - 1.0).abs() < 1e-12);
        assert!(Pearson.evaluate(5, &a, &b) < r);
    }

    #[test]
    fn spearman_rankings_are_generated_up_front() {
        let vectors = vec![v(&[3.0, 1.0, 2.0]), v(&[1.0, 2.0, 3.0])];
        SpearmanRank.generate_rankings(&vectors);
        assert!(vectors.iter().all(ContinuousDataVector::has_ranking));
    }

    #[test]
    fn euclidean_similarity_of_identical_is_one() {
        let a = v(&[0.5, -1.0, 2.0]);
        assert_eq!(EuclideanSimilarity.evaluate(3, &a, &a), 1.0);

        let b = v(&[3.5, 3.0, 2.0]);
        assert!((EuclideanSimilarity.evaluate(3, &a, &b) - 1.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn cosine_handles_zero_vectors() {
        let zero = v(&[0.0, 0.0]);
        let a = v(&[1.0, 1.0]);
        assert_eq!(CosineSimilarity.evaluate(2, &zero, &a), 0.0);

        let b = v(&[2.0, 2.0]);
        assert!((CosineSimilarity.evaluate(2, &a, &b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn bicor_ignores_a_single_outlier() {
        let vectors = vec![
            v(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]),
            v(&[1.1, 2.1, 2.9, 1000.0, 5.0, 6.1, 6.9, 8.2]),
        ];

        let prepared = Bicor.preprocess(8, &vectors);
        let robust = Bicor.evaluate(8, &prepared[0], &prepared[1]);
        let classic = Pearson.evaluate(8, &vectors[0], &vectors[1]);

        assert!(robust > 0.9, "bicor {robust}");
        assert!(classic < 0.1, "pearson {classic}");
    }

    #[test]
    fn bicor_preprocess_leaves_input_untouched() {
        let vectors = vec![v(&[1.0, 5.0, 2.0, 8.0])];
        let prepared = Bicor.preprocess(4, &vectors);
        assert!(matches!(prepared, Cow::Owned(_)));
        assert_eq!(vectors[0].data(), &[1.0, 5.0, 2.0, 8.0]);
    }

    #[test]
    fn bicor_zero_mad_falls_back_to_pearson() {
        let vectors = vec![
            v(&[1.0, 1.0, 1.0, 5.0]),
            v(&[2.0, 2.0, 2.0, 9.0]),
        ];
        let prepared = Bicor.preprocess(4, &vectors);
        let r = Bicor.evaluate(4, &prepared[0], &prepared[1]);
        let p = Pearson.evaluate(4, &vectors[0], &vectors[1]);
        assert!((r - p).abs() < 1e-9);
    }

    #[test]
    fn bicor_of_constant_vectors_is_not_finite() {
        let squares: Vec<f64> = (0..7).map(|i| f64::from(i * i)).collect();
        for c in [0.1, 0.7, 1.1, 3.3] {
            let vectors = vec![v(&[c; 7]), v(&squares), v(&[c * 2.0; 7])];
            let prepared = Bicor.preprocess(7, &vectors);
            assert!(prepared[0].data().iter().all(|&x| x == 0.0));
            assert!(!Bicor.evaluate(7, &prepared[0], &prepared[1]).is_finite(), "constant {c}");
            assert!(!Bicor.evaluate(7, &prepared[0], &prepared[2]).is_finite(), "constant {c}");
        }
    }

    #[test]
    fn euclidean_distance() {
        let a = v(&[0.0, 0.0]);
        let b = v(&[3.0, 4.0]);
        assert_eq!(EuclideanDistance.evaluate(2, &a, &b), 5.0);
    }
}
