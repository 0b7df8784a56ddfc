//! Correlation parameters.
//!
//! [`CorrelationParameters`] is the parameter bag handed in by the host: which
//! algorithm to run, how to retain edges, and the polarity of correlations
//! that count. All fields serialize so a host can persist and restore them.

use crate::error::{CorrelationError, Result};
use serde::{Deserialize, Serialize};

/// Which sign of correlation counts toward acceptance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CorrelationPolarity {
    /// Only `r >= threshold`.
    #[default]
    Positive,
    /// Only `r <= -threshold`.
    Negative,
    /// `|r| >= threshold`.
    Both,
}

impl CorrelationPolarity {
    /// Polarity-aware strength of a correlation value: larger is stronger.
    #[inline]
    #[must_use]
    pub fn strength(self, r: f64) -> f64 {
        match self {
            CorrelationPolarity::Positive => r,
            CorrelationPolarity::Negative => -r,
            CorrelationPolarity::Both => r.abs(),
        }
    }
}

/// Edge retention strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Keep every pair whose correlation exceeds the threshold.
    #[default]
    Threshold,
    /// Keep at most `maximum_k` strongest pairs per node.
    Knn,
}

/// Kind of row data an algorithm consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    /// Floating point values.
    Continuous,
    /// Tokenised categorical values.
    Discrete,
}

/// Discriminator over the supported correlation algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AlgorithmKind {
    #[default]
    Pearson,
    SpearmanRank,
    EuclideanSimilarity,
    CosineSimilarity,
    Bicor,
    Jaccard,
    SimpleMatchingCoefficient,
}

impl AlgorithmKind {
    /// All algorithms, in display order.
    pub const ALL: [AlgorithmKind; 7] = [
        AlgorithmKind::Pearson,
        AlgorithmKind::SpearmanRank,
        AlgorithmKind::EuclideanSimilarity,
        AlgorithmKind::CosineSimilarity,
        AlgorithmKind::Bicor,
        AlgorithmKind::Jaccard,
        AlgorithmKind::SimpleMatchingCoefficient,
    ];

    #[must_use]
    pub fn data_type(self) -> DataType {
        match self {
            AlgorithmKind::Jaccard | AlgorithmKind::SimpleMatchingCoefficient => DataType::Discrete,
            _ => DataType::Continuous,
        }
    }
}

/// Parameters for one correlation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationParameters {
    /// Threshold filter cutoff, and the floor for k-NN acceptance.
    pub minimum_threshold: f64,
    /// Maximum retained edges per node for k-NN filtering.
    pub maximum_k: u32,
    pub polarity: CorrelationPolarity,
    /// Discrete algorithms only: compare truthiness instead of exact tokens.
    pub treat_as_binary: bool,
    pub filter: FilterType,
    pub algorithm: AlgorithmKind,
}

impl Default for CorrelationParameters {
    fn default() -> Self {
        Self {
            minimum_threshold: 0.7,
            maximum_k: 5,
            polarity: CorrelationPolarity::Positive,
            treat_as_binary: false,
            filter: FilterType::Threshold,
            algorithm: AlgorithmKind::Pearson,
        }
    }
}

impl CorrelationParameters {
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: AlgorithmKind) -> Self {
        self.algorithm = algorithm;
        self
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.minimum_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_knn(mut self, k: u32) -> Self {
        self.filter = FilterType::Knn;
        self.maximum_k = k;
        self
    }

    #[must_use]
    pub fn with_polarity(mut self, polarity: CorrelationPolarity) -> Self {
        self.polarity = polarity;
        self
    }

    #[must_use]
    pub fn with_binary(mut self, treat_as_binary: bool) -> Self {
        self.treat_as_binary = treat_as_binary;
        self
    }

    /// Check the parameters are usable for edge filtering.
    pub fn validate(&self) -> Result<()> {
        self.validate_threshold()?;

        if self.filter == FilterType::Knn && self.maximum_k == 0 {
            return Err(CorrelationError::InvalidParameter(
                "maximum_k must be greater than 0 for k-NN filtering".to_string(),
            ));
        }

        Ok(())
    }

    /// A threshold of `-inf` is allowed (accept everything); NaN and `+inf` are not.
    pub fn validate_threshold(&self) -> Result<()> {
        if self.minimum_threshold.is_nan() || self.minimum_threshold == f64::INFINITY {
            return Err(CorrelationError::InvalidParameter(format!(
                "minimum_threshold must be finite or -inf, got {}",
                self.minimum_threshold
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strength_follows_polarity() {
        assert_eq!(CorrelationPolarity::Positive.strength(-0.5), -0.5);
        assert_eq!(CorrelationPolarity::Negative.strength(-0.5), 0.5);
        assert_eq!(CorrelationPolarity::Both.strength(-0.5), 0.5);
    }

    #[test]
    fn knn_requires_nonzero_k() {
        let params = CorrelationParameters::default().with_knn(0);
        assert!(params.validate().is_err());
        assert!(params.with_knn(3).validate().is_ok());
    }

    #[test]
    fn negative_infinity_threshold_is_valid() {
        let params = CorrelationParameters::default().with_threshold(f64::NEG_INFINITY);
        assert!(params.validate().is_ok());
        assert!(params.with_threshold(f64::NAN).validate().is_err());
    }

    #[test]
    fn restores_partial_json_with_defaults() {
        let params: CorrelationParameters = serde_json::from_str(
            r#"{"minimum_threshold": 0.85, "filter": "Knn", "maximum_k": 3, "algorithm": "Bicor"}"#,
        )
        .unwrap();

        assert_eq!(params.minimum_threshold, 0.85);
        assert_eq!(params.filter, FilterType::Knn);
        assert_eq!(params.maximum_k, 3);
        assert_eq!(params.algorithm, AlgorithmKind::Bicor);
        assert_eq!(params.polarity, CorrelationPolarity::Positive);
        assert!(!params.treat_as_binary);
    }

    #[test]
    fn discrete_algorithms_are_flagged() {
        let discrete: Vec<_> = AlgorithmKind::ALL
            .iter()
            .filter(|k| k.data_type() == DataType::Discrete)
            .collect();
        assert_eq!(
            discrete,
            [&AlgorithmKind::Jaccard, &AlgorithmKind::SimpleMatchingCoefficient]
        );
    }
}
