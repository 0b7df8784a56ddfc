//! Edge case tests for corrgraph.
//!
//! Tests unusual inputs and boundary conditions that could cause failures.

use corrgraph::config::{AlgorithmKind, DataType};
use corrgraph::correlation::{CorrelationAlgorithm, EuclideanDistance, Pearson};
use corrgraph::filter::ThresholdFilter;
use corrgraph::monitor::{CancelFlag, Monitor};
use corrgraph::vector::{continuous_rows, DataVector};
use corrgraph::{
    covariance_matrix, edge_list, hierarchical_ordering, single_linkage, ContinuousDataVector,
    CorrelationError, CorrelationParameters, CorrelationPolarity, CovarianceMatrix, NodeId,
    PairwiseEvaluator, Rows, Silent,
};
use std::sync::atomic::{AtomicUsize, Ordering};

// =============================================================================
// Degenerate collections
// =============================================================================

#[test]
fn empty_collection_gives_empty_results() {
    let params = CorrelationParameters::default();
    assert!(edge_list(Rows::Continuous(&[]), &params, &Silent)
        .unwrap()
        .is_empty());
    assert_eq!(
        covariance_matrix(Rows::Continuous(&[]), &params, &Silent)
            .unwrap()
            .size(),
        0
    );

    let knn = params.with_knn(3);
    assert!(edge_list(Rows::Continuous(&[]), &knn, &Silent)
        .unwrap()
        .is_empty());
}

/// Cancels on the first check. Empty input must never get that far.
struct PanicOnPoll;

impl Monitor for PanicOnPoll {
    fn is_cancelled(&self) -> bool {
        panic!("empty input should short-circuit before any task runs");
    }
}

#[test]
fn empty_collection_short_circuits() {
    let evaluator = PairwiseEvaluator::new(&PanicOnPoll);
    let result = evaluator
        .process(
            &Pearson,
            &[],
            ThresholdFilter::new(CorrelationPolarity::Both, 0.0),
        )
        .unwrap();
    assert_eq!(result, Some(Vec::new()));
}

#[test]
fn single_vector_has_no_edges() {
    let rows = [ContinuousDataVector::new(vec![1.0, 2.0, 3.0], NodeId(0))];
    let params = CorrelationParameters::default().with_threshold(f64::NEG_INFINITY);
    assert!(edge_list(Rows::Continuous(&rows), &params, &Silent)
        .unwrap()
        .is_empty());

    let matrix = covariance_matrix(Rows::Continuous(&rows), &params, &Silent).unwrap();
    assert_eq!(matrix.size(), 1);
    assert!((matrix.value_at(0, 0) - 1.0).abs() < 1e-12);
}

#[test]
fn zero_length_vectors_are_dropped() {
    let rows = continuous_rows(&[], 0);
    assert!(rows.is_empty());

    let rows = [
        ContinuousDataVector::new(Vec::new(), NodeId(0)),
        ContinuousDataVector::new(Vec::new(), NodeId(1)),
    ];
    let params = CorrelationParameters::default().with_threshold(f64::NEG_INFINITY);
    // Pearson over no values is 0/0.
    assert!(edge_list(Rows::Continuous(&rows), &params, &Silent)
        .unwrap()
        .is_empty());
}

// =============================================================================
// Cancellation
// =============================================================================

#[test]
fn cancelled_before_start_returns_empty() {
    let flag = CancelFlag::new();
    flag.cancel();
    let rows = continuous_rows(&[1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 3.0, 6.0, 9.0], 3);
    let params = CorrelationParameters::default();

    assert!(edge_list(Rows::Continuous(&rows), &params, &flag)
        .unwrap()
        .is_empty());
    assert!(edge_list(Rows::Continuous(&rows), &params.clone().with_knn(2), &flag)
        .unwrap()
        .is_empty());
    assert_eq!(
        covariance_matrix(Rows::Continuous(&rows), &params, &flag)
            .unwrap()
            .size(),
        0
    );
    assert!(hierarchical_ordering(&[1.0, 2.0, 3.0, 4.0], 2, 2, &flag)
        .unwrap()
        .is_none());
}

/// Cancels after a fixed number of polls.
struct CancelAfter {
    polls: AtomicUsize,
    limit: usize,
}

impl Monitor for CancelAfter {
    fn is_cancelled(&self) -> bool {
        self.polls.fetch_add(1, Ordering::SeqCst) >= self.limit
    }
}

#[test]
fn cancelled_mid_run_discards_partial_results() {
    let rows: Vec<ContinuousDataVector> = (0..32)
        .map(|i| {
            let values = (0..8).map(|j| ((i * 7 + j * 3) % 11) as f64).collect();
            ContinuousDataVector::new(values, NodeId(i))
        })
        .collect();
    let params = CorrelationParameters::default().with_threshold(f64::NEG_INFINITY);
    let monitor = CancelAfter {
        polls: AtomicUsize::new(0),
        limit: 5,
    };

    assert!(edge_list(Rows::Continuous(&rows), &params, &monitor)
        .unwrap()
        .is_empty());
}

#[test]
fn cancelled_linkage_returns_none() {
    let flag = CancelFlag::new();
    flag.cancel();
    let mut distances = CovarianceMatrix::new(3);
    distances.set_value_at(0, 1, 1.0);
    assert!(single_linkage(&distances, &flag).is_none());
}

// =============================================================================
// Invalid input
// =============================================================================

#[test]
fn mismatched_lengths_are_rejected() {
    let rows = [
        ContinuousDataVector::new(vec![1.0, 2.0, 3.0], NodeId(0)),
        ContinuousDataVector::new(vec![1.0, 2.0], NodeId(1)),
    ];
    let err = edge_list(Rows::Continuous(&rows), &CorrelationParameters::default(), &Silent)
        .unwrap_err();
    assert_eq!(
        err,
        CorrelationError::DimensionMismatch {
            index: 1,
            expected: 3,
            actual: 2
        }
    );
}

#[test]
fn stale_vector_is_rejected() {
    let mut rows = vec![
        ContinuousDataVector::new(vec![1.0, 2.0, 3.0], NodeId(0)),
        ContinuousDataVector::new(vec![3.0, 2.0, 1.0], NodeId(1)),
    ];
    rows[1].set_value_at(0, 9.0);

    let err = edge_list(Rows::Continuous(&rows), &CorrelationParameters::default(), &Silent)
        .unwrap_err();
    assert_eq!(err, CorrelationError::StaleStatistics { index: 1 });

    rows[1].update();
    assert!(edge_list(Rows::Continuous(&rows), &CorrelationParameters::default(), &Silent).is_ok());
}

#[test]
fn algorithm_data_type_must_match_rows() {
    let tokens = [DataVector::new(vec![1, 0], NodeId(0)), DataVector::new(vec![1, 1], NodeId(1))];
    let err = edge_list(Rows::Discrete(&tokens), &CorrelationParameters::default(), &Silent)
        .unwrap_err();
    assert_eq!(
        err,
        CorrelationError::DataTypeMismatch {
            algorithm: "Pearson",
            expected: DataType::Continuous
        }
    );

    let jaccard = CorrelationParameters::default()
        .with_algorithm(AlgorithmKind::Jaccard)
        .with_threshold(0.0);
    assert_eq!(
        edge_list(Rows::Discrete(&tokens), &jaccard, &Silent).unwrap().len(),
        1
    );
}

#[test]
fn invalid_parameters_are_rejected() {
    let rows = continuous_rows(&[1.0, 2.0, 2.0, 1.0], 2);
    let zero_k = CorrelationParameters::default().with_knn(0);
    assert!(matches!(
        edge_list(Rows::Continuous(&rows), &zero_k, &Silent),
        Err(CorrelationError::InvalidParameter(_))
    ));

    let nan = CorrelationParameters::default().with_threshold(f64::NAN);
    assert!(matches!(
        covariance_matrix(Rows::Continuous(&rows), &nan, &Silent),
        Err(CorrelationError::InvalidParameter(_))
    ));
}

// =============================================================================
// Numeric edge cases
// =============================================================================

#[test]
fn identical_columns_have_zero_distance() {
    let a = ContinuousDataVector::new(vec![1.5, -2.0], NodeId(0));
    assert_eq!(EuclideanDistance.evaluate(2, &a, &a), 0.0);
}

#[test]
fn constant_fractional_rows_are_dropped_by_both_filters() {
    let ramp: Vec<f64> = (1..=10).map(f64::from).collect();
    let squares: Vec<f64> = ramp.iter().map(|x| x * x).collect();
    let rows = [
        ContinuousDataVector::new(vec![0.1; 10], NodeId(0)),
        ContinuousDataVector::new(vec![0.7; 10], NodeId(1)),
        ContinuousDataVector::new(ramp, NodeId(2)),
        ContinuousDataVector::new(squares, NodeId(3)),
    ];

    for kind in [AlgorithmKind::Pearson, AlgorithmKind::SpearmanRank, AlgorithmKind::Bicor] {
        let threshold = CorrelationParameters::default()
            .with_algorithm(kind)
            .with_threshold(f64::NEG_INFINITY)
            .with_polarity(CorrelationPolarity::Both);
        let knn = threshold.clone().with_knn(3);

        for params in [threshold, knn] {
            let edges = edge_list(Rows::Continuous(&rows), &params, &Silent).unwrap();
            let pairs: Vec<_> = edges.iter().map(|e| (e.source.0, e.target.0)).collect();
            assert_eq!(pairs, vec![(2, 3)], "{kind:?} {:?}", params.filter);
            assert!(edges[0].weight.abs() <= 1.0 + 1e-12);
        }
    }
}

#[test]
fn extreme_magnitudes_stay_finite() {
    let rows = [
        ContinuousDataVector::new(vec![1e150, 2e150, 3e150], NodeId(0)),
        ContinuousDataVector::new(vec![1e-150, 2e-150, 3e-150], NodeId(1)),
    ];
    let params = CorrelationParameters::default()
        .with_algorithm(AlgorithmKind::CosineSimilarity)
        .with_threshold(0.99);
    let edges = edge_list(Rows::Continuous(&rows), &params, &Silent).unwrap();
    assert_eq!(edges.len(), 1);
}
