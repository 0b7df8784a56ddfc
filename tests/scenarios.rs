//! Worked examples with known answers.

use corrgraph::correlation::{CorrelationAlgorithm, Jaccard, Pearson};
use corrgraph::filter::{KnnFilter, ThresholdFilter};
use corrgraph::vector::{tokenise, DataVector, DiscreteDataVector};
use corrgraph::{
    edge_list, hierarchical_ordering, ContinuousDataVector, CorrelationParameters,
    CorrelationPolarity, NodeId, PairwiseEvaluator, Rows, Silent,
};

fn vector(values: &[f64], id: usize) -> ContinuousDataVector {
    ContinuousDataVector::new(values.to_vec(), NodeId(id))
}

#[test]
fn perfectly_correlated_rows() {
    let a = vector(&[1.0, 2.0, 3.0, 4.0], 0);
    let b = vector(&[2.0, 4.0, 6.0, 8.0], 1);
    assert!((Pearson.evaluate(4, &a, &b) - 1.0).abs() < 1e-12);

    let params = CorrelationParameters::default().with_threshold(0.99);
    let edges = edge_list(Rows::Continuous(&[a, b]), &params, &Silent).unwrap();
    assert_eq!(edges.len(), 1);
    assert!((edges[0].weight - 1.0).abs() < 1e-12);
}

#[test]
fn zero_variability_pair_is_dropped_by_both_filters() {
    let vectors = [vector(&[1.0, 1.0, 1.0], 0), vector(&[1.0, 1.0, 1.0], 1)];
    assert!(!Pearson.evaluate(3, &vectors[0], &vectors[1]).is_finite());

    let evaluator = PairwiseEvaluator::new(&Silent);
    let threshold = evaluator
        .process(
            &Pearson,
            &vectors,
            ThresholdFilter::new(CorrelationPolarity::Both, f64::NEG_INFINITY),
        )
        .unwrap()
        .unwrap();
    assert!(threshold.is_empty());

    let knn = evaluator
        .process(
            &Pearson,
            &vectors,
            KnnFilter::new(2, 1, CorrelationPolarity::Both, f64::NEG_INFINITY),
        )
        .unwrap()
        .unwrap();
    assert!(knn.is_empty());
}

#[test]
fn jaccard_of_tokenised_rows() {
    let rows: Vec<DiscreteDataVector> = [["x", "y", "x"], ["x", "y", "y"]]
        .iter()
        .enumerate()
        .map(|(i, r)| DataVector::new(r.iter().map(|s| s.to_string()).collect(), NodeId(i)))
        .collect();
    let tokens = tokenise(&rows);

    let jaccard = Jaccard {
        treat_as_binary: false,
    };
    let r = jaccard.evaluate(3, &tokens[0], &tokens[1]);
    assert!((r - 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn knn_full_list_keeps_the_stronger_candidate() {
    // r(0,1) = 0.9, r(0,2) = 0.8, r(1,2) = 0.1, r(2,3) = 0.7, others small.
    let evaluator = PairwiseEvaluator::new(&Silent);
    let filter = KnnFilter::new(4, 1, CorrelationPolarity::Positive, 0.0);
    let graph = filter.graph();

    graph.add(0, 1, 0.9);
    graph.add(0, 2, 0.8);
    graph.add(1, 2, 0.1);
    graph.add(2, 3, 0.7);
    graph.add(1, 3, 0.05);
    graph.add(0, 3, 0.02);

    // Node 0 is full with 1 and rejects the weaker 2; node 2 keeps 0.
    assert_eq!(graph.retained(0), vec![(1, 0.9)]);
    assert_eq!(graph.retained(1), vec![(0, 0.9)]);
    assert_eq!(graph.retained(2), vec![(0, 0.8)]);
    assert_eq!(graph.retained(3), vec![(2, 0.7)]);

    // The same result through the evaluator.
    let rows = [
        vector(&[1.0, 2.0, 3.0, 4.0, 5.0], 0),
        vector(&[1.0, 2.0, 3.0, 5.0, 4.0], 1),
        vector(&[5.0, 4.0, 3.0, 2.0, 1.0], 2),
        vector(&[2.0, 2.0, 3.0, 1.0, 1.0], 3),
    ];
    let knn = evaluator
        .process(
            &Pearson,
            &rows,
            KnnFilter::new(4, 1, CorrelationPolarity::Positive, f64::NEG_INFINITY),
        )
        .unwrap()
        .unwrap();
    let keys: Vec<_> = knn.iter().map(|r| r.key()).collect();
    assert!(keys.contains(&(0, 1)));
    assert!(knn.len() <= 4);
}

#[test]
fn single_linkage_of_two_pairs() {
    // Four columns in a single row.
    let dendrogram = hierarchical_ordering(&[0.0, 1.0, 5.0, 6.0], 4, 1, &Silent)
        .unwrap()
        .unwrap();

    assert_eq!(dendrogram.order, vec![0, 1, 2, 3]);
    let distances: Vec<f64> = dendrogram.links.iter().map(|l| l.distance).collect();
    assert_eq!(distances.len(), 3);
    assert!((distances[0] - 1.0).abs() < 1e-12);
    assert!((distances[1] - 1.0).abs() < 1e-12);
    assert!((distances[2] - 4.0).abs() < 1e-12);

    // The last merge joins {0, 1} with {2, 3}.
    let root = dendrogram.links[2];
    assert_eq!((root.a, root.b), (4, 5));
}
