//! Parallel pairwise evaluation.
//!
//! [`PairwiseEvaluator`] runs one rayon task per outer index `i`, comparing
//! vector `i` against every `j > i`. Results go to a [`FilterStrategy`];
//! non-finite correlations never reach it.
//!
//! Progress is weighted by each vector's compute cost hint. Cancellation is
//! polled once per outer index, and a cancelled run yields `None` rather than
//! a partial result.
//!
//! The free functions [`edge_list`] and [`covariance_matrix`] select the
//! algorithm from [`CorrelationParameters`] and return empty results when
//! cancelled.

use crate::config::{AlgorithmKind, CorrelationParameters, FilterType};
use crate::correlation::{
    info_for, Bicor, CorrelationAlgorithm, CosineSimilarity, EuclideanSimilarity, Jaccard,
    Pearson, SimpleMatchingCoefficient, SpearmanRank,
};
use crate::edge::{Edge, EdgeList, Relation};
use crate::error::{CorrelationError, Result};
use crate::filter::{FilterStrategy, KnnFilter, ThresholdFilter};
use crate::matrix::CovarianceMatrix;
use crate::monitor::Monitor;
use crate::vector::{ContinuousDataVector, RowVector, TokenisedDataVector};
use rayon::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Drives an algorithm over every unordered pair of a vector collection.
pub struct PairwiseEvaluator<'m> {
    monitor: &'m dyn Monitor,
    pool: Option<rayon::ThreadPool>,
}

impl<'m> PairwiseEvaluator<'m> {
    /// Evaluator on the global rayon pool.
    pub fn new(monitor: &'m dyn Monitor) -> Self {
        Self {
            monitor,
            pool: None,
        }
    }

    /// Run on a dedicated pool of `threads` workers.
    pub fn with_threads(mut self, threads: usize) -> Result<Self> {
        if threads == 0 {
            return Err(CorrelationError::InvalidParameter(
                "thread count must be at least 1".into(),
            ));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| CorrelationError::ThreadPool(e.to_string()))?;
        self.pool = Some(pool);
        Ok(self)
    }

    /// Evaluate every pair and feed `filter`.
    ///
    /// Returns `Ok(None)` if the monitor requested cancellation.
    ///
    /// # Errors
    ///
    /// [`CorrelationError::DimensionMismatch`] if the vectors differ in length,
    /// [`CorrelationError::StaleStatistics`] if any vector was modified
    /// without `update()`.
    pub fn process<A, F>(
        &self,
        algorithm: &A,
        vectors: &[A::Vector],
        filter: F,
    ) -> Result<Option<Vec<Relation>>>
    where
        A: CorrelationAlgorithm,
        F: FilterStrategy,
    {
        if vectors.is_empty() {
            return Ok(Some(Vec::new()));
        }
        let size = check_vectors(vectors)?;

        let started = Instant::now();
        let locals = match &self.pool {
            Some(pool) => pool.install(|| self.run(algorithm, size, vectors, &filter)),
            None => self.run(algorithm, size, vectors, &filter),
        };

        let Some(locals) = locals else {
            tracing::warn!(
                algorithm = algorithm.info().name,
                vectors = vectors.len(),
                "correlation cancelled"
            );
            return Ok(None);
        };

        self.monitor.set_progress(None);
        let relations = filter.results(locals);
        self.monitor.set_progress(Some(100));

        tracing::info!(
            algorithm = algorithm.info().name,
            vectors = vectors.len(),
            relations = relations.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "correlation complete"
        );

        Ok(Some(relations))
    }

    fn run<A, F>(
        &self,
        algorithm: &A,
        size: usize,
        vectors: &[A::Vector],
        filter: &F,
    ) -> Option<Vec<F::Local>>
    where
        A: CorrelationAlgorithm,
        F: FilterStrategy,
    {
        self.monitor.set_progress(None);
        algorithm.generate_rankings(vectors);
        let prepared = algorithm.preprocess(size, vectors);
        let prepared: &[A::Vector] = &prepared;
        let progress = Progress::start(self.monitor, vectors);

        let locals: Vec<F::Local> = (0..prepared.len())
            .into_par_iter()
            .fold(
                || filter.local(),
                |mut local, i| {
                    if self.monitor.is_cancelled() {
                        return local;
                    }

                    let a = &prepared[i];
                    for (j, b) in prepared.iter().enumerate().skip(i + 1) {
                        let r = algorithm.evaluate(size, a, b);
                        if r.is_finite() {
                            filter.add(&mut local, i, j, r);
                        }
                    }

                    progress.finished(vectors[i].compute_cost_hint());
                    local
                },
            )
            .collect();

        if self.monitor.is_cancelled() {
            return None;
        }
        Some(locals)
    }

    /// Write every `evaluate(i, j)` with `j >= i` straight into `matrix`.
    ///
    /// Returns `false` if cancelled.
    fn fill<A>(
        &self,
        algorithm: &A,
        size: usize,
        vectors: &[A::Vector],
        matrix: &mut CovarianceMatrix,
    ) -> bool
    where
        A: CorrelationAlgorithm,
    {
        self.monitor.set_progress(None);
        algorithm.generate_rankings(vectors);
        let prepared = algorithm.preprocess(size, vectors);
        let prepared: &[A::Vector] = &prepared;
        let progress = Progress::start(self.monitor, vectors);

        matrix
            .rows_mut()
            .into_par_iter()
            .enumerate()
            .for_each(|(i, row)| {
                if self.monitor.is_cancelled() {
                    return;
                }

                let a = &prepared[i];
                for (cell, b) in row.iter_mut().zip(&prepared[i..]) {
                    let r = algorithm.evaluate(size, a, b);
                    if r.is_finite() {
                        *cell = r;
                    }
                }

                progress.finished(vectors[i].compute_cost_hint());
            });

        !self.monitor.is_cancelled()
    }

    /// Thresholded or k-NN edges between `vectors`, keyed by node id.
    ///
    /// Returns `Ok(None)` if cancelled.
    pub fn edges<A>(
        &self,
        algorithm: &A,
        vectors: &[A::Vector],
        parameters: &CorrelationParameters,
    ) -> Result<Option<EdgeList>>
    where
        A: CorrelationAlgorithm,
    {
        parameters.validate()?;

        let relations = match parameters.filter {
            FilterType::Threshold => self.process(
                algorithm,
                vectors,
                ThresholdFilter::new(parameters.polarity, parameters.minimum_threshold),
            )?,
            FilterType::Knn => self.process(
                algorithm,
                vectors,
                KnnFilter::new(
                    vectors.len(),
                    parameters.maximum_k as usize,
                    parameters.polarity,
                    parameters.minimum_threshold,
                ),
            )?,
        };

        Ok(relations.map(|relations| {
            relations
                .into_iter()
                .map(|relation| Edge {
                    source: vectors[relation.a].node_id(),
                    target: vectors[relation.b].node_id(),
                    weight: relation.r,
                })
                .collect()
        }))
    }

    /// Dense symmetric matrix of `algorithm` over `vectors`, diagonal included.
    ///
    /// Non-finite entries are left at 0. Returns `Ok(None)` if cancelled.
    ///
    /// # Errors
    ///
    /// As for [`process`](Self::process).
    pub fn matrix<A>(
        &self,
        algorithm: &A,
        vectors: &[A::Vector],
    ) -> Result<Option<CovarianceMatrix>>
    where
        A: CorrelationAlgorithm,
    {
        let mut matrix = CovarianceMatrix::new(vectors.len());
        if vectors.is_empty() {
            return Ok(Some(matrix));
        }
        let size = check_vectors(vectors)?;

        let started = Instant::now();
        let completed = match &self.pool {
            Some(pool) => pool.install(|| self.fill(algorithm, size, vectors, &mut matrix)),
            None => self.fill(algorithm, size, vectors, &mut matrix),
        };

        if !completed {
            tracing::warn!(
                algorithm = algorithm.info().name,
                vectors = vectors.len(),
                "correlation matrix cancelled"
            );
            return Ok(None);
        }

        self.monitor.set_progress(Some(100));
        tracing::info!(
            algorithm = algorithm.info().name,
            vectors = vectors.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "correlation matrix complete"
        );

        Ok(Some(matrix))
    }
}

/// Cost-weighted completion: `Σ cost of finished outer indices · 100 / Σ cost`.
struct Progress<'m> {
    monitor: &'m dyn Monitor,
    total: u64,
    done: AtomicU64,
}

impl<'m> Progress<'m> {
    fn start<V: RowVector>(monitor: &'m dyn Monitor, vectors: &[V]) -> Self {
        let total: u64 = vectors.iter().map(RowVector::compute_cost_hint).sum();
        monitor.set_progress(Some(0));
        Self {
            monitor,
            total: total.max(1),
            done: AtomicU64::new(0),
        }
    }

    fn finished(&self, cost: u64) {
        let done = self.done.fetch_add(cost, Ordering::Relaxed) + cost;
        let percent = (done.saturating_mul(100) / self.total).min(100);
        self.monitor.set_progress(Some(percent as u8));
    }
}

fn check_vectors<V: RowVector>(vectors: &[V]) -> Result<usize> {
    let expected = vectors.first().map_or(0, RowVector::size);

    for (index, vector) in vectors.iter().enumerate() {
        if vector.size() != expected {
            return Err(CorrelationError::DimensionMismatch {
                index,
                expected,
                actual: vector.size(),
            });
        }
        if !vector.is_up_to_date() {
            return Err(CorrelationError::StaleStatistics { index });
        }
    }

    Ok(expected)
}

/// Input rows in the representation the selected algorithm consumes.
#[derive(Debug, Clone, Copy)]
pub enum Rows<'a> {
    Continuous(&'a [ContinuousDataVector]),
    Discrete(&'a [TokenisedDataVector]),
}

impl Rows<'_> {
    pub fn len(&self) -> usize {
        match self {
            Rows::Continuous(rows) => rows.len(),
            Rows::Discrete(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn mismatch(kind: AlgorithmKind) -> CorrelationError {
    CorrelationError::DataTypeMismatch {
        algorithm: info_for(kind).name,
        expected: kind.data_type(),
    }
}

/// Edge list for `rows` under `parameters`. Empty if cancelled.
///
/// # Errors
///
/// Invalid parameters, a data type the algorithm cannot read, or
/// inconsistent vectors.
pub fn edge_list(
    rows: Rows<'_>,
    parameters: &CorrelationParameters,
    monitor: &dyn Monitor,
) -> Result<EdgeList> {
    let evaluator = PairwiseEvaluator::new(monitor);
    let binary = parameters.treat_as_binary;

    let edges = match (parameters.algorithm, rows) {
        (AlgorithmKind::Pearson, Rows::Continuous(v)) => evaluator.edges(&Pearson, v, parameters),
        (AlgorithmKind::SpearmanRank, Rows::Continuous(v)) => {
            evaluator.edges(&SpearmanRank, v, parameters)
        }
        (AlgorithmKind::EuclideanSimilarity, Rows::Continuous(v)) => {
            evaluator.edges(&EuclideanSimilarity, v, parameters)
        }
        (AlgorithmKind::CosineSimilarity, Rows::Continuous(v)) => {
            evaluator.edges(&CosineSimilarity, v, parameters)
        }
        (AlgorithmKind::Bicor, Rows::Continuous(v)) => evaluator.edges(&Bicor, v, parameters),
        (AlgorithmKind::Jaccard, Rows::Discrete(v)) => evaluator.edges(
            &Jaccard {
                treat_as_binary: binary,
            },
            v,
            parameters,
        ),
        (AlgorithmKind::SimpleMatchingCoefficient, Rows::Discrete(v)) => evaluator.edges(
            &SimpleMatchingCoefficient {
                treat_as_binary: binary,
            },
            v,
            parameters,
        ),
        (kind, _) => return Err(mismatch(kind)),
    }?;

    Ok(edges.unwrap_or_default())
}

/// Full pairwise matrix for `rows` under `parameters.algorithm`.
///
/// The filter settings play no part here; only the threshold is validated.
/// A cancelled run yields a 0×0 matrix.
///
/// # Errors
///
/// As for [`edge_list`].
pub fn covariance_matrix(
    rows: Rows<'_>,
    parameters: &CorrelationParameters,
    monitor: &dyn Monitor,
) -> Result<CovarianceMatrix> {
    parameters.validate_threshold()?;
    let evaluator = PairwiseEvaluator::new(monitor);
    let binary = parameters.treat_as_binary;

    let matrix = match (parameters.algorithm, rows) {
        (AlgorithmKind::Pearson, Rows::Continuous(v)) => evaluator.matrix(&Pearson, v),
        (AlgorithmKind::SpearmanRank, Rows::Continuous(v)) => evaluator.matrix(&SpearmanRank, v),
        (AlgorithmKind::EuclideanSimilarity, Rows::Continuous(v)) => {
            evaluator.matrix(&EuclideanSimilarity, v)
        }
        (AlgorithmKind::CosineSimilarity, Rows::Continuous(v)) => {
            evaluator.matrix(&CosineSimilarity, v)
        }
        (AlgorithmKind::Bicor, Rows::Continuous(v)) => evaluator.matrix(&Bicor, v),
        (AlgorithmKind::Jaccard, Rows::Discrete(v)) => evaluator.matrix(
            &Jaccard {
                treat_as_binary: binary,
            },
            v,
        ),
        (AlgorithmKind::SimpleMatchingCoefficient, Rows::Discrete(v)) => evaluator.matrix(
            &SimpleMatchingCoefficient {
                treat_as_binary: binary,
            },
            v,
        ),
        (kind, _) => return Err(mismatch(kind)),
    }?;

    Ok(matrix.unwrap_or_else(|| CovarianceMatrix::new(0)))
}
