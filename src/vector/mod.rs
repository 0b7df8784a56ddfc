//! Data vectors: one source row (or column) plus cached statistics.
//!
//! Continuous vectors cache [`Statistics`] computed by an explicit
//! [`ContinuousDataVector::update`]. Mutating a value marks the vector stale;
//! the evaluator refuses stale vectors rather than correlating with outdated
//! sums.
//!
//! Rank-transformed views for Spearman correlation are separate owned
//! vectors, created lazily and cached inside the source vector.

mod stats;

pub use stats::Statistics;
pub(crate) use stats::{average_ranks, median};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Identifier of the graph node a vector represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl From<usize> for NodeId {
    fn from(id: usize) -> Self {
        NodeId(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered values for one source row, its node and a compute cost hint.
///
/// The cost hint weights progress reporting: earlier rows are compared
/// against more partners than later ones.
#[derive(Debug, Clone, PartialEq)]
pub struct DataVector<T> {
    data: Vec<T>,
    node_id: NodeId,
    cost: u64,
}

impl<T: Clone> DataVector<T> {
    /// Vector with unit cost.
    pub fn new(data: Vec<T>, node_id: NodeId) -> Self {
        Self {
            data,
            node_id,
            cost: 1,
        }
    }

    /// Row `row` of row-major `data` with `num_columns` values per row.
    ///
    /// # Panics
    ///
    /// Panics if the row lies outside `data`.
    pub fn from_row(data: &[T], row: usize, num_columns: usize, node_id: NodeId) -> Self {
        let start = row * num_columns;
        Self::new(data[start..start + num_columns].to_vec(), node_id)
    }

    /// Column `column` of row-major `data`. The node id is the column index.
    ///
    /// # Panics
    ///
    /// Panics if the column lies outside `data`.
    pub fn from_column(data: &[T], column: usize, num_columns: usize, num_rows: usize) -> Self {
        let values = (0..num_rows)
            .map(|row| data[(row * num_columns) + column].clone())
            .collect();
        Self::new(values, NodeId(column))
    }

    #[must_use]
    pub fn with_cost(mut self, cost: u64) -> Self {
        self.cost = cost;
        self
    }
}

impl<T> DataVector<T> {
    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn value_at(&self, index: usize) -> &T {
        &self.data[index]
    }

    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    pub fn compute_cost_hint(&self) -> u64 {
        self.cost
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }
}

/// What the evaluator needs to know about any vector it correlates.
pub trait RowVector {
    fn size(&self) -> usize;
    fn node_id(&self) -> NodeId;
    fn compute_cost_hint(&self) -> u64;

    /// Whether derived state (statistics) matches the values.
    fn is_up_to_date(&self) -> bool {
        true
    }
}

impl<T> RowVector for DataVector<T> {
    fn size(&self) -> usize {
        self.data.len()
    }

    fn node_id(&self) -> NodeId {
        self.node_id
    }

    fn compute_cost_hint(&self) -> u64 {
        self.cost
    }
}

/// Categorical row values.
pub type DiscreteDataVector = DataVector<String>;

/// Integer-coded categorical row values. Token 0 is "falsey".
pub type TokenisedDataVector = DataVector<usize>;

/// Floating point row values with cached statistics.
#[derive(Debug, Clone)]
pub struct ContinuousDataVector {
    inner: DataVector<f64>,
    stats: Statistics,
    fresh: bool,
    ranking: OnceLock<Box<ContinuousDataVector>>,
}

impl ContinuousDataVector {
    /// Build from values and compute statistics.
    pub fn new(data: Vec<f64>, node_id: NodeId) -> Self {
        Self::from_inner(DataVector::new(data, node_id))
    }

    pub fn from_row(data: &[f64], row: usize, num_columns: usize, node_id: NodeId) -> Self {
        Self::from_inner(DataVector::from_row(data, row, num_columns, node_id))
    }

    pub fn from_column(data: &[f64], column: usize, num_columns: usize, num_rows: usize) -> Self {
        Self::from_inner(DataVector::from_column(data, column, num_columns, num_rows))
    }

    fn from_inner(inner: DataVector<f64>) -> Self {
        let mut vector = Self {
            inner,
            stats: Statistics::default(),
            fresh: false,
            ranking: OnceLock::new(),
        };
        vector.update();
        vector
    }

    #[must_use]
    pub fn with_cost(mut self, cost: u64) -> Self {
        self.inner.cost = cost;
        self
    }

    /// Recompute cached statistics and drop any cached ranking.
    pub fn update(&mut self) {
        self.stats = Statistics::of(&self.inner.data);
        self.ranking = OnceLock::new();
        self.fresh = true;
    }

    /// Overwrite a value. Statistics are stale until [`update`](Self::update) runs.
    pub fn set_value_at(&mut self, index: usize, value: f64) {
        self.inner.data[index] = value;
        self.fresh = false;
    }

    /// Mutable access to all values. Marks the vector stale.
    pub fn values_mut(&mut self) -> &mut [f64] {
        self.fresh = false;
        &mut self.inner.data
    }

    /// Whether the cached statistics reflect the current values.
    pub fn is_up_to_date(&self) -> bool {
        self.fresh
    }

    pub fn data(&self) -> &[f64] {
        self.inner.data()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn value_at(&self, index: usize) -> f64 {
        self.inner.data[index]
    }

    pub fn node_id(&self) -> NodeId {
        self.inner.node_id
    }

    pub fn compute_cost_hint(&self) -> u64 {
        self.inner.cost
    }

    pub fn statistics(&self) -> &Statistics {
        debug_assert!(self.fresh, "statistics read before update()");
        &self.stats
    }

    pub fn sum(&self) -> f64 {
        self.statistics().sum
    }

    pub fn sum_sq(&self) -> f64 {
        self.statistics().sum_sq
    }

    pub fn variability(&self) -> f64 {
        self.statistics().variability
    }

    pub fn magnitude(&self) -> f64 {
        self.statistics().magnitude
    }

    pub fn mean(&self) -> f64 {
        self.statistics().mean
    }

    pub fn variance(&self) -> f64 {
        self.statistics().variance
    }

    pub fn stddev(&self) -> f64 {
        self.statistics().stddev
    }

    pub fn coef_var(&self) -> f64 {
        self.statistics().coef_var
    }

    pub fn min_value(&self) -> f64 {
        self.statistics().min
    }

    pub fn max_value(&self) -> f64 {
        self.statistics().max
    }

    pub fn largest_column_index(&self) -> usize {
        self.statistics().largest_index
    }

    /// Rank-transformed copy of this vector, computed on first request.
    pub fn ranking(&self) -> &ContinuousDataVector {
        self.ranking.get_or_init(|| {
            let ranks = average_ranks(&self.inner.data);
            let ranked = DataVector {
                data: ranks,
                node_id: self.inner.node_id,
                cost: self.inner.cost,
            };
            Box::new(Self::from_inner(ranked))
        })
    }

    /// Whether the ranking has already been computed.
    pub fn has_ranking(&self) -> bool {
        self.ranking.get().is_some()
    }
}

impl RowVector for ContinuousDataVector {
    fn size(&self) -> usize {
        self.inner.data.len()
    }

    fn node_id(&self) -> NodeId {
        self.inner.node_id
    }

    fn compute_cost_hint(&self) -> u64 {
        self.inner.cost
    }

    fn is_up_to_date(&self) -> bool {
        self.fresh
    }
}

/// Build one continuous vector per row of row-major `data`.
///
/// Node ids are row indices; the cost hint of row `r` is `num_rows - r + 1`.
///
/// # Panics
///
/// In debug builds, if `data` does not hold a whole number of rows. Use
/// [`RawTable::new`](crate::preprocess::RawTable::new) to get that as an error.
pub fn continuous_rows(data: &[f64], num_columns: usize) -> Vec<ContinuousDataVector> {
    if num_columns == 0 {
        return Vec::new();
    }
    debug_assert_eq!(
        data.len() % num_columns,
        0,
        "{} values do not fill rows of {num_columns} columns",
        data.len()
    );

    let num_rows = data.len() / num_columns;
    (0..num_rows)
        .map(|row| {
            ContinuousDataVector::from_row(data, row, num_columns, NodeId(row))
                .with_cost((num_rows - row + 1) as u64)
        })
        .collect()
}

/// Build one continuous vector per column of row-major `data`.
pub fn continuous_columns(
    data: &[f64],
    num_columns: usize,
    num_rows: usize,
) -> Vec<ContinuousDataVector> {
    (0..num_columns)
        .map(|column| ContinuousDataVector::from_column(data, column, num_columns, num_rows))
        .collect()
}

/// Map categorical values to integer tokens shared across all vectors.
///
/// `""`, `"0"` and `"false"` all map to token 0; other values get tokens
/// from 1 upward in order of first appearance.
pub fn tokenise(vectors: &[DiscreteDataVector]) -> Vec<TokenisedDataVector> {
    let mut tokens: HashMap<&str, usize> = HashMap::new();
    for falsey in ["", "0", "false"] {
        tokens.insert(falsey, 0);
    }
    let mut next = 1;

    vectors
        .iter()
        .map(|vector| {
            let data = vector
                .iter()
                .map(|value| {
                    *tokens.entry(value.as_str()).or_insert_with(|| {
                        next += 1;
                        next - 1
                    })
                })
                .collect();

            DataVector::new(data, vector.node_id()).with_cost(vector.compute_cost_hint())
        })
        .collect()
}
