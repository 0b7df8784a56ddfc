//! Column-wise normalisation of a vector collection.
//!
//! Every normaliser treats the collection as a table (one vector per row)
//! and transforms each column independently. Vectors are refreshed with
//! [`ContinuousDataVector::update`] afterwards.

use crate::vector::ContinuousDataVector;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NormaliseType {
    #[default]
    None,
    MinMax,
    Mean,
    Standardisation,
    UnitScaling,
    Quantile,
    Softmax,
}

impl NormaliseType {
    /// Normalise `vectors` in place and recompute their statistics.
    pub fn apply(self, vectors: &mut [ContinuousDataVector]) {
        match self {
            NormaliseType::None => return,
            NormaliseType::MinMax => MinMax.normalise(vectors),
            NormaliseType::Mean => Mean.normalise(vectors),
            NormaliseType::Standardisation => Standardisation.normalise(vectors),
            NormaliseType::UnitScaling => UnitScaling.normalise(vectors),
            NormaliseType::Quantile => Quantile.normalise(vectors),
            NormaliseType::Softmax => Softmax.normalise(vectors),
        }

        for vector in vectors.iter_mut() {
            vector.update();
        }
    }
}

/// A transform over a whole collection. Leaves vectors stale.
pub trait Normaliser {
    fn normalise(&self, vectors: &mut [ContinuousDataVector]);
}

fn num_columns(vectors: &[ContinuousDataVector]) -> usize {
    vectors.first().map_or(0, ContinuousDataVector::len)
}

#[derive(Debug, Clone)]
struct ColumnStats {
    min: Vec<f64>,
    max: Vec<f64>,
    mean: Vec<f64>,
}

impl ColumnStats {
    fn of(vectors: &[ContinuousDataVector]) -> Self {
        let columns = num_columns(vectors);
        let rows = vectors.len() as f64;
        let mut stats = Self {
            min: vec![f64::MAX; columns],
            max: vec![f64::MIN; columns],
            mean: vec![0.0; columns],
        };

        for vector in vectors {
            for (column, &value) in vector.data().iter().enumerate() {
                stats.min[column] = stats.min[column].min(value);
                stats.max[column] = stats.max[column].max(value);
                stats.mean[column] += value / rows;
            }
        }

        stats
    }

    fn ranges(&self) -> Vec<f64> {
        self.max.iter().zip(&self.min).map(|(max, min)| max - min).collect()
    }

    fn stddevs(&self, vectors: &[ContinuousDataVector]) -> Vec<f64> {
        let rows = vectors.len() as f64;
        let mut variance = vec![0.0; self.mean.len()];
        for vector in vectors {
            for (column, &value) in vector.data().iter().enumerate() {
                let deviation = value - self.mean[column];
                variance[column] += (deviation * deviation) / rows;
            }
        }
        variance.into_iter().map(f64::sqrt).collect()
    }
}

/// `v = (v - subtract) / denominator` per column; columns with a
/// non-positive denominator become 0.
fn shift_and_divide(
    vectors: &mut [ContinuousDataVector],
    subtract: &[f64],
    denominators: &[f64],
    normaliser: &'static str,
) {
    let degenerate = denominators.iter().filter(|&&d| d <= 0.0 || d.is_nan()).count();
    if degenerate > 0 {
        tracing::warn!(normaliser, columns = degenerate, "zero-range columns set to 0");
    }

    for vector in vectors.iter_mut() {
        for (column, value) in vector.values_mut().iter_mut().enumerate() {
            let denominator = denominators[column];
            *value = if denominator > 0.0 {
                (*value - subtract[column]) / denominator
            } else {
                0.0
            };
        }
    }
}

/// Rescale each column onto `[0, 1]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinMax;

impl Normaliser for MinMax {
    fn normalise(&self, vectors: &mut [ContinuousDataVector]) {
        let stats = ColumnStats::of(vectors);
        shift_and_divide(vectors, &stats.min, &stats.ranges(), "min-max");
    }
}

/// Centre each column on its mean, divided by its range.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mean;

impl Normaliser for Mean {
    fn normalise(&self, vectors: &mut [ContinuousDataVector]) {
        let stats = ColumnStats::of(vectors);
        shift_and_divide(vectors, &stats.mean, &stats.ranges(), "mean");
    }
}

/// z-score each column with the population standard deviation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Standardisation;

impl Normaliser for Standardisation {
    fn normalise(&self, vectors: &mut [ContinuousDataVector]) {
        let stats = ColumnStats::of(vectors);
        let stddevs = stats.stddevs(vectors);
        shift_and_divide(vectors, &stats.mean, &stddevs, "standardisation");
    }
}

/// Divide each column by its Euclidean length.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitScaling;

impl Normaliser for UnitScaling {
    fn normalise(&self, vectors: &mut [ContinuousDataVector]) {
        let mut lengths = vec![0.0; num_columns(vectors)];
        for vector in vectors.iter() {
            for (column, &value) in vector.data().iter().enumerate() {
                lengths[column] += value * value;
            }
        }
        for length in &mut lengths {
            *length = length.sqrt();
        }

        let origin = vec![0.0; lengths.len()];
        shift_and_divide(vectors, &origin, &lengths, "unit scaling");
    }
}

/// Give every column the same distribution: the mean of the sorted columns.
///
/// Each value is replaced by the mean for its rank among the column's
/// distinct values, so ties share a value.
#[derive(Debug, Clone, Copy, Default)]
pub struct Quantile;

impl Normaliser for Quantile {
    fn normalise(&self, vectors: &mut [ContinuousDataVector]) {
        let rows = vectors.len();
        let columns = num_columns(vectors);
        if rows == 0 || columns == 0 {
            return;
        }

        let mut ranks = vec![0usize; rows * columns];
        let mut row_means = vec![0.0; rows];

        for column in 0..columns {
            let mut sorted: Vec<f64> = vectors.iter().map(|v| v.value_at(column)).collect();
            sorted.sort_by(f64::total_cmp);

            let mut distinct = sorted.clone();
            distinct.dedup();

            for (row, vector) in vectors.iter().enumerate() {
                let value = vector.value_at(column);
                ranks[row * columns + column] = distinct.partition_point(|&d| d < value);
            }

            for (mean, value) in row_means.iter_mut().zip(&sorted) {
                *mean += value / columns as f64;
            }
        }

        for (row, vector) in vectors.iter_mut().enumerate() {
            for (column, value) in vector.values_mut().iter_mut().enumerate() {
                *value = row_means[ranks[row * columns + column]];
            }
        }
    }
}

/// Per column, `exp(v - max) / Σ exp(v - max)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Softmax;

impl Normaliser for Softmax {
    fn normalise(&self, vectors: &mut [ContinuousDataVector]) {
        let columns = num_columns(vectors);
        let mut max = vec![f64::MIN; columns];
        for vector in vectors.iter() {
            for (column, &value) in vector.data().iter().enumerate() {
                max[column] = max[column].max(value);
            }
        }

        let mut sums = vec![0.0; columns];
        for vector in vectors.iter() {
            for (column, &value) in vector.data().iter().enumerate() {
                sums[column] += (value - max[column]).exp();
            }
        }

        for vector in vectors.iter_mut() {
            for (column, value) in vector.values_mut().iter_mut().enumerate() {
                *value = (*value - max[column]).exp() / sums[column];
            }
        }
    }
}
