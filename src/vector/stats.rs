//! Summary statistics cached on continuous vectors.

/// Summary statistics of a sequence of values.
///
/// `variability` is `sqrt(n·Σ(x − mean)²)`, the per-vector factor of the
/// Pearson denominator. It is exactly 0 when every value is equal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    pub min: f64,
    pub max: f64,
    pub range: f64,
    /// Index of the element with the largest magnitude (first one on ties).
    pub largest_index: usize,
    pub sum: f64,
    pub sum_sq: f64,
    pub variability: f64,
    /// L2 norm.
    pub magnitude: f64,
    pub mean: f64,
    /// Population variance.
    pub variance: f64,
    pub stddev: f64,
    /// `stddev / mean`; NaN unless every value is non-negative and the mean is positive.
    pub coef_var: f64,
}

impl Default for Statistics {
    fn default() -> Self {
        Self {
            min: f64::MAX,
            max: f64::MIN,
            range: 0.0,
            largest_index: 0,
            sum: 0.0,
            sum_sq: 0.0,
            variability: 0.0,
            magnitude: 0.0,
            mean: 0.0,
            variance: 0.0,
            stddev: 0.0,
            coef_var: f64::NAN,
        }
    }
}

impl Statistics {
    /// Compute statistics for `values`. Empty input yields the default.
    #[must_use]
    pub fn of(values: &[f64]) -> Self {
        let mut s = Self::default();
        if values.is_empty() {
            return s;
        }

        let n = values.len() as f64;
        let mut all_non_negative = true;
        let mut largest = 0.0_f64;

        for (i, &value) in values.iter().enumerate() {
            all_non_negative = all_non_negative && !value.is_sign_negative();
            s.sum += value;
            s.sum_sq += value * value;
            s.min = s.min.min(value);
            s.max = s.max.max(value);

            if value.abs() > largest.abs() {
                s.largest_index = i;
                largest = value;
            }
        }

        s.mean = s.sum / n;
        s.range = s.max - s.min;
        s.magnitude = s.sum_sq.sqrt();

        let squared_deviations: f64 = values.iter().map(|&v| (v - s.mean).powi(2)).sum();
        // The mean of a constant run of non-integers is not exact.
        s.variability = if s.min == s.max {
            0.0
        } else {
            (n * squared_deviations).sqrt()
        };
        s.variance = squared_deviations / n;
        s.stddev = s.variance.sqrt();
        s.coef_var = if all_non_negative && s.mean > 0.0 {
            s.stddev / s.mean
        } else {
            f64::NAN
        };

        s
    }
}

/// Median of `values`; NaN for empty input.
pub(crate) fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Average ranks, 1-based. Tied values share the mean of the ranks they span.
pub(crate) fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }

        // Ranks start..end (0-based) averaged, then shifted to 1-based.
        let rank = (start + end - 1) as f64 / 2.0 + 1.0;
        for &index in &order[start..end] {
            ranks[index] = rank;
        }

        start = end;
    }

    ranks
}
