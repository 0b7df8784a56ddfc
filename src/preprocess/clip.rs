//! Upper-tail clipping of row values.

use crate::error::{CorrelationError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ClippingPolicy {
    #[default]
    None,
    /// Clamp every value above a fixed ceiling.
    Constant(f64),
    /// Per row, clamp every value above the value at the given percentile rank.
    Winsorization(f64),
}

impl ClippingPolicy {
    pub fn validate(&self) -> Result<()> {
        match *self {
            ClippingPolicy::None => Ok(()),
            ClippingPolicy::Constant(ceiling) if ceiling.is_nan() => Err(
                CorrelationError::InvalidParameter("clipping ceiling must not be NaN".into()),
            ),
            ClippingPolicy::Winsorization(p) if !(0.0..=100.0).contains(&p) => {
                Err(CorrelationError::InvalidParameter(format!(
                    "winsorization percentile must be within [0, 100], got {p}"
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Apply `policy` to row-major `values` with `num_columns` values per row.
pub fn clip(values: &mut [f64], num_columns: usize, policy: ClippingPolicy) {
    match policy {
        ClippingPolicy::None => {}
        ClippingPolicy::Constant(ceiling) => {
            for value in values.iter_mut() {
                *value = value.min(ceiling);
            }
        }
        ClippingPolicy::Winsorization(percentile) => {
            if num_columns == 0 {
                return;
            }

            let rank = ((percentile / 100.0) * (num_columns - 1) as f64).floor() as usize;
            let mut sorted = Vec::with_capacity(num_columns);

            for row in values.chunks_mut(num_columns) {
                sorted.clear();
                sorted.extend_from_slice(row);
                sorted.sort_by(f64::total_cmp);
                let ceiling = sorted[rank.min(sorted.len() - 1)];

                for value in row.iter_mut() {
                    if *value > ceiling {
                        *value = ceiling;
                    }
                }
            }
        }
    }
}
