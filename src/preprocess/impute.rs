//! Missing value imputation.

use super::RawTable;
use serde::{Deserialize, Serialize};

/// How an empty cell is filled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MissingDataPolicy {
    /// Use a fixed replacement value.
    Constant(f64),
    /// Mean of the non-empty values in the same column (0 if none).
    ColumnAverage,
    /// Linear interpolation between the nearest non-empty cells to the left
    /// and right on the same row.
    RowInterpolation,
}

impl Default for MissingDataPolicy {
    fn default() -> Self {
        MissingDataPolicy::Constant(0.0)
    }
}

/// Dense row-major values with every empty cell filled according to `policy`.
pub fn impute(table: &RawTable, policy: MissingDataPolicy) -> Vec<f64> {
    let averages = match policy {
        MissingDataPolicy::ColumnAverage => column_averages(table),
        _ => Vec::new(),
    };

    let mut values = Vec::with_capacity(table.num_rows() * table.num_columns());
    let mut imputed = 0usize;

    for row in 0..table.num_rows() {
        for column in 0..table.num_columns() {
            let value = table.value_at(column, row).unwrap_or_else(|| {
                imputed += 1;
                match policy {
                    MissingDataPolicy::Constant(replacement) => replacement,
                    MissingDataPolicy::ColumnAverage => averages[column],
                    MissingDataPolicy::RowInterpolation => interpolate(table, column, row),
                }
            });
            values.push(value);
        }
    }

    if imputed > 0 {
        tracing::debug!(cells = imputed, ?policy, "imputed missing values");
    }

    values
}

fn column_averages(table: &RawTable) -> Vec<f64> {
    (0..table.num_columns())
        .map(|column| {
            let (sum, count) = (0..table.num_rows())
                .filter_map(|row| table.value_at(column, row))
                .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

            if count > 0 {
                sum / count as f64
            } else {
                0.0
            }
        })
        .collect()
}

fn interpolate(table: &RawTable, column: usize, row: usize) -> f64 {
    let right = (column + 1..table.num_columns())
        .find_map(|c| table.value_at(c, row).map(|v| (c - column, v)));
    let left = (0..column)
        .rev()
        .find_map(|c| table.value_at(c, row).map(|v| (column - c, v)));

    match (left, right) {
        (Some((left_distance, left_value)), Some((right_distance, right_value))) => {
            let t = left_distance as f64 / (left_distance + right_distance) as f64;
            t.mul_add(right_value, (-t).mul_add(left_value, left_value))
        }
        (Some((_, value)), None) | (None, Some((_, value))) => value,
        (None, None) => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(values: Vec<Option<f64>>, num_columns: usize) -> RawTable {
        let num_rows = values.len() / num_columns;
        RawTable::new(values, num_columns, num_rows).unwrap()
    }

    #[test]
    fn constant_replacement() {
        let t = table(vec![Some(1.0), None, None, Some(4.0)], 2);
        assert_eq!(impute(&t, MissingDataPolicy::Constant(-1.0)), vec![1.0, -1.0, -1.0, 4.0]);
    }

    #[test]
    fn column_average_ignores_empty_cells() {
        let t = table(
            vec![Some(1.0), None, None, None, Some(3.0), Some(8.0)],
            2,
        );
        assert_eq!(
            impute(&t, MissingDataPolicy::ColumnAverage),
            vec![1.0, 8.0, 2.0, 8.0, 3.0, 8.0]
        );
    }

    #[test]
    fn row_interpolation_weights_by_distance() {
        let t = table(vec![Some(2.0), None, None, None, Some(10.0)], 5);
        let values = impute(&t, MissingDataPolicy::RowInterpolation);
        assert_eq!(values, vec![2.0, 4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn row_interpolation_falls_back_to_single_neighbour() {
        let t = table(vec![None, Some(3.0), None, None, None, None], 3);
        let values = impute(&t, MissingDataPolicy::RowInterpolation);
        assert_eq!(values, vec![3.0, 3.0, 3.0, 0.0, 0.0, 0.0]);
    }
}
