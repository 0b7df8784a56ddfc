//! Dense symmetric matrix of pairwise values.

/// Square `N×N` matrix with symmetric storage.
///
/// Only the upper triangle (including the diagonal) is stored, so
/// `value_at(c, r) == value_at(r, c)` always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct CovarianceMatrix {
    size: usize,
    values: Vec<f64>,
}

impl CovarianceMatrix {
    /// Zero-filled matrix of `size × size`.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            values: vec![0.0; size * (size + 1) / 2],
        }
    }

    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn offset(&self, column: usize, row: usize) -> usize {
        let (i, j) = if column <= row {
            (column, row)
        } else {
            (row, column)
        };
        debug_assert!(j < self.size, "matrix index out of range");
        // Row i of the upper triangle starts after i rows of shrinking length.
        (i * (2 * self.size - i + 1)) / 2 + (j - i)
    }

    /// # Panics
    ///
    /// Panics if either index is out of range.
    #[inline]
    pub fn value_at(&self, column: usize, row: usize) -> f64 {
        self.values[self.offset(column, row)]
    }

    /// Set the value at `(column, row)`, which is also the value at `(row, column)`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    #[inline]
    pub fn set_value_at(&mut self, column: usize, row: usize, value: f64) {
        let offset = self.offset(column, row);
        self.values[offset] = value;
    }

    /// Disjoint mutable slices, one per stored row. Row `i` holds columns `i..size`.
    pub(crate) fn rows_mut(&mut self) -> Vec<&mut [f64]> {
        let size = self.size;
        let mut rows = Vec::with_capacity(size);
        let mut rest = self.values.as_mut_slice();
        for i in 0..size {
            let (row, tail) = std::mem::take(&mut rest).split_at_mut(size - i);
            rows.push(row);
            rest = tail;
        }
        rows
    }

    /// Expand to a full row-major `N×N` buffer.
    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = Vec::with_capacity(self.size * self.size);
        for row in 0..self.size {
            for column in 0..self.size {
                dense.push(self.value_at(column, row));
            }
        }
        dense
    }
}
