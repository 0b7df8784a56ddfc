//! Correlation algorithms over tokenised categorical vectors.
//!
//! Token 0 is "falsey" (empty, `"0"`, `"false"`). In exact mode two positions
//! agree when their tokens are equal; in binary mode they agree when both are
//! truthy.

use super::{AlgorithmInfo, CorrelationAlgorithm};
use crate::vector::TokenisedDataVector;

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    /// Positions where the rows agree (mutual absence excluded).
    matches: usize,
    /// Positions where both rows are falsey.
    mutual_absence: usize,
}

fn tally(a: &TokenisedDataVector, b: &TokenisedDataVector, treat_as_binary: bool) -> Tally {
    let mut t = Tally::default();

    for (&x, &y) in a.iter().zip(b.iter()) {
        if x == 0 && y == 0 {
            t.mutual_absence += 1;
            continue;
        }

        let agree = if treat_as_binary {
            x != 0 && y != 0
        } else {
            x == y
        };

        if agree {
            t.matches += 1;
        }
    }

    t
}

/// Jaccard index: agreements over positions where at least one row is truthy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Jaccard {
    pub treat_as_binary: bool,
}

static JACCARD_INFO: AlgorithmInfo = AlgorithmInfo {
    name: "Jaccard",
    description: "The Jaccard Index is the size of the intersection of two sets divided by \
        the size of their union. Positions where both rows are empty are ignored.",
    attribute_name: "Jaccard Index",
    attribute_description: "The Jaccard Index between the data of the connected nodes.",
};

impl CorrelationAlgorithm for Jaccard {
    type Vector = TokenisedDataVector;

    fn info(&self) -> &'static AlgorithmInfo {
        &JACCARD_INFO
    }

    fn evaluate(&self, size: usize, a: &TokenisedDataVector, b: &TokenisedDataVector) -> f64 {
        let t = tally(a, b, self.treat_as_binary);
        // All-absent rows give 0/0, which the caller drops.
        t.matches as f64 / (size - t.mutual_absence) as f64
    }
}

/// Simple matching coefficient: agreements, counting mutual absence, over all positions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleMatchingCoefficient {
    pub treat_as_binary: bool,
}

static SMC_INFO: AlgorithmInfo = AlgorithmInfo {
    name: "SMC",
    description: "The Simple Matching Coefficient is the number of matching positions \
        divided by the total number of positions, including those where both rows are empty.",
    attribute_name: "SMC",
    attribute_description: "The Simple Matching Coefficient between the data of the connected nodes.",
};

impl CorrelationAlgorithm for SimpleMatchingCoefficient {
    type Vector = TokenisedDataVector;

    fn info(&self) -> &'static AlgorithmInfo {
        &SMC_INFO
    }

    fn evaluate(&self, size: usize, a: &TokenisedDataVector, b: &TokenisedDataVector) -> f64 {
        let t = tally(a, b, self.treat_as_binary);
        (t.matches + t.mutual_absence) as f64 / size as f64
    }
}
