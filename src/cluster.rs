//! Single-linkage hierarchical clustering (SLINK) for leaf ordering.
//!
//! Given a symmetric distance matrix over `N` items, [`single_linkage`]
//! builds the pointer representation `(Π, Λ)` incrementally, converts it to
//! `N - 1` merge links, then walks the merge tree depth first from the root
//! to produce a display ordering in which similar items sit together.
//!
//! Merge nodes are numbered `N..2N-1` in merge order, so the root is `2N - 2`.

use crate::correlation::EuclideanDistance;
use crate::error::{CorrelationError, Result};
use crate::evaluate::PairwiseEvaluator;
use crate::matrix::CovarianceMatrix;
use crate::monitor::Monitor;
use crate::vector::continuous_columns;

/// One merge: clusters `a` and `b` join at `distance`.
///
/// Ids below `N` are leaves; id `N + k` is the cluster formed by link `k`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub distance: f64,
}

/// Result of hierarchical clustering.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dendrogram {
    /// Leaf sequence: `order[slot]` is the item displayed at `slot`.
    pub order: Vec<usize>,
    /// Inverse of `order`: `positions[item]` is its display slot.
    pub positions: Vec<usize>,
    /// Merges in ascending distance.
    pub links: Vec<Link>,
}

impl Dendrogram {
    fn trivial(n: usize) -> Self {
        Self {
            order: (0..n).collect(),
            positions: (0..n).collect(),
            links: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Union-find over leaves and merge nodes. Joining makes the larger id the root.
struct Unions {
    parent: Vec<usize>,
}

impl Unions {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
        }
    }

    fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        // Path compression.
        let mut node = i;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }

        root
    }

    fn join(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if rb > ra {
            self.parent[ra] = rb;
        } else {
            self.parent[rb] = ra;
        }
    }
}

/// Cluster the items of a distance matrix and return their leaf ordering.
///
/// Returns `None` if the monitor requests cancellation; this is checked once
/// per incrementally added item.
pub fn single_linkage(distances: &CovarianceMatrix, monitor: &dyn Monitor) -> Option<Dendrogram> {
    let n = distances.size();
    if n <= 1 {
        return Some(Dendrogram::trivial(n));
    }

    let mut pi = vec![0usize; n];
    let mut lambda = vec![f64::INFINITY; n];
    let mut m = vec![0.0f64; n];

    let total = (n * (n - 1) / 2) as u64;
    let mut done = 0u64;
    monitor.set_progress(Some(0));

    for i in 1..n {
        pi[i] = i;
        lambda[i] = f64::INFINITY;

        for (j, mj) in m.iter_mut().enumerate().take(i) {
            *mj = distances.value_at(i, j);
        }

        for j in 0..i {
            let p = pi[j];
            if lambda[j] >= m[j] {
                m[p] = m[p].min(lambda[j]);
                lambda[j] = m[j];
                pi[j] = i;
            } else {
                m[p] = m[p].min(m[j]);
            }
        }

        for j in 0..i {
            if lambda[j] >= lambda[pi[j]] {
                pi[j] = i;
            }
        }

        done += i as u64;
        monitor.set_progress(Some((done * 100 / total) as u8));

        if monitor.is_cancelled() {
            tracing::warn!(items = n, reached = i, "clustering cancelled");
            return None;
        }
    }
    monitor.set_progress(None);

    let mut sorted: Vec<usize> = (0..n).collect();
    sorted.sort_by(|&x, &y| lambda[x].total_cmp(&lambda[y]));

    let mut unions = Unions::new(2 * n);
    let links: Vec<Link> = sorted
        .iter()
        .take(n - 1)
        .enumerate()
        .map(|(k, &index)| {
            let link = Link {
                a: unions.find(index),
                b: unions.find(pi[index]),
                distance: lambda[index],
            };
            unions.join(index, n + k);
            unions.join(pi[index], n + k);
            link
        })
        .collect();

    let order = leaf_order(&links, n);
    let mut positions = vec![0; n];
    for (slot, &item) in order.iter().enumerate() {
        positions[item] = slot;
    }

    tracing::debug!(items = n, "clustering complete");

    Some(Dendrogram {
        order,
        positions,
        links,
    })
}

/// Depth first walk from the root, left branch first, emitting leaves.
fn leaf_order(links: &[Link], n: usize) -> Vec<usize> {
    let mut order = Vec::with_capacity(n);
    let mut stack = vec![2 * n - 2];

    while let Some(node) = stack.pop() {
        if node < n {
            order.push(node);
            continue;
        }

        let link = &links[node - n];
        stack.push(link.b);
        stack.push(link.a);
    }

    order
}

/// Cluster the columns of row-major `data` by Euclidean distance.
///
/// Returns `Ok(None)` if cancelled during either the distance or the linkage
/// phase.
///
/// # Errors
///
/// [`CorrelationError::TableShape`] if `data` is not `num_rows × num_columns`.
pub fn hierarchical_ordering(
    data: &[f64],
    num_columns: usize,
    num_rows: usize,
    monitor: &dyn Monitor,
) -> Result<Option<Dendrogram>> {
    let expected = num_columns * num_rows;
    if data.len() != expected {
        return Err(CorrelationError::TableShape {
            expected,
            actual: data.len(),
            num_rows,
            num_columns,
        });
    }

    let columns = continuous_columns(data, num_columns, num_rows);
    let evaluator = PairwiseEvaluator::new(monitor);
    let Some(distances) = evaluator.matrix(&EuclideanDistance, &columns)? else {
        return Ok(None);
    };

    tracing::debug!(columns = num_columns, "clustering columns");
    Ok(single_linkage(&distances, monitor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::{CancelFlag, Silent};

    fn line(points: &[f64]) -> CovarianceMatrix {
        let mut m = CovarianceMatrix::new(points.len());
        for i in 0..points.len() {
            for j in i..points.len() {
                m.set_value_at(i, j, (points[i] - points[j]).abs());
            }
        }
        m
    }

    #[test]
    fn two_pairs_on_a_line() {
        let d = single_linkage(&line(&[0.0, 1.0, 5.0, 6.0]), &Silent).unwrap();
        assert_eq!(d.order, vec![0, 1, 2, 3]);

        let distances: Vec<f64> = d.links.iter().map(|l| l.distance).collect();
        assert_eq!(distances, vec![1.0, 1.0, 4.0]);

        // Root joins the two pair clusters.
        assert_eq!(d.links[2], Link { a: 4, b: 5, distance: 4.0 });
    }

    #[test]
    fn interleaved_items_are_grouped() {
        let d = single_linkage(&line(&[0.0, 10.0, 1.0, 11.0]), &Silent).unwrap();
        let first: Vec<usize> = d.order[..2].to_vec();
        assert!(first == vec![0, 2] || first == vec![2, 0] || first == vec![1, 3] || first == vec![3, 1]);
        for (item, &slot) in d.positions.iter().enumerate() {
            assert_eq!(d.order[slot], item);
        }
    }

    #[test]
    fn trivial_sizes() {
        assert_eq!(single_linkage(&CovarianceMatrix::new(0), &Silent).unwrap().order, Vec::<usize>::new());
        let one = single_linkage(&CovarianceMatrix::new(1), &Silent).unwrap();
        assert_eq!(one.order, vec![0]);
        assert!(one.links.is_empty());
    }

    #[test]
    fn cancellation_stops_linkage() {
        let flag = CancelFlag::new();
        flag.cancel();
        assert!(single_linkage(&line(&[0.0, 1.0, 2.0]), &flag).is_none());
    }

    #[test]
    fn orders_table_columns() {
        // Two rows, four columns: columns 0/2 and 1/3 are near each other.
        let data = [0.0, 10.0, 0.5, 10.5, 1.0, 11.0, 1.5, 11.5];
        let d = hierarchical_ordering(&data, 4, 2, &Silent).unwrap().unwrap();
        assert_eq!(d.len(), 4);
        assert_eq!((d.positions[0] as i64 - d.positions[2] as i64).abs(), 1);
        assert_eq!((d.positions[1] as i64 - d.positions[3] as i64).abs(), 1);
    }

    #[test]
    fn rejects_malformed_table() {
        assert!(matches!(
            hierarchical_ordering(&[1.0, 2.0, 3.0], 2, 2, &Silent),
            Err(CorrelationError::TableShape { .. })
        ));
    }
}
