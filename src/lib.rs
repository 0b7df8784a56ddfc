//! corrgraph: correlation graphs over tabular rows.
//!
//! Turns a rectangular block of rows into weighted edges by evaluating a
//! pairwise correlation between every pair of rows and keeping only the
//! strong relationships.
//!
//! - `vector/`: row vectors with cached statistics, tokenised categorical rows
//! - `correlation/`: Pearson, Spearman, Euclidean, cosine, bicor, Jaccard, SMC
//! - `filter/`: threshold and bounded k-NN retention
//! - `evaluate`: rayon fan-out over the upper triangle, cost-weighted progress
//! - `cluster`: SLINK single linkage for column display order
//! - `preprocess/`: imputation, clipping, scaling, normalisation
//!
//! # Quick start
//!
//! ```
//! use corrgraph::{edge_list, CorrelationParameters, NodeId, Rows, Silent};
//! use corrgraph::vector::continuous_rows;
//!
//! let data = [1.0, 2.0, 3.0, 4.0, 2.0, 4.0, 6.0, 8.0, 4.0, 3.0, 2.0, 1.0];
//! let rows = continuous_rows(&data, 4);
//!
//! let params = CorrelationParameters::default().with_threshold(0.9);
//! let edges = edge_list(Rows::Continuous(&rows), &params, &Silent).unwrap();
//!
//! assert_eq!(edges.len(), 1);
//! assert_eq!((edges[0].source, edges[0].target), (NodeId(0), NodeId(1)));
//! ```
//!
//! # Numeric failures
//!
//! Pairs whose correlation is NaN or infinite (constant rows under Pearson,
//! rows with nothing in common under Jaccard) are dropped silently. Only
//! malformed input is an error.
//!
//! # Threshold versus k-NN
//!
//! A global threshold keeps every pair above it, so dense regions of the
//! data dominate the graph. k-NN bounds every node to its `k` strongest
//! edges; each endpoint decides independently, so a node can end up with
//! more than `k` edges when other nodes select it.

pub mod cluster;
pub mod config;
pub mod correlation;
pub mod edge;
pub mod error;
pub mod estimate;
pub mod evaluate;
pub mod filter;
pub mod matrix;
pub mod monitor;
pub mod preprocess;
pub mod vector;

pub use cluster::{hierarchical_ordering, single_linkage, Dendrogram, Link};
pub use config::{AlgorithmKind, CorrelationParameters, CorrelationPolarity, DataType, FilterType};
pub use correlation::{AlgorithmInfo, CorrelationAlgorithm};
pub use edge::{Edge, EdgeList};
pub use error::{CorrelationError, Result};
pub use estimate::{graph_size_estimate, GraphSizeEstimate};
pub use evaluate::{covariance_matrix, edge_list, PairwiseEvaluator, Rows};
pub use filter::{FilterStrategy, KnnFilter, ProtoGraph, ThresholdFilter};
pub use matrix::CovarianceMatrix;
pub use monitor::{CancelFlag, Monitor, Silent};
pub use preprocess::{PreprocessConfig, Preprocessor, RawTable};
pub use vector::{ContinuousDataVector, DataVector, NodeId, TokenisedDataVector};
