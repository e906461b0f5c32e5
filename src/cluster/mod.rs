//! Clustering of dense embedding vectors.
//!
//! One algorithm lives here: [`Kmeans`], centroid-based hard partitioning
//! into a fixed number of groups.
//!
//! The vectors this crate feeds it are unit-normalized, so squared Euclidean
//! distance orders points the same way cosine similarity does, and minimizing
//! within-cluster sum of squares groups semantically similar texts.
//!
//! ```rust
//! use corral::cluster::Kmeans;
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//! ];
//!
//! let labels = Kmeans::new(2).with_seed(42).fit_predict(&data).unwrap();
//! assert_eq!(labels[0], labels[1]);  // First two together
//! assert_ne!(labels[0], labels[2]);  // Separate from last two
//! ```

mod kmeans;

pub use kmeans::{Kmeans, KmeansFit};
