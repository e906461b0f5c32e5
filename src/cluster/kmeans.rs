//! K-means: hard partitioning into exactly `k` clusters.
//!
//! k-means++ seeding followed by Lloyd iterations: assign each point to its
//! nearest centroid, recompute centroids as member means, repeat until the
//! assignments stop changing or the iteration cap is hit.
//!
//! **Objective**: minimize within-cluster sum of squares (inertia):
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! All randomness flows from one seeded [`StdRng`], so identical input and
//! identical configuration reproduce identical labels, bit for bit.

use rand::prelude::*;

use crate::error::{Error, Result};

/// A later trial must beat the incumbent inertia by more than this to
/// replace it; equal-quality trials keep the first-seen result.
const INERTIA_TIE_TOLERANCE: f32 = 1e-6;

/// K-means clustering with seeded initialization.
#[derive(Debug, Clone)]
pub struct Kmeans {
    /// Target number of clusters.
    k: usize,
    /// RNG seed for centroid initialization.
    seed: u64,
    /// Number of independent initialization trials.
    n_init: usize,
    /// Iteration cap per trial.
    max_iter: usize,
}

/// A fitted k-means model.
#[derive(Debug, Clone)]
pub struct KmeansFit {
    /// One label per input point, each in `[0, k)`.
    pub labels: Vec<usize>,
    /// Final centroid per cluster.
    pub centroids: Vec<Vec<f32>>,
    /// Within-cluster sum of squared distances.
    pub inertia: f32,
    /// Iterations the winning trial ran.
    pub iterations: usize,
    /// Whether the winning trial's assignments stabilized before the cap.
    pub converged: bool,
}

impl Kmeans {
    /// Create a new k-means clusterer targeting `k` clusters.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            seed: 0,
            n_init: 10,
            max_iter: 300,
        }
    }

    /// Set the RNG seed for centroid initialization.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the number of independent initialization trials.
    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init;
        self
    }

    /// Set the iteration cap per trial.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Fit and return one cluster label per input point.
    pub fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        self.fit(data).map(|fit| fit.labels)
    }

    /// Fit the model, running `n_init` trials and keeping the one with the
    /// lowest inertia. Trials run in a fixed seeded order; ties keep the
    /// earlier trial.
    ///
    /// Duplicate points collapse onto one centroid (nearest-centroid ties go
    /// to the lowest cluster index), so with `k` near the number of points
    /// some clusters can end up empty. An empty cluster's centroid is
    /// reseeded to the point farthest from it, which keeps every label in
    /// `[0, k)` without affecting termination.
    pub fn fit(&self, data: &[Vec<f32>]) -> Result<KmeansFit> {
        let n = data.len();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if self.k < 1 || self.k > n {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_items: n,
            });
        }
        if self.n_init == 0 {
            return Err(Error::InvalidParameter {
                name: "n_init",
                message: "must be at least 1",
            });
        }
        if self.max_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                message: "must be at least 1",
            });
        }

        let dim = data[0].len();
        for point in data {
            if point.len() != dim {
                return Err(Error::DimensionMismatch {
                    expected: dim,
                    found: point.len(),
                });
            }
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut best: Option<KmeansFit> = None;

        for trial in 0..self.n_init {
            let fit = self.run_trial(data, &mut rng);
            tracing::debug!(
                trial,
                inertia = fit.inertia,
                iterations = fit.iterations,
                converged = fit.converged,
                "k-means trial finished"
            );
            let improves = match &best {
                None => true,
                Some(incumbent) => fit.inertia < incumbent.inertia - INERTIA_TIE_TOLERANCE,
            };
            if improves {
                best = Some(fit);
            }
        }

        Ok(best.expect("at least one trial ran"))
    }

    /// One seeded trial: k-means++ init, then Lloyd iterations until the
    /// assignments stabilize or `max_iter` is reached.
    fn run_trial(&self, data: &[Vec<f32>], rng: &mut StdRng) -> KmeansFit {
        let n = data.len();
        let mut centroids = kmeans_plus_plus_init(data, self.k, rng);

        let mut labels: Vec<usize> = Vec::new();
        let mut iterations = 0;
        let mut converged = false;

        for iter in 0..self.max_iter {
            iterations = iter + 1;

            let new_labels = assign_nearest(data, &centroids);
            if iter > 0 && new_labels == labels {
                converged = true;
                break;
            }
            labels = new_labels;

            update_centroids(data, &labels, &mut centroids);
            reseed_empty_clusters(data, &labels, &mut centroids);
        }

        let inertia = (0..n)
            .map(|i| squared_euclidean(&data[i], &centroids[labels[i]]))
            .sum();

        KmeansFit {
            labels,
            centroids,
            inertia,
            iterations,
            converged,
        }
    }
}

/// k-means++ seeding: first centroid uniform at random, each further
/// centroid drawn with probability proportional to its squared distance
/// from the nearest already-chosen centroid.
fn kmeans_plus_plus_init(data: &[Vec<f32>], k: usize, rng: &mut StdRng) -> Vec<Vec<f32>> {
    let n = data.len();
    let mut centroids: Vec<Vec<f32>> = Vec::with_capacity(k);

    let first = rng.random_range(0..n);
    centroids.push(data[first].clone());

    // Squared distance from each point to its nearest chosen centroid.
    let mut min_d2 = vec![f32::MAX; n];

    for _ in 1..k {
        let last = centroids.last().expect("at least one centroid");
        for (i, point) in data.iter().enumerate() {
            let d2 = squared_euclidean(point, last);
            if d2 < min_d2[i] {
                min_d2[i] = d2;
            }
        }

        let total: f32 = min_d2.iter().sum();
        let next = if total > 0.0 {
            // Weighted draw over the D² distribution.
            let mut target = rng.random::<f32>() * total;
            let mut chosen = n - 1;
            for (i, &d2) in min_d2.iter().enumerate() {
                if d2 >= target {
                    chosen = i;
                    break;
                }
                target -= d2;
            }
            chosen
        } else {
            // Every point already coincides with a centroid; any pick keeps
            // the trial deterministic.
            rng.random_range(0..n)
        };
        centroids.push(data[next].clone());
    }

    centroids
}

/// Assign each point to its nearest centroid by squared Euclidean distance.
/// Ties go to the lowest centroid index.
fn assign_nearest(data: &[Vec<f32>], centroids: &[Vec<f32>]) -> Vec<usize> {
    data.iter()
        .map(|point| {
            let mut best = 0;
            let mut best_d2 = f32::MAX;
            for (j, centroid) in centroids.iter().enumerate() {
                let d2 = squared_euclidean(point, centroid);
                if d2 < best_d2 {
                    best_d2 = d2;
                    best = j;
                }
            }
            best
        })
        .collect()
}

/// Recompute each centroid as the mean of its members. Clusters with no
/// members keep their previous centroid (handled by the reseed pass).
fn update_centroids(data: &[Vec<f32>], labels: &[usize], centroids: &mut [Vec<f32>]) {
    let dim = data[0].len();
    let k = centroids.len();
    let mut sums = vec![vec![0.0f32; dim]; k];
    let mut counts = vec![0usize; k];

    for (point, &cluster) in data.iter().zip(labels) {
        counts[cluster] += 1;
        for (acc, &x) in sums[cluster].iter_mut().zip(point) {
            *acc += x;
        }
    }

    for ((centroid, sum), &count) in centroids.iter_mut().zip(sums).zip(&counts) {
        if count > 0 {
            for (c, s) in centroid.iter_mut().zip(sum) {
                *c = s / count as f32;
            }
        }
    }
}

/// Move each empty cluster's centroid to the point farthest from it.
/// Distance ties resolve to the lowest point index.
fn reseed_empty_clusters(data: &[Vec<f32>], labels: &[usize], centroids: &mut [Vec<f32>]) {
    let k = centroids.len();
    let mut counts = vec![0usize; k];
    for &cluster in labels {
        counts[cluster] += 1;
    }

    for (cluster, &count) in counts.iter().enumerate() {
        if count > 0 {
            continue;
        }
        let mut farthest = 0;
        let mut farthest_d2 = -1.0f32;
        for (i, point) in data.iter().enumerate() {
            let d2 = squared_euclidean(point, &centroids[cluster]);
            if d2 > farthest_d2 {
                farthest_d2 = d2;
                farthest = i;
            }
        }
        tracing::debug!(cluster, point = farthest, "reseeding empty cluster");
        centroids[cluster] = data[farthest].clone();
    }
}

#[inline]
fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
