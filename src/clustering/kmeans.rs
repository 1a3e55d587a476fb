// src/clustering/kmeans.rs
//! Lloyd's k-means with k-means++ seeding over dense `f64` vectors.
//!
//! The routine holds no global state and draws all randomness from the
//! caller's `Rng`, so runs are reproducible with a seeded generator and safe
//! to call from several threads at once.

use log::debug;
use rand::Rng;

#[derive(Debug, Clone)]
pub struct KMeansConfig {
    pub k: usize,
    pub max_iterations: usize,
}

impl KMeansConfig {
    pub fn new(k: usize, max_iterations: usize) -> Self {
        Self { k, max_iterations }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KMeansOutput {
    /// Cluster index for each input point.
    pub assignments: Vec<usize>,
    pub centroids: Vec<Vec<f64>>,
    pub iterations: usize,
    /// True when an iteration finished without any point changing cluster.
    pub converged: bool,
}

pub fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    squared_distance(a, b).sqrt()
}

/// Pick initial centres: the first uniformly, each next one with probability
/// proportional to its squared distance from the nearest centre chosen so far.
pub fn kmeans_plus_plus<R: Rng + ?Sized>(data: &[Vec<f64>], k: usize, rng: &mut R) -> Vec<Vec<f64>> {
    if data.is_empty() || k == 0 {
        return Vec::new();
    }

    let mut centroids = Vec::with_capacity(k);
    centroids.push(data[rng.gen_range(0..data.len())].clone());

    let mut nearest: Vec<f64> = data
        .iter()
        .map(|point| squared_distance(point, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f64 = nearest.iter().sum();
        let next_idx = if total > 0.0 {
            let target = rng.gen::<f64>() * total;
            let mut cumulative = 0.0;
            let mut chosen = data.len() - 1;
            for (idx, weight) in nearest.iter().enumerate() {
                cumulative += weight;
                if cumulative > target {
                    chosen = idx;
                    break;
                }
            }
            chosen
        } else {
            // Every point already coincides with a centre.
            rng.gen_range(0..data.len())
        };

        let centre = data[next_idx].clone();
        for (dist, point) in nearest.iter_mut().zip(data.iter()) {
            let d = squared_distance(point, &centre);
            if d < *dist {
                *dist = d;
            }
        }
        centroids.push(centre);
    }

    centroids
}

fn nearest_centroid(point: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (idx, centroid) in centroids.iter().enumerate() {
        let dist = squared_distance(point, centroid);
        if dist < best_dist {
            best_dist = dist;
            best = idx;
        }
    }
    best
}

/// Run k-means on `data`. `k` is capped at the number of points.
///
/// A centroid whose cluster empties keeps its previous position; the empty
/// group is left for the caller to discard.
pub fn kmeans<R: Rng + ?Sized>(data: &[Vec<f64>], config: &KMeansConfig, rng: &mut R) -> KMeansOutput {
    if data.is_empty() || config.k == 0 {
        return KMeansOutput::default();
    }

    let k = config.k.min(data.len());
    let dim = data[0].len();
    let max_iterations = config.max_iterations.max(1);

    let mut centroids = kmeans_plus_plus(data, k, rng);
    let mut assignments = vec![usize::MAX; data.len()];
    let mut iterations = 0;
    let mut converged = false;

    for iteration in 1..=max_iterations {
        iterations = iteration;

        let mut changed = false;
        for (point, assignment) in data.iter().zip(assignments.iter_mut()) {
            let best = nearest_centroid(point, &centroids);
            if best != *assignment {
                *assignment = best;
                changed = true;
            }
        }

        if !changed {
            converged = true;
            break;
        }

        let mut sums = vec![vec![0.0; dim]; k];
        let mut counts = vec![0usize; k];
        for (point, &cluster) in data.iter().zip(assignments.iter()) {
            for (sum, value) in sums[cluster].iter_mut().zip(point.iter()) {
                *sum += value;
            }
            counts[cluster] += 1;
        }

        for ((centroid, sum), &count) in centroids.iter_mut().zip(sums).zip(counts.iter()) {
            if count > 0 {
                *centroid = sum.into_iter().map(|s| s / count as f64).collect();
            }
        }
    }

    debug!(
        "k-means finished: k={}, points={}, iterations={}, converged={}",
        k,
        data.len(),
        iterations,
        converged
    );

    KMeansOutput {
        assignments,
        centroids,
        iterations,
        converged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn two_blobs() -> Vec<Vec<f64>> {
        let mut data = Vec::new();
        for i in 0..10 {
            let jitter = i as f64 * 0.01;
            data.push(vec![0.0 + jitter, 0.0]);
            data.push(vec![10.0 + jitter, 10.0]);
        }
        data
    }

    #[test]
    fn test_distances() {
        assert_eq!(squared_distance(&[0.0, 0.0], &[3.0, 4.0]), 25.0);
        assert_eq!(euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
    }

    #[test]
    fn test_separates_two_blobs() {
        let data = two_blobs();
        let mut rng = StdRng::seed_from_u64(7);
        let output = kmeans(&data, &KMeansConfig::new(2, 100), &mut rng);

        assert!(output.converged);
        assert_eq!(output.centroids.len(), 2);
        let first = output.assignments[0];
        for (idx, &assignment) in output.assignments.iter().enumerate() {
            if idx % 2 == 0 {
                assert_eq!(assignment, first);
            } else {
                assert_ne!(assignment, first);
            }
        }
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let data = two_blobs();
        let a = kmeans(&data, &KMeansConfig::new(3, 50), &mut StdRng::seed_from_u64(42));
        let b = kmeans(&data, &KMeansConfig::new(3, 50), &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_identical_points_collapse_into_one_group() {
        let data = vec![vec![1.0, 0.0, 1.0]; 30];
        let output = kmeans(&data, &KMeansConfig::new(4, 100), &mut StdRng::seed_from_u64(1));
        assert!(output.converged);
        assert!(output.assignments.iter().all(|&a| a == 0));
        assert_eq!(output.centroids.len(), 4);
    }

    #[test]
    fn test_k_capped_at_point_count() {
        let data = vec![vec![0.0], vec![5.0]];
        let output = kmeans(&data, &KMeansConfig::new(10, 10), &mut StdRng::seed_from_u64(3));
        assert_eq!(output.centroids.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        let output = kmeans(&[], &KMeansConfig::new(3, 10), &mut StdRng::seed_from_u64(3));
        assert!(output.assignments.is_empty());
        assert_eq!(output.iterations, 0);
        assert!(!output.converged);
    }

    #[test]
    fn test_max_iterations_respected() {
        let data = two_blobs();
        let output = kmeans(&data, &KMeansConfig::new(2, 1), &mut StdRng::seed_from_u64(9));
        assert_eq!(output.iterations, 1);
        assert!(!output.converged);
        assert!(output.assignments.iter().all(|&a| a < 2));
    }
}
