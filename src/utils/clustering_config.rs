// src/utils/clustering_config.rs

use log::{debug, info, warn};
use std::env;
use std::str::FromStr;

use crate::clustering::projection::ProjectionConfig;
use crate::encoding::DEFAULT_MIN_KNOWN_FIELDS;

pub const DEFAULT_MIN_K: usize = 5;
pub const DEFAULT_MAX_K: usize = 8;
pub const DEFAULT_MAX_ITERATIONS: usize = 100;
pub const DEFAULT_SAMPLE_POST_COUNT: usize = 10;
/// Clusterable posts required per cluster of `min_k` before k-means is attempted.
pub const MIN_POSTS_PER_CLUSTER: usize = 10;

/// Per-call configuration for a clustering run.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusteringOptions {
    /// Fixed cluster count. `None` (or `Some(0)`) picks k from the data size.
    pub k: Option<usize>,
    pub min_k: usize,
    pub max_k: usize,
    pub min_known_fields: usize,
    pub max_iterations: usize,
    pub sample_post_count: usize,
    /// Seed for k-means++ and projection jitter. `None` draws from entropy.
    pub seed: Option<u64>,
    pub projection: ProjectionConfig,
}

impl Default for ClusteringOptions {
    fn default() -> Self {
        Self {
            k: None,
            min_k: DEFAULT_MIN_K,
            max_k: DEFAULT_MAX_K,
            min_known_fields: DEFAULT_MIN_KNOWN_FIELDS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            sample_post_count: DEFAULT_SAMPLE_POST_COUNT,
            seed: None,
            projection: ProjectionConfig::default(),
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

/// Finite, non-negative float from the environment; anything else keeps `default`.
fn env_non_negative(key: &str, default: f64) -> f64 {
    match env_opt::<f64>(key) {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        Some(_) => {
            warn!("Ignoring {}: expected a finite non-negative number", key);
            default
        }
        None => default,
    }
}

fn env_opt<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

impl ClusteringOptions {
    /// Create options from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let mut projection = defaults.projection.clone();
        projection.amplification =
            env_non_negative("PERSONA_PROJECTION_AMPLIFICATION", projection.amplification);
        projection.jitter = env_non_negative("PERSONA_PROJECTION_JITTER", projection.jitter);

        let options = Self {
            k: env_opt::<usize>("PERSONA_K").filter(|k| *k > 0),
            min_k: env_or("PERSONA_MIN_K", defaults.min_k),
            max_k: env_or("PERSONA_MAX_K", defaults.max_k),
            min_known_fields: env_or("PERSONA_MIN_KNOWN_FIELDS", defaults.min_known_fields),
            max_iterations: env_or("PERSONA_MAX_ITERATIONS", defaults.max_iterations),
            sample_post_count: env_or("PERSONA_SAMPLE_POSTS", defaults.sample_post_count),
            seed: env_opt("PERSONA_SEED"),
            projection,
        };
        debug!("Clustering options from env: {:?}", options);
        options
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = Some(k).filter(|k| *k > 0);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Smallest clusterable batch accepted by `run_clustering`.
    pub fn min_clusterable_posts(&self) -> usize {
        self.min_k * MIN_POSTS_PER_CLUSTER
    }

    /// Log the current configuration
    pub fn log_config(&self) {
        match self.k {
            Some(k) => info!("🧩 Cluster count fixed at k={}", k),
            None => info!(
                "🧩 Cluster count auto-selected in [{}, {}] (posts / 100)",
                self.min_k, self.max_k
            ),
        }
        info!(
            "   Min known fields: {}, max iterations: {}, sample posts: {}",
            self.min_known_fields, self.max_iterations, self.sample_post_count
        );
        info!(
            "   Projection amplification: {}, jitter: ±{}, seed: {}",
            self.projection.amplification,
            self.projection.jitter,
            self.seed
                .map(|s| s.to_string())
                .unwrap_or_else(|| "random".to_string())
        );
    }
}
