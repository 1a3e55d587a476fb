// src/quality/quality_metrics.rs
//! Trust signals for a clustering run.
//!
//! None of these functions fail. Degenerate input (no posts, fewer than two
//! clusters) yields neutral values instead of NaN.

use log::debug;
use std::collections::BTreeMap;

use crate::clustering::kmeans::euclidean_distance;
use crate::encoding::normalize_attributes;
use crate::models::{
    AttributeField, Cluster, ClusteringResult, ConfidenceLevel, QualityReport, RawRecord,
    UnknownRates,
};

/// Mean centroid distance treated as full separation in the one-hot space.
pub const MAX_EXPECTED_CENTROID_DISTANCE: f64 = 5.0;
pub const CLUSTERING_METHOD: &str = "kmeans";

/// Component weights of the overall confidence score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceWeights {
    pub silhouette: f64,
    pub completeness: f64,
    pub separation: f64,
    pub coverage: f64,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            silhouette: 0.25,
            completeness: 0.35,
            separation: 0.20,
            coverage: 0.20,
        }
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Centroid-based silhouette approximation in [-1, 1].
///
/// Intra-cluster spread is taken as `1/sqrt(size)` rather than measured, and
/// the inter-cluster term is the distance to the nearest other centroid.
/// Clusters of one member are skipped; the result is a size-weighted mean.
pub fn calculate_separation_proxy(clusters: &[Cluster]) -> f64 {
    if clusters.len() < 2 {
        return 0.0;
    }

    let mut weighted_sum = 0.0;
    let mut weight = 0usize;

    for (i, cluster) in clusters.iter().enumerate() {
        if cluster.size < 2 {
            continue;
        }

        let nearest = clusters
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, other)| euclidean_distance(&cluster.centroid, &other.centroid))
            .fold(f64::INFINITY, f64::min);

        let a = 1.0 / (cluster.size as f64).sqrt();
        let b = nearest;
        let denominator = a.max(b);
        if denominator > 0.0 && denominator.is_finite() {
            weighted_sum += (b - a) / denominator * cluster.size as f64;
            weight += cluster.size;
        }
    }

    if weight == 0 {
        return 0.0;
    }
    finite_or_zero(weighted_sum / weight as f64).clamp(-1.0, 1.0)
}

/// Share of the full batch (excluded posts included) with an unknown value, per attribute.
pub fn calculate_unknown_rates(posts: &[RawRecord]) -> UnknownRates {
    let mut counts: BTreeMap<AttributeField, usize> =
        AttributeField::ALL.iter().map(|f| (*f, 0)).collect();

    for post in posts {
        let attributes = normalize_attributes(post);
        for field in AttributeField::ALL {
            if attributes.is_unknown(field) {
                *counts.entry(field).or_insert(0) += 1;
            }
        }
    }

    let total = posts.len();
    let to_percent = |n: usize| {
        if total > 0 {
            ((n as f64 / total as f64) * 100.0).round()
        } else {
            0.0
        }
    };

    let by_attribute: BTreeMap<AttributeField, f64> = counts
        .into_iter()
        .map(|(field, count)| (field, to_percent(count)))
        .collect();
    let average = (by_attribute.values().sum::<f64>() / AttributeField::ALL.len() as f64).round();

    UnknownRates {
        by_attribute,
        average,
    }
}

pub fn calculate_data_completeness(unknown_rates: &UnknownRates) -> f64 {
    (100.0 - finite_or_zero(unknown_rates.average)).clamp(0.0, 100.0)
}

/// Mean pairwise centroid distance scaled to 0-100 against `MAX_EXPECTED_CENTROID_DISTANCE`.
pub fn calculate_cluster_separation(clusters: &[Cluster]) -> f64 {
    if clusters.len() < 2 {
        return 0.0;
    }

    let mut total_distance = 0.0;
    let mut pairs = 0usize;
    for i in 0..clusters.len() {
        for j in (i + 1)..clusters.len() {
            total_distance += euclidean_distance(&clusters[i].centroid, &clusters[j].centroid);
            pairs += 1;
        }
    }

    let avg_distance = finite_or_zero(total_distance / pairs as f64);
    ((avg_distance / MAX_EXPECTED_CENTROID_DISTANCE) * 100.0)
        .round()
        .clamp(0.0, 100.0)
}

/// Weighted composite of cluster quality, data quality, distinctness and coverage, 0-100.
pub fn calculate_overall_confidence(
    silhouette_score: f64,
    data_completeness: f64,
    cluster_separation: f64,
    posts_clustered_ratio: f64,
    weights: &ConfidenceWeights,
) -> f64 {
    // Silhouette mapped from [-1, 1] to [0, 100]
    let normalized_silhouette = ((finite_or_zero(silhouette_score) + 1.0) / 2.0) * 100.0;

    let score = (normalized_silhouette * weights.silhouette) +               // Cluster quality
        (finite_or_zero(data_completeness) * weights.completeness) +          // Data quality
        (finite_or_zero(cluster_separation) * weights.separation) +           // Cluster distinctness
        (finite_or_zero(posts_clustered_ratio) * 100.0 * weights.coverage);   // Usable share of posts

    finite_or_zero(score).round().clamp(0.0, 100.0)
}

/// Short reading of a silhouette score for reports.
pub fn interpret_separation(silhouette_score: f64) -> &'static str {
    if silhouette_score >= 0.7 {
        "clearly separated"
    } else if silhouette_score >= 0.5 {
        "moderately separated"
    } else if silhouette_score >= 0.25 {
        "overlapping"
    } else {
        "unclear separation"
    }
}

/// Assemble the quality report for `result`, computed from the full pre-filter batch `posts`.
pub fn calculate_quality_metrics(
    posts: &[RawRecord],
    result: &ClusteringResult,
    weights: &ConfidenceWeights,
) -> QualityReport {
    let unknown_rates = calculate_unknown_rates(posts);
    let data_completeness = calculate_data_completeness(&unknown_rates);
    let silhouette_score = calculate_separation_proxy(&result.clusters);
    let cluster_separation = calculate_cluster_separation(&result.clusters);

    let posts_clustered_ratio = if posts.is_empty() {
        0.0
    } else {
        result.posts_clustered as f64 / posts.len() as f64
    };

    let overall_confidence = calculate_overall_confidence(
        silhouette_score,
        data_completeness,
        cluster_separation,
        posts_clustered_ratio,
        weights,
    );
    let confidence_level = ConfidenceLevel::from_score(overall_confidence);

    debug!(
        "Quality: silhouette={:.3}, completeness={}, separation={}, coverage={:.2}, confidence={}",
        silhouette_score, data_completeness, cluster_separation, posts_clustered_ratio, overall_confidence
    );

    QualityReport {
        silhouette_score: round2(silhouette_score),
        unknown_rates,
        data_completeness,
        cluster_separation,
        overall_confidence,
        confidence_level,
        confidence_label: confidence_level.label().to_string(),
        confidence_message: confidence_level.message().to_string(),
        posts_analyzed: posts.len(),
        posts_clustered: result.posts_clustered,
        posts_excluded: result.posts_excluded,
        clustering_method: CLUSTERING_METHOD.to_string(),
        cluster_sizes: result.cluster_sizes(),
    }
}
