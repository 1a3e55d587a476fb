// src/clustering/persona_clustering.rs - k-means over encoded posts and per-cluster statistics

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

use crate::clustering::kmeans::{kmeans, KMeansConfig};
use crate::clustering::projection::centroid_to_position;
use crate::encoding::encode_posts;
use crate::error::{ClusteringError, Result};
use crate::models::{
    AttributeDistribution, AttributeField, Cluster, ClusterRun, ClusteringResult,
    DominantAttribute, EncodedRecord, EncodingOutcome, RawRecord, SamplePost, UNKNOWN_VALUE,
};
use crate::utils::clustering_config::ClusteringOptions;

/// Added to the run seed to seed the projection jitter stream.
const JITTER_SEED_OFFSET: u64 = 0x9E37_79B9_7F4A_7C15;

/// Cluster count scaled to data volume: one cluster per 100 posts, clamped to `[min_k, max_k]`.
pub fn determine_k(data_size: usize, min_k: usize, max_k: usize) -> usize {
    (data_size / 100).max(min_k).min(max_k)
}

/// Resolve the cluster count for `clusterable` posts: a fixed `k` wins over the heuristic.
///
/// Never returns 0, even when `max_k` is configured as 0.
pub fn resolve_k(clusterable: usize, options: &ClusteringOptions) -> usize {
    let k = match options.k {
        Some(k) if k > 0 => k,
        _ => determine_k(clusterable, options.min_k, options.max_k),
    };
    k.max(1)
}

fn build_rngs(seed: Option<u64>) -> (StdRng, StdRng) {
    match seed {
        Some(seed) => (
            StdRng::seed_from_u64(seed),
            StdRng::seed_from_u64(seed.wrapping_add(JITTER_SEED_OFFSET)),
        ),
        None => (StdRng::from_entropy(), StdRng::from_entropy()),
    }
}

/// Value counts per attribute across the given members.
pub fn calculate_attribute_distribution(members: &[&EncodedRecord]) -> AttributeDistribution {
    let mut distribution: AttributeDistribution = AttributeField::ALL
        .iter()
        .map(|field| (*field, BTreeMap::new()))
        .collect();

    for member in members {
        for field in AttributeField::ALL {
            let value = member.metadata.attributes.value_of(field);
            if let Some(counts) = distribution.get_mut(&field) {
                *counts.entry(value.to_string()).or_insert(0) += 1;
            }
        }
    }

    distribution
}

/// Majority value per attribute and its share of `cluster_size`.
///
/// Candidates are scanned in vocabulary order, so ties go to the earlier category.
pub fn get_dominant_attributes(
    distribution: &AttributeDistribution,
    cluster_size: usize,
) -> BTreeMap<AttributeField, DominantAttribute> {
    AttributeField::ALL
        .iter()
        .map(|&field| {
            let counts = distribution.get(&field);
            let mut max_value = UNKNOWN_VALUE;
            let mut max_count = 0usize;
            for category in field.categories() {
                let count = counts
                    .and_then(|c| c.get(category))
                    .copied()
                    .unwrap_or(0);
                if count > max_count {
                    max_count = count;
                    max_value = category;
                }
            }

            let percentage = if cluster_size > 0 {
                ((max_count as f64 / cluster_size as f64) * 100.0).round() as u32
            } else {
                0
            };

            (
                field,
                DominantAttribute {
                    value: max_value.to_string(),
                    label: field.display_label(max_value).to_string(),
                    percentage: percentage.min(100),
                },
            )
        })
        .collect()
}

/// Representative posts: most complete first, then most engaged. Full ties keep input order.
pub fn select_sample_posts(members: &[&EncodedRecord], count: usize) -> Vec<SamplePost> {
    let mut sorted: Vec<&EncodedRecord> = members.to_vec();
    sorted.sort_by(|a, b| {
        a.metadata
            .unknown_count
            .cmp(&b.metadata.unknown_count)
            .then_with(|| b.metadata.engagement.cmp(&a.metadata.engagement))
    });

    sorted
        .into_iter()
        .take(count)
        .map(|post| SamplePost {
            id: post.record_id.clone(),
            content: post.metadata.content.clone(),
            engagement: post.metadata.engagement,
        })
        .collect()
}

fn build_cluster<R: Rng + ?Sized>(
    centroid: Vec<f64>,
    members: &[&EncodedRecord],
    clustered_total: usize,
    options: &ClusteringOptions,
    jitter_rng: &mut R,
) -> Cluster {
    let size = members.len();
    let distribution = calculate_attribute_distribution(members);
    let dominant_attributes = get_dominant_attributes(&distribution, size);

    let total_engagement: u64 = members.iter().map(|m| m.metadata.engagement).sum();
    let avg_engagement = (total_engagement as f64 / size as f64).round() as u64;

    // Position comes from the centroid; the attribute labels above come from member votes.
    let position = centroid_to_position(&centroid, &options.projection, jitter_rng);

    Cluster {
        id: 0,
        centroid,
        post_ids: members.iter().map(|m| m.record_id.clone()).collect(),
        size,
        share_percentage: ((size as f64 / clustered_total as f64) * 100.0).round() as u32,
        position,
        dominant_attributes,
        attribute_distribution: distribution,
        sample_posts: select_sample_posts(members, options.sample_post_count),
        avg_engagement,
        total_engagement,
    }
}

/// Run k-means over already-encoded posts and derive per-cluster statistics.
///
/// Fails with `InsufficientData` before any clustering when fewer than
/// `min_k * 10` posts are supplied. Empty groups are dropped, so fewer than
/// `k` clusters may come back. Clusters are ordered largest first with ids
/// reassigned from 0.
pub fn run_clustering(
    encoded: &[EncodedRecord],
    k: usize,
    options: &ClusteringOptions,
) -> Result<ClusterRun> {
    let required = options.min_clusterable_posts().max(1);
    if encoded.len() < required {
        warn!(
            "Insufficient clusterable posts: {} (need at least {})",
            encoded.len(),
            required
        );
        return Err(ClusteringError::InsufficientData {
            clusterable: encoded.len(),
            required,
        });
    }

    // Every clusterable post must land in a cluster.
    let k = k.max(1);
    let (mut kmeans_rng, mut jitter_rng) = build_rngs(options.seed);
    let data: Vec<Vec<f64>> = encoded.iter().map(|e| e.vector.clone()).collect();
    let output = kmeans(
        &data,
        &KMeansConfig::new(k, options.max_iterations),
        &mut kmeans_rng,
    );

    let mut groups: Vec<Vec<&EncodedRecord>> = vec![Vec::new(); output.centroids.len()];
    for (record, &cluster) in encoded.iter().zip(output.assignments.iter()) {
        groups[cluster].push(record);
    }

    let mut clusters = Vec::with_capacity(groups.len());
    for (idx, (centroid, members)) in output.centroids.into_iter().zip(groups).enumerate() {
        if members.is_empty() {
            debug!("Dropping empty cluster {} (k={})", idx, k);
            continue;
        }
        clusters.push(build_cluster(
            centroid,
            &members,
            encoded.len(),
            options,
            &mut jitter_rng,
        ));
    }

    if clusters.len() < k {
        info!(
            "k-means produced {} non-empty clusters out of {} requested",
            clusters.len(),
            k
        );
    }

    // Stable sort: equal-sized clusters keep their k-means order.
    clusters.sort_by(|a, b| b.size.cmp(&a.size));
    for (idx, cluster) in clusters.iter_mut().enumerate() {
        cluster.id = idx;
    }

    Ok(ClusterRun {
        clusters,
        requested_k: k,
        iterations: output.iterations,
        converged: output.converged,
    })
}

/// Encode a raw batch, resolve k and cluster the clusterable posts.
pub fn cluster_posts(posts: &[RawRecord], options: &ClusteringOptions) -> Result<ClusteringResult> {
    let outcome = encode_posts(posts, options.min_known_fields, true);
    let k = resolve_k(outcome.stats.clusterable, options);
    debug!(
        "Resolved k={} for {} clusterable posts (fixed k: {:?})",
        k, outcome.stats.clusterable, options.k
    );

    let run = run_clustering(&outcome.encoded, k, options)?;
    Ok(assemble_result(outcome, run))
}

/// Combine the encoder's bookkeeping with a clustering run.
fn assemble_result(outcome: EncodingOutcome, run: ClusterRun) -> ClusteringResult {
    ClusteringResult {
        clusters: run.clusters,
        requested_k: run.requested_k,
        iterations: run.iterations,
        converged: run.converged,
        total_posts: outcome.stats.total,
        posts_analyzed: outcome.stats.total,
        posts_clustered: outcome.stats.clusterable,
        posts_excluded: outcome.stats.excluded,
        excluded_post_ids: outcome.excluded.into_iter().map(|p| p.id).collect(),
    }
}
