// src/models/cluster_models.rs

use serde::Serialize;
use std::collections::BTreeMap;

use super::attributes::AttributeField;

/// Location of a cluster on the persona map. Both axes span [-2, 2].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Position {
    /// Time and effort investment: quick and efficient (-) to careful and time-consuming (+).
    pub x: f64,
    /// Psychological engagement: routine (-) to invested, wanting to please (+).
    pub y: f64,
}

/// Majority value of one attribute among a cluster's members.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DominantAttribute {
    pub value: String,
    pub label: String,
    /// Share of members holding `value`, whole percent.
    pub percentage: u32,
}

/// Per-attribute value counts across a cluster's members. Values with a zero count are omitted.
pub type AttributeDistribution = BTreeMap<AttributeField, BTreeMap<String, usize>>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SamplePost {
    pub id: String,
    pub content: String,
    pub engagement: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    pub id: usize,
    pub centroid: Vec<f64>,
    pub post_ids: Vec<String>,
    pub size: usize,
    pub share_percentage: u32,
    pub position: Position,
    pub dominant_attributes: BTreeMap<AttributeField, DominantAttribute>,
    pub attribute_distribution: AttributeDistribution,
    pub sample_posts: Vec<SamplePost>,
    pub avg_engagement: u64,
    pub total_engagement: u64,
}

impl Cluster {
    pub fn dominant(&self, field: AttributeField) -> Option<&DominantAttribute> {
        self.dominant_attributes.get(&field)
    }
}

/// Clusters for the clusterable part of a batch, plus k-means run information.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClusterRun {
    pub clusters: Vec<Cluster>,
    pub requested_k: usize,
    pub iterations: usize,
    pub converged: bool,
}

/// Full clustering output for one input batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClusteringResult {
    pub clusters: Vec<Cluster>,
    pub requested_k: usize,
    pub iterations: usize,
    pub converged: bool,
    pub total_posts: usize,
    pub posts_analyzed: usize,
    pub posts_clustered: usize,
    pub posts_excluded: usize,
    pub excluded_post_ids: Vec<String>,
}

impl ClusteringResult {
    pub fn cluster_sizes(&self) -> Vec<usize> {
        self.clusters.iter().map(|c| c.size).collect()
    }
}
