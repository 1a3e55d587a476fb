// src/clustering/persona_input.rs

use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{AttributeField, Cluster, Position};

/// Compact view of a cluster handed to the persona naming step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonaInput {
    pub cluster_id: usize,
    pub size: usize,
    pub share_percentage: u32,
    pub position: Position,
    /// Display label of the majority value per attribute.
    pub dominant_attributes: BTreeMap<AttributeField, String>,
    pub dominant_percentages: BTreeMap<AttributeField, u32>,
    pub avg_engagement: u64,
    pub sample_posts: Vec<String>,
}

pub fn cluster_to_persona_input(cluster: &Cluster) -> PersonaInput {
    let mut dominant_attributes = BTreeMap::new();
    let mut dominant_percentages = BTreeMap::new();
    for (field, dominant) in &cluster.dominant_attributes {
        dominant_attributes.insert(*field, dominant.label.clone());
        dominant_percentages.insert(*field, dominant.percentage);
    }

    PersonaInput {
        cluster_id: cluster.id,
        size: cluster.size,
        share_percentage: cluster.share_percentage,
        position: cluster.position,
        dominant_attributes,
        dominant_percentages,
        avg_engagement: cluster.avg_engagement,
        sample_posts: cluster
            .sample_posts
            .iter()
            .map(|p| p.content.clone())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DominantAttribute, SamplePost};

    #[test]
    fn test_persona_input_carries_labels_and_samples() {
        let mut dominant = BTreeMap::new();
        dominant.insert(
            AttributeField::CookingFor,
            DominantAttribute {
                value: "kids".to_string(),
                label: "子ども".to_string(),
                percentage: 72,
            },
        );
        let cluster = Cluster {
            id: 2,
            centroid: vec![],
            post_ids: vec!["p1".into(), "p2".into()],
            size: 2,
            share_percentage: 12,
            position: Position { x: -0.5, y: 1.2 },
            dominant_attributes: dominant,
            attribute_distribution: BTreeMap::new(),
            sample_posts: vec![SamplePost {
                id: "p1".into(),
                content: "お弁当づくり".into(),
                engagement: 40,
            }],
            avg_engagement: 30,
            total_engagement: 60,
        };

        let input = cluster_to_persona_input(&cluster);
        assert_eq!(input.cluster_id, 2);
        assert_eq!(input.dominant_attributes[&AttributeField::CookingFor], "子ども");
        assert_eq!(input.dominant_percentages[&AttributeField::CookingFor], 72);
        assert_eq!(input.sample_posts, vec!["お弁当づくり".to_string()]);
        assert_eq!(input.position, Position { x: -0.5, y: 1.2 });
    }
}
