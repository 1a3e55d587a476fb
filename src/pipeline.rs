// src/pipeline.rs - Encode, cluster, score and flatten a batch of posts in one call

use serde::Serialize;

use crate::clustering::{cluster_posts, cluster_to_persona_input, PersonaInput};
use crate::error::Result;
use crate::models::{ClusteringResult, EncodingStats, QualityReport, RawRecord};
use crate::quality::{calculate_quality_metrics, ConfidenceWeights};
use crate::utils::clustering_config::ClusteringOptions;
use crate::utils::progress_bars::logging::{PipelineLogger, PipelineStage};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonaAnalysis {
    pub clustering: ClusteringResult,
    pub quality: QualityReport,
    /// One entry per cluster, in cluster order.
    pub personas: Vec<PersonaInput>,
}

/// Run the whole analysis with default confidence weights.
pub fn run_persona_analysis(posts: &[RawRecord], options: &ClusteringOptions) -> Result<PersonaAnalysis> {
    run_persona_analysis_with_weights(posts, options, &ConfidenceWeights::default())
}

pub fn run_persona_analysis_with_weights(
    posts: &[RawRecord],
    options: &ClusteringOptions,
    weights: &ConfidenceWeights,
) -> Result<PersonaAnalysis> {
    let clustering_logger = PipelineLogger::new(PipelineStage::Clustering);
    clustering_logger.log_start(posts.len());
    clustering_logger.log_phase(
        "encoding and k-means",
        Some(&format!(
            "min_known_fields={}, max_iterations={}",
            options.min_known_fields, options.max_iterations
        )),
    );
    let clustering = match cluster_posts(posts, options) {
        Ok(clustering) => clustering,
        Err(e) => {
            clustering_logger.log_warning(&e.to_string());
            return Err(e);
        }
    };
    clustering_logger.log_encoding_stats(&EncodingStats {
        total: clustering.total_posts,
        clusterable: clustering.posts_clustered,
        excluded: clustering.posts_excluded,
    });
    clustering_logger.log_k_resolution(clustering.requested_k, options.k.is_some(), clustering.posts_clustered);
    clustering_logger.log_clusters(&clustering.clusters, clustering.iterations, clustering.converged);

    let quality_logger = PipelineLogger::new(PipelineStage::Quality);
    quality_logger.log_phase("scoring", Some(&format!("{} clusters", clustering.clusters.len())));
    let quality = calculate_quality_metrics(posts, &clustering, weights);
    quality_logger.log_quality(&quality);

    let persona_logger = PipelineLogger::new(PipelineStage::Personas);
    let personas: Vec<PersonaInput> = clustering.clusters.iter().map(cluster_to_persona_input).collect();
    persona_logger.log_completion(personas.len(), clustering.posts_clustered);

    Ok(PersonaAnalysis {
        clustering,
        quality,
        personas,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClusteringError;
    use crate::models::{ConfidenceLevel, FEATURE_DIMENSIONS};

    const LIFE_STAGES: [&str; 5] = ["single", "couple", "child_raising", "empty_nest", "senior"];
    const SKILLS: [&str; 3] = ["beginner", "intermediate", "advanced"];
    const MOTIVATIONS: [&str; 4] = ["time_pressure", "taste_assurance", "variety_seeking", "cost_saving"];
    const OCCASIONS: [&str; 4] = ["weekday_dinner_rush", "weekend_dinner", "lunch_box", "party"];
    const COOKING_FOR: [&str; 4] = ["self", "family", "kids", "guest"];
    const EMOTIONS: [&str; 4] = ["anxiety", "relief", "satisfaction", "frustration"];

    fn full_post(i: usize) -> RawRecord {
        RawRecord {
            id: format!("full-{}", i),
            content: format!("post {}", i),
            engagement_total: (i % 50) as u64,
            life_stage: Some(LIFE_STAGES[i % LIFE_STAGES.len()].to_string()),
            cooking_skill: Some(SKILLS[i % SKILLS.len()].to_string()),
            motivation_category: Some(MOTIVATIONS[(i / 3) % MOTIVATIONS.len()].to_string()),
            meal_occasion: Some(OCCASIONS[(i / 7) % OCCASIONS.len()].to_string()),
            cooking_for: Some(COOKING_FOR[(i / 2) % COOKING_FOR.len()].to_string()),
            emotion: Some(EMOTIONS[(i / 5) % EMOTIONS.len()].to_string()),
        }
    }

    fn sparse_post(i: usize) -> RawRecord {
        RawRecord {
            id: format!("sparse-{}", i),
            life_stage: Some("single".to_string()),
            ..Default::default()
        }
    }

    fn seeded() -> ClusteringOptions {
        ClusteringOptions::default().with_seed(7)
    }

    #[test]
    fn test_sparse_posts_are_excluded_and_counts_balance() {
        let mut posts: Vec<RawRecord> = (0..600).map(full_post).collect();
        posts.extend((0..400).map(sparse_post));

        let analysis = run_persona_analysis(&posts, &seeded()).unwrap();
        let clustering = &analysis.clustering;

        assert_eq!(clustering.posts_excluded, 400);
        assert_eq!(clustering.posts_clustered, 600);
        assert_eq!(clustering.posts_analyzed, 1000);
        assert_eq!(clustering.requested_k, 6);
        assert!(clustering.clusters.len() <= 6);
        assert_eq!(clustering.cluster_sizes().iter().sum::<usize>(), 600);
        assert_eq!(clustering.excluded_post_ids.len(), 400);
        assert!(clustering.excluded_post_ids.iter().all(|id| id.starts_with("sparse-")));
        assert!(clustering
            .clusters
            .iter()
            .flat_map(|c| c.post_ids.iter())
            .all(|id| id.starts_with("full-")));

        for cluster in &clustering.clusters {
            assert_eq!(cluster.centroid.len(), FEATURE_DIMENSIONS);
            assert!(cluster.position.x.abs() <= 2.0 && cluster.position.y.abs() <= 2.0);
            for dominant in cluster.dominant_attributes.values() {
                assert!(dominant.percentage <= 100);
            }
        }

        let quality = &analysis.quality;
        assert_eq!(quality.posts_analyzed, 1000);
        assert_eq!(quality.posts_clustered + quality.posts_excluded, 1000);
        assert!((-1.0..=1.0).contains(&quality.silhouette_score));
        assert!((0.0..=100.0).contains(&quality.overall_confidence));
        assert!((0.0..=100.0).contains(&quality.data_completeness));
        assert_eq!(quality.cluster_sizes, clustering.cluster_sizes());
        assert_eq!(analysis.personas.len(), clustering.clusters.len());
    }

    #[test]
    fn test_identical_posts_collapse_with_zero_separation() {
        let posts: Vec<RawRecord> = (0..60)
            .map(|i| RawRecord {
                id: format!("same-{}", i),
                ..full_post(0)
            })
            .collect();

        let analysis = run_persona_analysis(&posts, &seeded()).unwrap();
        assert!(analysis.clustering.clusters.len() < analysis.clustering.requested_k);
        assert_eq!(analysis.clustering.clusters[0].size, 60);
        assert_eq!(analysis.quality.cluster_separation, 0.0);
        assert_eq!(analysis.quality.silhouette_score, 0.0);
        assert_eq!(analysis.quality.data_completeness, 100.0);
    }

    #[test]
    fn test_all_unknown_posts_are_insufficient() {
        let posts: Vec<RawRecord> = (0..200)
            .map(|i| RawRecord {
                id: format!("blank-{}", i),
                life_stage: Some("unknown".to_string()),
                ..Default::default()
            })
            .collect();

        let err = run_persona_analysis(&posts, &seeded()).unwrap_err();
        assert_eq!(
            err,
            ClusteringError::InsufficientData {
                clusterable: 0,
                required: 50
            }
        );
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let posts: Vec<RawRecord> = (0..300).map(full_post).collect();
        let first = run_persona_analysis(&posts, &seeded()).unwrap();
        let second = run_persona_analysis(&posts, &seeded()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_weights_shift_confidence() {
        let posts: Vec<RawRecord> = (0..300).map(full_post).collect();
        let completeness_only = ConfidenceWeights {
            silhouette: 0.0,
            completeness: 1.0,
            separation: 0.0,
            coverage: 0.0,
        };
        let analysis = run_persona_analysis_with_weights(&posts, &seeded(), &completeness_only).unwrap();
        assert_eq!(analysis.quality.overall_confidence, 100.0);
        assert_eq!(analysis.quality.confidence_level, ConfidenceLevel::High);
    }
}
