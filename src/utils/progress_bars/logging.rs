// src/utils/progress_bars/logging.rs - Logging helpers for the persona analysis stages
use log::{debug, info, warn};
use std::time::{Duration, Instant};

use crate::models::{Cluster, EncodingStats, QualityReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Clustering,
    Quality,
    Personas,
}

impl PipelineStage {
    pub fn name_and_emoji(&self) -> (&'static str, &'static str) {
        match self {
            PipelineStage::Clustering => ("CLUSTERING", "🧩"),
            PipelineStage::Quality => ("QUALITY", "📏"),
            PipelineStage::Personas => ("PERSONAS", "👤"),
        }
    }
}

#[derive(Clone)]
pub struct PipelineLogger {
    stage_name: &'static str,
    stage_emoji: &'static str,
    start_time: Instant,
}

impl PipelineLogger {
    pub fn new(stage: PipelineStage) -> Self {
        let (stage_name, stage_emoji) = stage.name_and_emoji();
        Self {
            stage_name,
            stage_emoji,
            start_time: Instant::now(),
        }
    }

    pub fn log_start(&self, post_count: usize) {
        info!(
            "[{}] {} 🚀 Starting {} over {} posts",
            self.stage_name,
            self.stage_emoji,
            self.stage_name.to_lowercase(),
            post_count
        );
    }

    pub fn log_phase(&self, phase: &str, details: Option<&str>) {
        let elapsed = self.start_time.elapsed();
        let msg = if let Some(details) = details {
            format!(
                "[{}] {} 🔄 Phase: {} - {} [+{:.1}s]",
                self.stage_name, self.stage_emoji, phase, details, elapsed.as_secs_f32()
            )
        } else {
            format!(
                "[{}] {} 🔄 Phase: {} [+{:.1}s]",
                self.stage_name, self.stage_emoji, phase, elapsed.as_secs_f32()
            )
        };
        info!("{}", msg);
    }

    pub fn log_encoding_stats(&self, stats: &EncodingStats) {
        let percent_kept = if stats.total > 0 {
            (stats.clusterable as f64 / stats.total as f64) * 100.0
        } else {
            0.0
        };
        info!(
            "[{}] {} 📊 Encoded {} posts → {} clusterable ({:.1}% kept)",
            self.stage_name, self.stage_emoji, stats.total, stats.clusterable, percent_kept
        );
        if stats.excluded > 0 {
            info!(
                "[{}] {} 🚫 Excluded {} posts with too few known attributes",
                self.stage_name, self.stage_emoji, stats.excluded
            );
        }
    }

    pub fn log_k_resolution(&self, k: usize, fixed: bool, clusterable: usize) {
        info!(
            "[{}] {} 🎯 k={} ({}) for {} clusterable posts",
            self.stage_name,
            self.stage_emoji,
            k,
            if fixed { "fixed" } else { "auto" },
            clusterable
        );
    }

    pub fn log_clusters(&self, clusters: &[Cluster], iterations: usize, converged: bool) {
        info!(
            "[{}] {} ✅ {} clusters after {} iterations{}",
            self.stage_name,
            self.stage_emoji,
            clusters.len(),
            iterations,
            if converged { "" } else { " (not converged)" }
        );
        for cluster in clusters {
            debug!(
                "[{}] {}   cluster {}: {} posts ({}%) at ({:.2}, {:.2})",
                self.stage_name,
                self.stage_emoji,
                cluster.id,
                cluster.size,
                cluster.share_percentage,
                cluster.position.x,
                cluster.position.y
            );
        }
    }

    pub fn log_quality(&self, report: &QualityReport) {
        info!(
            "[{}] {} {} Confidence {} ({}): silhouette {:.2}, completeness {}, separation {}",
            self.stage_name,
            self.stage_emoji,
            report.confidence_level.emoji(),
            report.overall_confidence,
            report.confidence_level.as_str(),
            report.silhouette_score,
            report.data_completeness,
            report.cluster_separation
        );
        if report.unknown_rates.average >= 50.0 {
            self.log_warning(&format!(
                "Average unknown rate is {}%",
                report.unknown_rates.average
            ));
        }
    }

    pub fn log_completion(&self, clusters: usize, posts_clustered: usize) {
        let duration = self.start_time.elapsed();
        info!(
            "[{}] {} 🎉 COMPLETED: {} clusters from {} posts in {:.2?}",
            self.stage_name, self.stage_emoji, clusters, posts_clustered, duration
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!("[{}] {} ⚠️  {}", self.stage_name, self.stage_emoji, message);
    }
}

pub fn log_pipeline_start(run_id: &str, post_count: usize) {
    info!("🚀 ===== PERSONA ANALYSIS STARTING =====");
    info!("📅 Run ID: {}", run_id);
    info!("📥 Input posts: {}", post_count);
    info!("========================================");
}

pub fn log_pipeline_completion(run_id: &str, duration: Duration, report: &QualityReport) {
    info!("🎉 ===== PERSONA ANALYSIS COMPLETED =====");
    info!("📅 Run ID: {}", run_id);
    info!("⏱️  Total Duration: {:.2?}", duration);
    info!("🧩 Cluster sizes: {:?}", report.cluster_sizes);
    info!(
        "📊 Posts: {} analyzed, {} clustered, {} excluded",
        report.posts_analyzed, report.posts_clustered, report.posts_excluded
    );
    info!(
        "{} Confidence: {} ({}) - {}",
        report.confidence_level.emoji(),
        report.overall_confidence,
        report.confidence_label,
        report.confidence_message
    );
    info!("=========================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        assert_eq!(PipelineStage::Clustering.name_and_emoji(), ("CLUSTERING", "🧩"));
        assert_eq!(PipelineStage::Quality.name_and_emoji().0, "QUALITY");
        assert_eq!(PipelineStage::Personas.name_and_emoji().0, "PERSONAS");
    }
}
