// src/quality/mod.rs
pub mod quality_metrics;

pub use quality_metrics::{
    calculate_cluster_separation, calculate_data_completeness, calculate_overall_confidence,
    calculate_quality_metrics, calculate_separation_proxy, calculate_unknown_rates,
    interpret_separation, ConfidenceWeights,
};
