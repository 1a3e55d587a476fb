// src/models/quality_models.rs

use serde::Serialize;
use std::collections::BTreeMap;

use super::attributes::AttributeField;

/// Percentage of the full input batch whose value is unknown, per attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UnknownRates {
    pub by_attribute: BTreeMap<AttributeField, f64>,
    /// Unweighted mean of the six per-attribute rates.
    pub average: f64,
}

impl UnknownRates {
    pub fn rate(&self, field: AttributeField) -> f64 {
        self.by_attribute.get(&field).copied().unwrap_or(0.0)
    }
}

/// Trust bucket for a composite confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
    VeryLow,
}

impl ConfidenceLevel {
    pub fn from_score(confidence: f64) -> Self {
        if confidence >= 80.0 {
            ConfidenceLevel::High
        } else if confidence >= 60.0 {
            ConfidenceLevel::Medium
        } else if confidence >= 40.0 {
            ConfidenceLevel::Low
        } else {
            ConfidenceLevel::VeryLow
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "high",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::VeryLow => "very_low",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "高信頼",
            ConfidenceLevel::Medium => "中程度",
            ConfidenceLevel::Low => "低信頼",
            ConfidenceLevel::VeryLow => "要注意",
        }
    }

    /// Advisory shown next to the personas.
    pub fn message(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "Sufficient data volume and quality.",
            ConfidenceLevel::Medium => {
                "Some attributes are unknown, but the personas are a useful reference."
            }
            ConfidenceLevel::Low => "Data is limited; treat the personas as a rough reference only.",
            ConfidenceLevel::VeryLow => "Data is insufficient.",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "🟢",
            ConfidenceLevel::Medium => "🟡",
            ConfidenceLevel::Low => "🟠",
            ConfidenceLevel::VeryLow => "🔴",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    /// Centroid-based silhouette approximation in [-1, 1], two decimals.
    pub silhouette_score: f64,
    pub unknown_rates: UnknownRates,
    /// 100 minus the average unknown rate.
    pub data_completeness: f64,
    /// Mean inter-centroid distance scaled to [0, 100].
    pub cluster_separation: f64,
    /// Weighted composite in [0, 100].
    pub overall_confidence: f64,
    pub confidence_level: ConfidenceLevel,
    pub confidence_label: String,
    pub confidence_message: String,
    pub posts_analyzed: usize,
    pub posts_clustered: usize,
    pub posts_excluded: usize,
    pub clustering_method: String,
    pub cluster_sizes: Vec<usize>,
}
