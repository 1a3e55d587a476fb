// src/models/mod.rs
pub mod attributes;
pub mod cluster_models;
pub mod post_models;
pub mod quality_models;

pub use attributes::{
    AttributeField, AttributeSet, Category, CookingFor, CookingSkill, Emotion, LifeStage,
    MealOccasion, Motivation, FEATURE_DIMENSIONS, UNKNOWN_VALUE,
};
pub use cluster_models::{
    AttributeDistribution, Cluster, ClusterRun, ClusteringResult, DominantAttribute, Position,
    SamplePost,
};
pub use post_models::{EncodedRecord, EncodingOutcome, EncodingStats, RawRecord, RecordMetadata};
pub use quality_models::{ConfidenceLevel, QualityReport, UnknownRates};
