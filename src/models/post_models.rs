// src/models/post_models.rs

use serde::{Deserialize, Deserializer, Serialize};

use super::attributes::AttributeSet;

/// A labeled SNS post as supplied by the data-access layer.
///
/// Attribute fields hold whatever the upstream labeler produced; they are only
/// interpreted through normalization, so unexpected strings are tolerated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub engagement_total: u64,
    #[serde(default)]
    pub life_stage: Option<String>,
    #[serde(default)]
    pub cooking_skill: Option<String>,
    #[serde(default)]
    pub motivation_category: Option<String>,
    #[serde(default)]
    pub meal_occasion: Option<String>,
    #[serde(default)]
    pub cooking_for: Option<String>,
    #[serde(default)]
    pub emotion: Option<String>,
}

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A post turned into a one-hot feature vector plus the metadata needed after clustering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodedRecord {
    pub record_id: String,
    pub vector: Vec<f64>,
    pub metadata: RecordMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordMetadata {
    /// Content truncated for display.
    pub content: String,
    pub engagement: u64,
    pub attributes: AttributeSet,
    pub unknown_count: usize,
}

/// Record counts produced by the encoder's clusterability filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EncodingStats {
    pub total: usize,
    pub clusterable: usize,
    pub excluded: usize,
}

/// Outcome of encoding a batch: encoded posts, the posts held back, and counts.
#[derive(Debug, Clone, Default)]
pub struct EncodingOutcome {
    pub encoded: Vec<EncodedRecord>,
    pub excluded: Vec<RawRecord>,
    pub stats: EncodingStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_record_tolerates_null_and_missing_fields() {
        let json = r#"[
            {"id": "a", "content": null, "engagement_total": null, "life_stage": "single"},
            {"id": "b"},
            {"id": "c", "content": "朝ごはん", "engagement_total": 12, "emotion": null}
        ]"#;
        let posts: Vec<RawRecord> = serde_json::from_str(json).unwrap();

        assert_eq!(posts[0].content, "");
        assert_eq!(posts[0].engagement_total, 0);
        assert_eq!(posts[0].life_stage.as_deref(), Some("single"));
        assert_eq!(posts[1].engagement_total, 0);
        assert_eq!(posts[1].cooking_skill, None);
        assert_eq!(posts[2].content, "朝ごはん");
        assert_eq!(posts[2].engagement_total, 12);
        assert_eq!(posts[2].emotion, None);
    }
}
