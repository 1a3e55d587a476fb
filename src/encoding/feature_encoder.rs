// src/encoding/feature_encoder.rs
//! One-hot encoding of post attributes for k-means.
//!
//! Every attribute keeps an explicit `unknown` slot so missing labels stay
//! visible in the vectors instead of silently collapsing to zeros.

use log::debug;

use crate::models::{
    AttributeField, AttributeSet, Category, CookingFor, CookingSkill, Emotion, EncodedRecord,
    EncodingOutcome, EncodingStats, LifeStage, MealOccasion, Motivation, RawRecord,
    RecordMetadata, FEATURE_DIMENSIONS,
};

pub const DEFAULT_MIN_KNOWN_FIELDS: usize = 3;
/// Characters of post content kept in encoded metadata.
pub const CONTENT_PREVIEW_CHARS: usize = 200;

/// Normalize a raw attribute string against the vocabulary of `C`.
pub fn normalize_attribute<C: Category>(value: Option<&str>) -> C {
    C::normalize(value)
}

pub fn normalize_attributes(post: &RawRecord) -> AttributeSet {
    AttributeSet {
        life_stage: normalize_attribute::<LifeStage>(post.life_stage.as_deref()),
        cooking_skill: normalize_attribute::<CookingSkill>(post.cooking_skill.as_deref()),
        motivation_category: normalize_attribute::<Motivation>(
            post.motivation_category.as_deref(),
        ),
        meal_occasion: normalize_attribute::<MealOccasion>(post.meal_occasion.as_deref()),
        cooking_for: normalize_attribute::<CookingFor>(post.cooking_for.as_deref()),
        emotion: normalize_attribute::<Emotion>(post.emotion.as_deref()),
    }
}

/// Number of attributes (0-6) that normalize to `unknown`.
pub fn count_unknowns(post: &RawRecord) -> usize {
    normalize_attributes(post).unknown_count()
}

pub fn is_clusterable(post: &RawRecord, min_known_fields: usize) -> bool {
    AttributeField::ALL.len() - count_unknowns(post) >= min_known_fields
}

fn truncate_chars(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => content[..byte_idx].to_string(),
        None => content.to_string(),
    }
}

fn one_hot_vector(attributes: &AttributeSet) -> Vec<f64> {
    let mut vector = vec![0.0; FEATURE_DIMENSIONS];
    for field in AttributeField::ALL {
        vector[field.offset() + attributes.index_of(field)] = 1.0;
    }
    vector
}

/// Encode a single post regardless of how many attributes are known.
pub fn encode_post(post: &RawRecord) -> EncodedRecord {
    let attributes = normalize_attributes(post);
    EncodedRecord {
        record_id: post.id.clone(),
        vector: one_hot_vector(&attributes),
        metadata: RecordMetadata {
            content: truncate_chars(&post.content, CONTENT_PREVIEW_CHARS),
            engagement: post.engagement_total,
            attributes,
            unknown_count: attributes.unknown_count(),
        },
    }
}

/// Split a batch into encoded (clusterable) posts and excluded posts.
///
/// With `filter_unclusterable` off, every post is encoded.
pub fn encode_posts(
    posts: &[RawRecord],
    min_known_fields: usize,
    filter_unclusterable: bool,
) -> EncodingOutcome {
    let mut encoded = Vec::with_capacity(posts.len());
    let mut excluded = Vec::new();

    for post in posts {
        if filter_unclusterable && !is_clusterable(post, min_known_fields) {
            excluded.push(post.clone());
        } else {
            encoded.push(encode_post(post));
        }
    }

    let stats = EncodingStats {
        total: posts.len(),
        clusterable: encoded.len(),
        excluded: excluded.len(),
    };
    debug!(
        "Encoded {} posts: {} clusterable, {} excluded (min_known_fields={})",
        stats.total, stats.clusterable, stats.excluded, min_known_fields
    );

    EncodingOutcome {
        encoded,
        excluded,
        stats,
    }
}

/// Centroid-implied value of one attribute block.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAttribute {
    pub field: AttributeField,
    pub index: usize,
    pub value: &'static str,
    pub score: f64,
}

/// Per-attribute argmax of a centroid, in `AttributeField::ALL` order.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedCentroid(Vec<DecodedAttribute>);

impl DecodedCentroid {
    pub fn get(&self, field: AttributeField) -> &DecodedAttribute {
        &self.0[field.position()]
    }

    pub fn value(&self, field: AttributeField) -> &'static str {
        self.get(field).value
    }

    pub fn iter(&self) -> impl Iterator<Item = &DecodedAttribute> {
        self.0.iter()
    }
}

/// Slice a centroid into attribute blocks and pick the strongest slot of each.
///
/// Ties resolve to the first slot. Blocks missing from a short vector decode to
/// `unknown` with a zero score.
pub fn decode_centroid(centroid: &[f64]) -> DecodedCentroid {
    let decoded = AttributeField::ALL
        .iter()
        .map(|&field| {
            let start = field.offset();
            let end = start + field.cardinality();
            let best = centroid.get(start..end).and_then(|block| {
                block
                    .iter()
                    .enumerate()
                    .fold(None, |best: Option<(usize, f64)>, (idx, &score)| match best {
                        Some((_, best_score)) if score <= best_score => best,
                        _ => Some((idx, score)),
                    })
            });
            let (index, score) = best.unwrap_or((field.cardinality() - 1, 0.0));
            DecodedAttribute {
                field,
                index,
                value: field.category_at(index),
                score,
            }
        })
        .collect();
    DecodedCentroid(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UNKNOWN_VALUE;

    fn post(id: &str, attrs: [Option<&str>; 6]) -> RawRecord {
        RawRecord {
            id: id.to_string(),
            content: format!("content of {}", id),
            engagement_total: 10,
            life_stage: attrs[0].map(str::to_string),
            cooking_skill: attrs[1].map(str::to_string),
            motivation_category: attrs[2].map(str::to_string),
            meal_occasion: attrs[3].map(str::to_string),
            cooking_for: attrs[4].map(str::to_string),
            emotion: attrs[5].map(str::to_string),
        }
    }

    fn full_post(id: &str) -> RawRecord {
        post(
            id,
            [
                Some("single"),
                Some("beginner"),
                Some("time_pressure"),
                Some("weekday_dinner_rush"),
                Some("self"),
                Some("frustration"),
            ],
        )
    }

    #[test]
    fn test_normalize_attribute_generic() {
        let skill: CookingSkill = normalize_attribute(Some("ADVANCED"));
        assert_eq!(skill, CookingSkill::Advanced);
        let skill: CookingSkill = normalize_attribute(Some("expert"));
        assert_eq!(skill, CookingSkill::Unknown);
    }

    #[test]
    fn test_count_unknowns_uses_normalization() {
        let p = post(
            "p1",
            [Some("single"), Some("wizard"), None, Some(""), Some("unknown"), Some("Relief")],
        );
        assert_eq!(count_unknowns(&p), 4);
        assert_eq!(count_unknowns(&full_post("p2")), 0);
    }

    #[test]
    fn test_is_clusterable_threshold() {
        let three_known = post(
            "p1",
            [Some("single"), Some("beginner"), Some("cost_saving"), None, None, None],
        );
        assert!(is_clusterable(&three_known, 3));
        assert!(!is_clusterable(&three_known, 4));
        assert!(is_clusterable(&post("p2", [None; 6]), 0));
    }

    #[test]
    fn test_encoded_vector_shape() {
        let encoded = encode_post(&post("p1", [Some("couple"), None, Some("bogus"), None, Some("kids"), None]));
        assert_eq!(encoded.vector.len(), FEATURE_DIMENSIONS);
        for field in AttributeField::ALL {
            let start = field.offset();
            let block = &encoded.vector[start..start + field.cardinality()];
            assert_eq!(block.iter().sum::<f64>(), 1.0);
        }
        assert_eq!(encoded.metadata.unknown_count, 4);
        assert_eq!(
            encoded.metadata.attributes.value_of(AttributeField::MotivationCategory),
            UNKNOWN_VALUE
        );
    }

    #[test]
    fn test_content_is_truncated_on_char_boundary() {
        let mut p = full_post("p1");
        p.content = "あ".repeat(250);
        let encoded = encode_post(&p);
        assert_eq!(encoded.metadata.content.chars().count(), CONTENT_PREVIEW_CHARS);
    }

    #[test]
    fn test_encode_posts_partitions_batch() {
        let posts = vec![
            full_post("keep-1"),
            post("drop-1", [Some("single"), None, None, None, None, None]),
            full_post("keep-2"),
        ];
        let outcome = encode_posts(&posts, 3, true);
        assert_eq!(outcome.stats.total, 3);
        assert_eq!(outcome.stats.clusterable, 2);
        assert_eq!(outcome.stats.excluded, 1);
        assert_eq!(outcome.excluded[0].id, "drop-1");
        assert!(outcome.encoded.iter().all(|e| e.record_id.starts_with("keep")));

        let unfiltered = encode_posts(&posts, 3, false);
        assert_eq!(unfiltered.stats.clusterable, 3);
        assert!(unfiltered.excluded.is_empty());
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let posts: Vec<RawRecord> = (0..20).map(|i| full_post(&format!("p{}", i))).collect();
        let first = encode_posts(&posts, 3, true);
        let second = encode_posts(&posts, 3, true);
        assert_eq!(first.encoded, second.encoded);
        assert_eq!(first.excluded, second.excluded);
    }

    #[test]
    fn test_decode_centroid_picks_block_maximum() {
        let encoded = encode_post(&full_post("p1"));
        let decoded = decode_centroid(&encoded.vector);
        assert_eq!(decoded.value(AttributeField::LifeStage), "single");
        assert_eq!(decoded.value(AttributeField::CookingFor), "self");
        assert_eq!(decoded.get(AttributeField::Emotion).score, 1.0);

        let mut blurred = vec![0.0; FEATURE_DIMENSIONS];
        let skill = AttributeField::CookingSkill.offset();
        blurred[skill] = 0.3;
        blurred[skill + 2] = 0.6;
        blurred[skill + 3] = 0.1;
        let decoded = decode_centroid(&blurred);
        assert_eq!(decoded.value(AttributeField::CookingSkill), "advanced");
        assert!((decoded.get(AttributeField::CookingSkill).score - 0.6).abs() < 1e-12);
        // All-zero block resolves to its first slot.
        assert_eq!(decoded.get(AttributeField::LifeStage).index, 0);
    }

    #[test]
    fn test_decode_short_centroid_is_unknown() {
        let decoded = decode_centroid(&[1.0, 0.0]);
        for attr in decoded.iter() {
            assert_eq!(attr.value, UNKNOWN_VALUE);
            assert_eq!(attr.score, 0.0);
        }
    }
}
