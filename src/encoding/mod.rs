// src/encoding/mod.rs
pub mod feature_encoder;

pub use feature_encoder::{
    count_unknowns, decode_centroid, encode_post, encode_posts, is_clusterable,
    normalize_attribute, normalize_attributes, DecodedAttribute, DecodedCentroid,
    CONTENT_PREVIEW_CHARS, DEFAULT_MIN_KNOWN_FIELDS,
};
