// src/error.rs

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClusteringError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClusteringError {
    /// Too few clusterable posts to support the minimum cluster count.
    /// Callers may retry with a lower `min_known_fields` or `min_k`.
    #[error("Not enough clusterable posts: {clusterable} (need at least {required})")]
    InsufficientData { clusterable: usize, required: usize },
}
