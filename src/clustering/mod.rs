// src/clustering/mod.rs
pub mod kmeans;
pub mod persona_clustering;
pub mod persona_input;
pub mod projection;

pub use persona_clustering::{cluster_posts, determine_k, resolve_k, run_clustering};
pub use persona_input::{cluster_to_persona_input, PersonaInput};
pub use projection::{centroid_to_position, AxisTerm, ProjectionConfig};
