pub mod clustering;
pub mod encoding;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod quality;
pub mod utils;

pub use error::{ClusteringError, Result};
pub use pipeline::{run_persona_analysis, PersonaAnalysis};
