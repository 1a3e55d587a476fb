pub mod clustering_config;
pub mod env;
pub mod progress_bars;
