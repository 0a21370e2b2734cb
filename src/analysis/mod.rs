pub mod classifier;
pub mod coverage;
pub mod graph;
pub mod normalizer;
pub mod power;
pub mod stats;
