pub mod batch;
pub mod config;
pub mod normalize;
pub mod types;
