pub mod normalizer;
pub mod rules;
pub mod classifier;
pub mod masking;
pub mod aggregate;
pub mod recommend;
pub mod engine;
