// Promo pipeline: prompt → remote call → normalize → persist.
// All remote calls go through llm_client.

pub mod generator;
pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod prompts;
pub mod results;
pub mod submission;
