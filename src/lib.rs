pub mod bluesky;
pub mod config;
pub mod engine;
pub mod orcid;
pub mod post;
