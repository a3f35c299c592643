pub mod recency;
pub mod runner;
