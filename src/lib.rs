pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod ingest;
pub mod matching;
pub mod models;
pub mod orchestrator;
pub mod stats;
pub mod util;
