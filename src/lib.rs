#![doc = "workflow-documenter: batch documentation generator for GitHub Actions workflows."]

//! Discovers workflow files, generates markdown documentation for each one
//! through an OpenAI-compatible streaming endpoint, and aggregates an index
//! of the results. One failed file never aborts the batch.

pub mod cli;
pub mod config;
pub mod contract;
pub mod discover;
pub mod generate;
pub mod index;
pub mod load_config;
pub mod pipeline;
