//! lexmetrics-core: Linguistic quality metrics for Spanish educational resources.
//!
//! This crate extracts the readable text of stored resources, checks its
//! grammar heuristically, measures lexical richness (Type-Token Ratio), and
//! folds per-resource scores into batch analyses, user reports and
//! recommendations.

pub mod aggregate;
pub mod analysis;
pub mod batch;
pub mod classify;
pub mod config;
pub mod error;
pub mod extract;
pub mod grammar;
pub mod lexical;
pub mod model;
pub mod parser;
pub mod recommend;
pub mod report;
pub mod segment;
pub mod service;
pub mod traits;
