//! Scoring engine: normalization, threat tables, similarity and rules.

pub mod error;
pub mod link;
pub mod output;
pub mod rules;
pub mod scanner;
pub mod similarity;
pub mod tables;
pub mod verdict;
