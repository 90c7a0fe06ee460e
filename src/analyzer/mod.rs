// Analyzer module: aggregate statistics and market-cap ranking.

pub mod ranking;
pub mod summary;

pub use summary::{Analyzer, AnalyzerImpl};
