pub mod analyzer;
pub mod models;
pub mod parse;
pub mod prompt;

pub use analyzer::ArticleAnalyzer;
pub use models::create_model;
pub use ns_core::InferenceModel;

/// Credibility used when the model answered but nothing usable came back.
pub const DEFAULT_CREDIBILITY: u8 = 70;
/// Credibility used when the model call itself failed.
pub const ERROR_CREDIBILITY: u8 = 65;

pub const NO_SUMMARY: &str = "No summary available";
pub const SUMMARY_UNAVAILABLE: &str = "Summary unavailable";

pub mod prelude {
    pub use super::analyzer::ArticleAnalyzer;
    pub use super::models::create_model;
    pub use ns_core::{AnalysisResult, Error, InferenceModel, RawArticle, Result};
}
