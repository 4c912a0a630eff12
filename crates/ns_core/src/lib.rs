pub mod config;
pub mod error;
pub mod models;
pub mod provider;
pub mod types;

pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use models::InferenceModel;
pub use provider::{NewsProvider, ProviderKind};
pub use types::{
    AnalysisResult, AnalyzeResponse, OutputArticle, RawArticle, Region, SearchRequest, SourceRef,
};
