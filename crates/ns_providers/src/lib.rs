pub mod assemble;
pub mod enricher;
pub mod fetch;
pub mod pipeline;
pub mod providers;

pub use enricher::{ContentEnricher, HttpPageFetcher, PageFetcher};
pub use fetch::{fetch_articles, FetchOutcome};
pub use pipeline::NewsPipeline;
pub use providers::{select_providers, ProviderPlan};

pub mod prelude {
    pub use super::pipeline::NewsPipeline;
    pub use super::providers::ProviderPlan;
    pub use ns_core::{AnalyzeResponse, Error, NewsProvider, Result, SearchRequest};
}
