use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use crate::types::{RawArticle, SearchRequest};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Returns fuller article bodies.
    GNews,
    /// Headline-only; bodies are truncated.
    NewsApi,
}

impl ProviderKind {
    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::GNews => "GNews",
            ProviderKind::NewsApi => "NewsAPI",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[async_trait]
pub trait NewsProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Top stories for the request's category, language and region.
    async fn top_headlines(&self, request: &SearchRequest) -> Result<Vec<RawArticle>>;

    /// Keyword search; `keyword` may differ from `request.query` on a broadened retry.
    async fn search(&self, keyword: &str, request: &SearchRequest) -> Result<Vec<RawArticle>>;
}
