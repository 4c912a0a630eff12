use std::fmt;

use async_trait::async_trait;
use ns_core::{NewsProvider, ProviderKind, RawArticle, Result, SearchRequest};
use reqwest::Client;
use url::Url;

use super::{endpoint, get_articles};

/// gnews.io v4 client. Returns article bodies (truncated by plan) alongside descriptions.
pub struct GNewsProvider {
    client: Client,
    api_key: String,
    base_url: String,
    page_size: usize,
}

impl fmt::Debug for GNewsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GNewsProvider")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl GNewsProvider {
    pub fn new(client: Client, api_key: &str, base_url: &str, page_size: usize) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.to_string(),
            page_size,
        }
    }

    fn common_params(&self, request: &SearchRequest) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("lang", request.language.clone()),
            ("max", self.page_size.to_string()),
        ];
        if let Some(country) = request.region.country_code() {
            params.push(("country", country.to_string()));
        }
        params
    }

    pub(crate) fn headlines_url(&self, request: &SearchRequest) -> Result<Url> {
        let mut params = vec![("category", request.category.clone())];
        params.extend(self.common_params(request));
        params.push(("apikey", self.api_key.clone()));
        endpoint(&self.base_url, "top-headlines", &params)
    }

    pub(crate) fn search_url(&self, keyword: &str, request: &SearchRequest) -> Result<Url> {
        let mut params = vec![("q", keyword.to_string())];
        params.extend(self.common_params(request));
        params.push(("sortby", "publishedAt".to_string()));
        params.push(("apikey", self.api_key.clone()));
        endpoint(&self.base_url, "search", &params)
    }
}

#[async_trait]
impl NewsProvider for GNewsProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::GNews
    }

    async fn top_headlines(&self, request: &SearchRequest) -> Result<Vec<RawArticle>> {
        let url = self.headlines_url(request)?;
        get_articles(&self.client, self.kind(), url).await
    }

    async fn search(&self, keyword: &str, request: &SearchRequest) -> Result<Vec<RawArticle>> {
        let url = self.search_url(keyword, request)?;
        get_articles(&self.client, self.kind(), url).await
    }
}
