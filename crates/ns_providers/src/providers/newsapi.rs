use std::fmt;

use async_trait::async_trait;
use ns_core::{NewsProvider, ProviderKind, RawArticle, Result, SearchRequest};
use reqwest::Client;
use url::Url;

use super::{endpoint, get_articles};

/// Top headlines require a country; `global` maps to the US edition.
const DEFAULT_HEADLINE_COUNTRY: &str = "us";

/// newsapi.org v2 client. Bodies come back cut at ~200 characters.
pub struct NewsApiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    page_size: usize,
}

impl fmt::Debug for NewsApiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiProvider")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl NewsApiProvider {
    pub fn new(client: Client, api_key: &str, base_url: &str, page_size: usize) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.to_string(),
            page_size,
        }
    }

    pub(crate) fn headlines_url(&self, request: &SearchRequest) -> Result<Url> {
        let country = request
            .region
            .country_code()
            .unwrap_or(DEFAULT_HEADLINE_COUNTRY);
        let params = [
            ("country", country.to_string()),
            ("category", request.category.clone()),
            ("language", request.language.clone()),
            ("pageSize", self.page_size.to_string()),
            ("apiKey", self.api_key.clone()),
        ];
        endpoint(&self.base_url, "top-headlines", &params)
    }

    pub(crate) fn search_url(&self, keyword: &str, request: &SearchRequest) -> Result<Url> {
        let params = [
            ("q", keyword.to_string()),
            ("sortBy", "publishedAt".to_string()),
            ("language", request.language.clone()),
            ("pageSize", self.page_size.to_string()),
            ("apiKey", self.api_key.clone()),
        ];
        endpoint(&self.base_url, "everything", &params)
    }
}

#[async_trait]
impl NewsProvider for NewsApiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::NewsApi
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
