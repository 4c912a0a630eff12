use std::fmt;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use ns_core::{
    AnalyzeResponse, Error, NewsProvider, OutputArticle, PipelineConfig, ProviderKind, RawArticle,
    Result, SourceRef,
};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

pub mod gnews;
pub mod newsapi;

pub use gnews::GNewsProvider;
pub use newsapi::NewsApiProvider;

pub const PLACEHOLDER_MESSAGE: &str =
    "Using sample data - please configure a news API key for real news";
pub const PLACEHOLDER_CREDIBILITY: u8 = 75;

/// Ordered providers to try, or the sample-data fallback when none are configured.
#[derive(Clone)]
pub enum ProviderPlan {
    Providers(Vec<Arc<dyn NewsProvider>>),
    Placeholder,
}

impl ProviderPlan {
    pub fn kinds(&self) -> Vec<ProviderKind> {
        match self {
            ProviderPlan::Providers(providers) => providers.iter().map(|p| p.kind()).collect(),
            ProviderPlan::Placeholder => Vec::new(),
        }
    }
}

impl fmt::Debug for ProviderPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderPlan::Providers(_) => f.debug_tuple("Providers").field(&self.kinds()).finish(),
            ProviderPlan::Placeholder => f.write_str("Placeholder"),
        }
    }
}

/// GNews first for its fuller bodies, then NewsAPI.
pub fn select_providers(config: &PipelineConfig, client: &Client) -> ProviderPlan {
    let mut providers: Vec<Arc<dyn NewsProvider>> = Vec::new();

    if let Some(key) = config.gnews_key() {
        providers.push(Arc::new(GNewsProvider::new(
            client.clone(),
            key,
            &config.gnews_base_url,
            config.page_size,
        )));
    }
    if let Some(key) = config.news_api_key() {
        providers.push(Arc::new(NewsApiProvider::new(
            client.clone(),
            key,
            &config.news_api_base_url,
            config.page_size,
        )));
    }

    if providers.is_empty() {
        info!("No news provider configured, serving sample data");
        ProviderPlan::Placeholder
    } else {
        let plan = ProviderPlan::Providers(providers);
        info!(providers = ?plan.kinds(), "News providers configured");
        plan
    }
}

/// Single sample article returned when no provider credential is set.
pub fn placeholder_response(category: &str) -> AnalyzeResponse {
    let summary = "This is a sample article to demonstrate the functionality. \
                   Please configure a valid news API key to get real news data.";
    AnalyzeResponse {
        articles: vec![OutputArticle {
            title: "Sample News Article".to_string(),
            content: summary.to_string(),
            summary: summary.to_string(),
            credibility: PLACEHOLDER_CREDIBILITY,
            sources: vec![SourceRef {
                name: "NewSense AI".to_string(),
                url: "https://newsense-ai.com".to_string(),
            }],
            category: category.to_string(),
            published_at: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        }],
        message: Some(PLACEHOLDER_MESSAGE.to_string()),
    }
}

/// Shared client for provider APIs.
pub fn http_client() -> Result<Client> {
    Ok(Client::builder()
        .user_agent(concat!("newsense/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// `{ articles: [...] }` as returned by both GNews and NewsAPI.
#[derive(Debug, Deserialize)]
pub(crate) struct ArticlesEnvelope {
    #[serde(default)]
    articles: Vec<WireArticle>,
    /// NewsAPI error text.
    message: Option<String>,
    /// GNews error list.
    errors: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireArticle {
    title: Option<String>,
    description: Option<String>,
    content: Option<String>,
    url: Option<String>,
    source: Option<WireSource>,
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireSource {
    name: Option<String>,
}

/// NewsAPI keeps deleted stories in results with this marker.
const REMOVED_MARKER: &str = "[Removed]";

impl ArticlesEnvelope {
    pub(crate) fn into_articles(self) -> Vec<RawArticle> {
        self.articles
            .into_iter()
            .filter_map(|a| {
                let title = a.title.unwrap_or_default();
                let url = a.url.unwrap_or_default();
                if url.is_empty() || title == REMOVED_MARKER {
                    return None;
                }
                Some(RawArticle {
                    title,
                    description: a.description,
                    content: a.content,
                    url,
                    source_name: a
                        .source
                        .and_then(|s| s.name)
                        .unwrap_or_else(|| "Unknown".to_string()),
                    published_at: a.published_at,
                })
            })
            .collect()
    }

    fn error_message(&self) -> Option<String> {
        if let Some(message) = &self.message {
            return Some(message.clone());
        }
        match &self.errors {
            Some(serde_json::Value::Array(items)) => Some(
                items
                    .iter()
                    .map(|e| e.as_str().map_or_else(|| e.to_string(), str::to_string))
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            Some(other) => Some(other.to_string()),
            None => None,
        }
    }
}

/// GET a provider endpoint and decode its article list; non-2xx becomes `Error::Provider`.
pub(crate) async fn get_articles(
    client: &Client,
    kind: ProviderKind,
    url: Url,
) -> Result<Vec<RawArticle>> {
    debug!(provider = %kind, path = url.path(), "Requesting articles");
    let response = client.get(url).send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<ArticlesEnvelope>(&body)
            .ok()
            .and_then(|e| e.error_message())
            .unwrap_or_else(|| "Failed to fetch news".to_string());
        return Err(Error::Provider(format!("{} returned {}: {}", kind, status, message)));
    }

    let envelope: ArticlesEnvelope = serde_json::from_str(&body)?;
    let articles = envelope.into_articles();
    debug!(provider = %kind, count = articles.len(), "Decoded articles");
    Ok(articles)
}

/// Joins an endpoint name onto a configured base URL.
pub(crate) fn endpoint(base_url: &str, path: &str, params: &[(&str, String)]) -> Result<Url> {
    let raw = format!("{}/{}", base_url.trim_end_matches('/'), path);
    Url::parse_with_params(&raw, params)
        .map_err(|e| Error::Provider(format!("Invalid provider URL {}: {}", raw, e)))
}
