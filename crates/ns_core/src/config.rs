use std::fmt;
use std::time::Duration;

/// Value shipped in sample `.env` files; treated as "not configured".
pub const PLACEHOLDER_NEWS_KEY: &str = "your_news_api_key_here";

pub const DEFAULT_GNEWS_BASE_URL: &str = "https://gnews.io/api/v4";
pub const DEFAULT_NEWS_API_BASE_URL: &str = "https://newsapi.org/v2";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-exp";

/// Hard ceiling on articles analyzed per request.
pub const MAX_ANALYZED_ARTICLES: usize = 6;

/// Immutable pipeline settings, resolved once at startup.
#[derive(Clone)]
pub struct PipelineConfig {
    pub gnews_api_key: Option<String>,
    pub news_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    /// Ask the model for `application/json` output instead of free text.
    pub gemini_json_mode: bool,
    pub gnews_base_url: String,
    pub news_api_base_url: String,
    pub gemini_base_url: String,
    pub page_size: usize,
    /// Requested cap; the effective value is [`PipelineConfig::article_limit`].
    pub max_articles: usize,
    pub enrich_min_chars: usize,
    pub enrich_timeout: Duration,
    pub enrich_concurrency: usize,
    pub analysis_concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            gnews_api_key: None,
            news_api_key: None,
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_json_mode: false,
            gnews_base_url: DEFAULT_GNEWS_BASE_URL.to_string(),
            news_api_base_url: DEFAULT_NEWS_API_BASE_URL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            page_size: 10,
            max_articles: MAX_ANALYZED_ARTICLES,
            enrich_min_chars: 500,
            enrich_timeout: Duration::from_secs(10),
            enrich_concurrency: 6,
            analysis_concurrency: 1,
        }
    }
}

impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |key: Option<&str>| key.map(|_| "<redacted>");
        f.debug_struct("PipelineConfig")
            .field("gnews_api_key", &redact(self.gnews_key()))
            .field("news_api_key", &redact(self.news_api_key()))
            .field("gemini_api_key", &redact(self.gemini_key()))
            .field("gemini_model", &self.gemini_model)
            .field("gemini_json_mode", &self.gemini_json_mode)
            .field("gnews_base_url", &self.gnews_base_url)
            .field("news_api_base_url", &self.news_api_base_url)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("page_size", &self.page_size)
            .field("max_articles", &self.max_articles)
            .field("enrich_min_chars", &self.enrich_min_chars)
            .field("enrich_timeout", &self.enrich_timeout)
            .field("enrich_concurrency", &self.enrich_concurrency)
            .field("analysis_concurrency", &self.analysis_concurrency)
            .finish()
    }
}

impl PipelineConfig {
    pub fn gnews_key(&self) -> Option<&str> {
        credential(self.gnews_api_key.as_deref())
    }

    pub fn news_api_key(&self) -> Option<&str> {
        credential(self.news_api_key.as_deref())
    }

    pub fn gemini_key(&self) -> Option<&str> {
        credential(self.gemini_api_key.as_deref())
    }

    /// `max_articles` clamped to `1..=MAX_ANALYZED_ARTICLES`.
    pub fn article_limit(&self) -> usize {
        self.max_articles.clamp(1, MAX_ANALYZED_ARTICLES)
    }

    pub fn has_any_provider(&self) -> bool {
        self.gnews_key().is_some() || self.news_api_key().is_some()
    }
}

/// Blank values and the sample placeholder count as missing.
fn credential(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != PLACEHOLDER_NEWS_KEY)
}
