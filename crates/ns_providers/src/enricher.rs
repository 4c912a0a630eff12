//! Best-effort replacement of truncated article bodies with text from the source page.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use ns_core::{Error, PipelineConfig, RawArticle, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scraper::Html;
use tracing::{debug, instrument, warn};
use url::Url;

pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

static ARTICLE_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<article\b[^>]*>(.*?)</article>").expect("valid regex"));
/// `<div>` whose `class` attribute mentions `content`.
///
/// The body ends at the first `</div>`, so a nested div truncates the match; the
/// enricher then keeps the provider body unless the fragment is still longer.
static CONTENT_DIV: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<div\b[^>]*\sclass\s*=\s*["'][^"']*content[^"']*["'][^>]*>(.*?)</div>"#)
        .expect("valid regex")
});
static PARAGRAPH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<p\b[^>]*>(.*?)</p>").expect("valid regex"));
static SCRIPT_OR_STYLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script>|<style\b[^>]*>.*?</style>").expect("valid regex")
});

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Returns the page markup.
    async fn fetch_page(&self, url: &str) -> Result<String>;
}

/// Fetches pages with a desktop browser user agent and a per-request timeout.
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(DESKTOP_USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        let parsed = Url::parse(url).map_err(|e| Error::Scraping(format!("Invalid URL {}: {}", url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::Scraping(format!("Unsupported scheme: {}", parsed.scheme())));
        }
        let response = self.client.get(parsed).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

pub struct ContentEnricher {
    fetcher: Arc<dyn PageFetcher>,
    min_chars: usize,
    timeout: Duration,
    concurrency: usize,
}

impl ContentEnricher {
    pub fn new(fetcher: Arc<dyn PageFetcher>, min_chars: usize, timeout: Duration, concurrency: usize) -> Self {
        Self {
            fetcher,
            min_chars,
            timeout,
            concurrency: concurrency.max(1),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        let fetcher = HttpPageFetcher::new(config.enrich_timeout)?;
        Ok(Self::new(
            Arc::new(fetcher),
            config.enrich_min_chars,
            config.enrich_timeout,
            config.enrich_concurrency,
        ))
    }

    /// Enrich articles concurrently; the result keeps input order.
    pub async fn enrich_all(&self, articles: Vec<RawArticle>) -> Vec<RawArticle> {
        stream::iter(articles)
            .map(|article| self.enrich(article))
            .buffered(self.concurrency)
            .collect()
            .await
    }

    /// Replaces a short body with extracted page text when the latter is strictly longer.
    #[instrument(level = "debug", skip_all, fields(url = %article.url))]
    pub async fn enrich(&self, mut article: RawArticle) -> RawArticle {
        let original = article.content_chars();
        if original >= self.min_chars || article.url.trim().is_empty() {
            return article;
        }

        let html = match tokio::time::timeout(self.timeout, self.fetcher.fetch_page(&article.url)).await {
            Ok(Ok(html)) => html,
            Ok(Err(e)) => {
                warn!(url = %article.url, error = %e, "Enrichment fetch failed, keeping original content");
                return article;
            }
            Err(_) => {
                warn!(url = %article.url, timeout = ?self.timeout, "Enrichment fetch timed out, keeping original content");
                return article;
            }
        };

        match extract_main_text(&html) {
            Some(text) => {
                let extracted = text.chars().count();
                if extracted > original {
                    debug!(original, extracted, "Replaced article content");
                    article.content = Some(text);
                } else {
                    debug!(original, extracted, "Extracted text not longer than original");
                }
            }
            None => debug!("No content block found"),
        }
        article
    }
}

/// First `<article>` block, else first `<div>` with a `content` class, else first `<p>`,
/// stripped of markup with whitespace collapsed.
pub fn extract_main_text(html: &str) -> Option<String> {
    let block = [&ARTICLE_BLOCK, &CONTENT_DIV, &PARAGRAPH]
        .into_iter()
        .find_map(|pattern| pattern.captures(html).and_then(|c| c.get(1)))?
        .as_str();
    let text = strip_markup(block);
    (!text.is_empty()).then_some(text)
}

fn strip_markup(fragment: &str) -> String {
    let without_code = SCRIPT_OR_STYLE.replace_all(fragment, " ");
    let document = Html::parse_fragment(&without_code);
    let text = document.root_element().text().collect::<Vec<_>>().join(" ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
