//! First-success article fetching across the configured providers.

use std::sync::Arc;

use ns_core::{NewsProvider, ProviderKind, RawArticle, SearchRequest};
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub articles: Vec<RawArticle>,
    /// Provider that produced `articles`, if any did.
    pub provider: Option<ProviderKind>,
    /// True when the articles came from the region's broadened retry.
    pub broadened: bool,
}

#[derive(Debug, Clone, Copy)]
enum Attempt<'a> {
    Headlines,
    Search(&'a str),
}

/// Runs the primary attempt, then at most one broadened regional retry.
///
/// Provider failures are logged and skipped; an empty outcome is a valid result.
pub async fn fetch_articles(
    providers: &[Arc<dyn NewsProvider>],
    request: &SearchRequest,
) -> FetchOutcome {
    let primary = if request.wants_headlines() {
        Attempt::Headlines
    } else {
        Attempt::Search(&request.query)
    };

    if let Some((provider, articles)) = first_success(providers, request, primary).await {
        return FetchOutcome {
            articles,
            provider: Some(provider),
            broadened: false,
        };
    }

    if let Some(keyword) = request.region.broadened_keyword() {
        info!(query = %request.query, keyword, region = request.region.as_str(), "No articles found, broadening search");
        if let Some((provider, articles)) =
            first_success(providers, request, Attempt::Search(keyword)).await
        {
            return FetchOutcome {
                articles,
                provider: Some(provider),
                broadened: true,
            };
        }
    }

    FetchOutcome::default()
}

async fn first_success(
    providers: &[Arc<dyn NewsProvider>],
    request: &SearchRequest,
    attempt: Attempt<'_>,
) -> Option<(ProviderKind, Vec<RawArticle>)> {
    for provider in providers {
        let kind = provider.kind();
        let result = match attempt {
            Attempt::Headlines => provider.top_headlines(request).await,
            Attempt::Search(keyword) => provider.search(keyword, request).await,
        };
        match result {
            Ok(articles) if !articles.is_empty() => {
                debug!(provider = %kind, ?attempt, count = articles.len(), "Provider returned articles");
                return Some((kind, articles));
            }
            Ok(_) => debug!(provider = %kind, ?attempt, "Provider returned no articles"),
            Err(e) => warn!(provider = %kind, ?attempt, error = %e, "Provider failed, trying next"),
        }
    }
    None
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use ns_core::{Error, Region, Result};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Canned provider keyed by call: `"headlines"` or `"search:<keyword>"`.
    pub(crate) struct FakeProvider {
        kind: ProviderKind,
        responses: HashMap<String, std::result::Result<usize, String>>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeProvider {
        pub(crate) fn new(kind: ProviderKind) -> Self {
            Self {
                kind,
                responses: HashMap::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn returning(mut self, call: &str, count: usize) -> Self {
            self.responses.insert(call.to_string(), Ok(count));
            self
        }

        pub(crate) fn failing(mut self, call: &str) -> Self {
            self.responses
                .insert(call.to_string(), Err("connection refused".to_string()));
            self
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn respond(&self, call: String) -> Result<Vec<RawArticle>> {
            self.calls.lock().unwrap().push(call.clone());
            match self.responses.get(&call) {
                Some(Ok(count)) => Ok((0..*count)
                    .map(|i| RawArticle {
                        title: format!("{} {} #{}", self.kind, call, i),
                        description: Some(format!("description {}", i)),
                        url: format!("https://news.test/{}/{}", self.kind, i),
                        source_name: self.kind.name().to_string(),
                        published_at: Some("2024-06-01T12:00:00Z".to_string()),
                        ..Default::default()
                    })
                    .collect()),
                Some(Err(message)) => Err(Error::Provider(message.clone())),
                None => Ok(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl NewsProvider for FakeProvider {
        fn kind(&self) -> ProviderKind {
            self.kind
        }

        async fn top_headlines(&self, _request: &SearchRequest) -> Result<Vec<RawArticle>> {
            self.respond("headlines".to_string())
        }

        async fn search(&self, keyword: &str, _request: &SearchRequest) -> Result<Vec<RawArticle>> {
            self.respond(format!("search:{}", keyword))
        }
    }

    fn plan(providers: &[&Arc<FakeProvider>]) -> Vec<Arc<dyn NewsProvider>> {
        providers
            .iter()
            .map(|p| Arc::clone(*p) as Arc<dyn NewsProvider>)
            .collect()
    }

    #[tokio::test]
    async fn test_latest_general_uses_headlines() {
        let gnews = Arc::new(FakeProvider::new(ProviderKind::GNews).returning("headlines", 4));
        let outcome = fetch_articles(&plan(&[&gnews]), &SearchRequest::new("latest", "general")).await;
        assert_eq!(outcome.articles.len(), 4);
        assert_eq!(gnews.calls(), vec!["headlines"]);
    }

    #[tokio::test]
    async fn test_latest_in_other_category_searches() {
        let gnews = Arc::new(FakeProvider::new(ProviderKind::GNews).returning("search:latest", 2));
        let outcome = fetch_articles(&plan(&[&gnews]), &SearchRequest::new("latest", "sports")).await;
        assert_eq!(outcome.articles.len(), 2);
        assert_eq!(gnews.calls(), vec!["search:latest"]);
    }

    #[tokio::test]
    async fn test_falls_back_on_error_and_empty() {
        let gnews = Arc::new(FakeProvider::new(ProviderKind::GNews).failing("search:mars"));
        let newsapi = Arc::new(FakeProvider::new(ProviderKind::NewsApi).returning("search:mars", 3));
        let outcome = fetch_articles(&plan(&[&gnews, &newsapi]), &SearchRequest::new("mars", "science")).await;
        assert_eq!(outcome.provider, Some(ProviderKind::NewsApi));
        assert_eq!(outcome.articles.len(), 3);
        assert!(!outcome.broadened);
    }

    #[tokio::test]
    async fn test_first_success_wins_without_merging() {
        let gnews = Arc::new(FakeProvider::new(ProviderKind::GNews).returning("search:mars", 2));
        let newsapi = Arc::new(FakeProvider::new(ProviderKind::NewsApi).returning("search:mars", 5));
        let outcome = fetch_articles(&plan(&[&gnews, &newsapi]), &SearchRequest::new("mars", "science")).await;
        assert_eq!(outcome.provider, Some(ProviderKind::GNews));
        assert_eq!(outcome.articles.len(), 2);
        assert!(newsapi.calls().is_empty());
    }

    #[tokio::test]
    async fn test_indian_region_broadens_once() {
        let gnews = Arc::new(FakeProvider::new(ProviderKind::GNews).returning("search:india", 3));
        let newsapi = Arc::new(FakeProvider::new(ProviderKind::NewsApi));
        let request = SearchRequest::new("quantum", "science").with_region(Region::Indian);
        let outcome = fetch_articles(&plan(&[&gnews, &newsapi]), &request).await;
        assert_eq!(outcome.articles.len(), 3);
        assert!(outcome.broadened);
        assert_eq!(gnews.calls(), vec!["search:quantum", "search:india"]);
        assert_eq!(newsapi.calls(), vec!["search:quantum"]);
    }

    #[tokio::test]
    async fn test_indian_region_gives_up_after_one_retry() {
        let gnews = Arc::new(FakeProvider::new(ProviderKind::GNews));
        let newsapi = Arc::new(FakeProvider::new(ProviderKind::NewsApi).failing("search:india"));
        let request = SearchRequest::new("latest", "general").with_region(Region::Indian);
        let outcome = fetch_articles(&plan(&[&gnews, &newsapi]), &request).await;
        assert!(outcome.articles.is_empty());
        assert_eq!(outcome.provider, None);
        assert_eq!(gnews.calls(), vec!["headlines", "search:india"]);
        assert_eq!(newsapi.calls(), vec!["headlines", "search:india"]);
    }

    #[tokio::test]
    async fn test_global_region_never_broadens() {
        let gnews = Arc::new(FakeProvider::new(ProviderKind::GNews).returning("search:india", 3));
        let outcome = fetch_articles(&plan(&[&gnews]), &SearchRequest::new("quantum", "science")).await;
        assert!(outcome.articles.is_empty());
        assert_eq!(gnews.calls(), vec!["search:quantum"]);
    }
}
