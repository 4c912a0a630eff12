use axum::{body::Bytes, extract::State, response::IntoResponse, Json};
use ns_core::{
    types::{GENERAL_CATEGORY, LATEST_QUERY},
    AnalyzeResponse, Region, SearchRequest,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::{ApiError, AppState};

/// Body of `POST /api/analyze-news`; every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeNewsRequest {
    pub query: Option<String>,
    pub category: Option<String>,
    pub region: Option<String>,
    pub language: Option<String>,
}

impl AnalyzeNewsRequest {
    /// An empty body means "latest general headlines".
    pub fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e)))
    }

    pub fn into_search_request(self) -> SearchRequest {
        let query = or_default(self.query, LATEST_QUERY);
        let category = or_default(self.category, GENERAL_CATEGORY);
        let region = self
            .region
            .as_deref()
            .map(Region::parse_lossy)
            .unwrap_or_default();
        SearchRequest::new(query, category)
            .with_region(region)
            .with_language(self.language.unwrap_or_default())
    }
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

pub async fn analyze_news(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let request = AnalyzeNewsRequest::from_body(&body)?.into_search_request();
    info!(
        query = %request.query,
        category = %request.category,
        region = request.region.as_str(),
        language = %request.language,
        "Analyze request"
    );
    let response = state.pipeline.run(&request).await?;
    Ok(Json(response))
}

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "providers": state.pipeline.provider_kinds(),
        "analyzer": state.pipeline.has_analyzer(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_app;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use ns_core::{Error, NewsProvider, PipelineConfig, ProviderKind, RawArticle, Result};
    use ns_inference::{models::DummyModel, ArticleAnalyzer};
    use ns_providers::{ContentEnricher, NewsPipeline, PageFetcher, ProviderPlan};
    use serde_json::Value;
    use std::time::Duration;
    use tower::ServiceExt;

    struct CannedProvider;

    #[async_trait]
    impl NewsProvider for CannedProvider {
        fn kind(&self) -> ProviderKind {
            ProviderKind::NewsApi
        }

        async fn top_headlines(&self, _request: &SearchRequest) -> Result<Vec<RawArticle>> {
            Ok(vec![RawArticle {
                title: "Rates held steady".to_string(),
                description: Some("The central bank kept rates unchanged.".to_string()),
                content: Some("The central bank kept rates unchanged on Tuesday.".to_string()),
                url: "https://bank.test/rates".to_string(),
                source_name: "Bank Times".to_string(),
                published_at: Some("2024-03-05T10:00:00Z".to_string()),
            }])
        }

        async fn search(&self, _keyword: &str, _request: &SearchRequest) -> Result<Vec<RawArticle>> {
            Ok(Vec::new())
        }
    }

    /// Answers only the keyword searches it was given and records every call.
    struct RecordingProvider {
        searches: Vec<(&'static str, usize)>,
        calls: std::sync::Mutex<Vec<String>>,
    }

    impl RecordingProvider {
        fn new(searches: Vec<(&'static str, usize)>) -> Arc<Self> {
            Arc::new(Self {
                searches,
                calls: std::sync::Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NewsProvider for RecordingProvider {
        fn kind(&self) -> ProviderKind {
            ProviderKind::GNews
        }

        async fn top_headlines(&self, _request: &SearchRequest) -> Result<Vec<RawArticle>> {
            self.calls.lock().unwrap().push("headlines".to_string());
            Ok(Vec::new())
        }

        async fn search(&self, keyword: &str, _request: &SearchRequest) -> Result<Vec<RawArticle>> {
            self.calls.lock().unwrap().push(format!("search:{}", keyword));
            let count = self
                .searches
                .iter()
                .find(|(k, _)| *k == keyword)
                .map_or(0, |(_, n)| *n);
            Ok((0..count)
                .map(|i| RawArticle {
                    title: format!("{} story {}", keyword, i),
                    description: Some(format!("About {} #{}", keyword, i)),
                    url: format!("https://desk.test/{}/{}", keyword, i),
                    source_name: "Desk".to_string(),
                    ..Default::default()
                })
                .collect())
        }
    }

    struct OfflinePages;

    #[async_trait]
    impl PageFetcher for OfflinePages {
        async fn fetch_page(&self, _url: &str) -> Result<String> {
            Err(Error::Scraping("offline".to_string()))
        }
    }

    fn app_with(plan: ProviderPlan, analyzer: Option<ArticleAnalyzer>) -> Router {
        let enricher = ContentEnricher::new(Arc::new(OfflinePages), 500, Duration::from_secs(1), 1);
        let pipeline = NewsPipeline::new(Arc::new(PipelineConfig::default()), plan, enricher, analyzer);
        create_app(AppState::new(pipeline))
    }

    fn live_app() -> Router {
        app_with(
            ProviderPlan::Providers(vec![Arc::new(CannedProvider) as Arc<dyn NewsProvider>]),
            Some(ArticleAnalyzer::new(Arc::new(DummyModel::new()))),
        )
    }

    async fn post(app: Router, body: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/analyze-news")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_request_defaults() {
        let request = AnalyzeNewsRequest::from_body(b"").unwrap().into_search_request();
        assert_eq!(request, SearchRequest::default());

        let request = AnalyzeNewsRequest::from_body(br#"{"query": " ", "region": "indian", "language": "hi"}"#)
            .unwrap()
            .into_search_request();
        assert_eq!(request.query, "latest");
        assert_eq!(request.region, Region::Indian);
        assert_eq!(request.language, "hi");
    }

    #[tokio::test]
    async fn test_analyze_returns_articles() {
        let (status, body) = post(live_app(), r#"{"query": "latest", "category": "general"}"#).await;
        assert_eq!(status, StatusCode::OK);
        let articles = body["articles"].as_array().unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0]["title"], "Rates held steady");
        assert_eq!(articles[0]["credibility"], 50);
        assert_eq!(articles[0]["publishedAt"], "2024-03-05T10:00:00Z");
        assert_eq!(articles[0]["sources"][0]["name"], "Bank Times");
        assert!(body.get("message").is_none());
    }

    #[tokio::test]
    async fn test_analyze_nothing_found() {
        let (status, body) = post(live_app(), r#"{"query": "volcano"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["articles"], json!([]));
        assert_eq!(body["message"], "No articles found");
    }

    #[tokio::test]
    async fn test_indian_region_broadens_to_india() {
        let provider = RecordingProvider::new(vec![("india", 3)]);
        let app = app_with(
            ProviderPlan::Providers(vec![provider.clone() as Arc<dyn NewsProvider>]),
            Some(ArticleAnalyzer::new(Arc::new(DummyModel::new()))),
        );
        let (status, body) = post(app, r#"{"query": "quantum", "region": "indian"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["articles"].as_array().unwrap().len(), 3);
        assert_eq!(body["articles"][0]["title"], "india story 0");
        assert_eq!(body["articles"][0]["category"], "general");
        assert!(body.get("message").is_none());
        assert_eq!(provider.calls(), vec!["search:quantum", "search:india"]);
    }

    #[tokio::test]
    async fn test_latest_general_body_uses_headlines() {
        let provider = RecordingProvider::new(vec![("latest", 2)]);
        let app = app_with(
            ProviderPlan::Providers(vec![provider.clone() as Arc<dyn NewsProvider>]),
            Some(ArticleAnalyzer::new(Arc::new(DummyModel::new()))),
        );
        let (status, body) = post(app, r#"{"query": "latest", "category": "general"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "No articles found");
        assert_eq!(provider.calls(), vec!["headlines"]);
    }

    #[tokio::test]
    async fn test_placeholder_plan() {
        let (status, body) = post(app_with(ProviderPlan::Placeholder, None), "{}").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["articles"][0]["credibility"], 75);
        assert!(body["message"].as_str().unwrap().contains("sample data"));
    }

    #[tokio::test]
    async fn test_missing_gemini_key_is_500() {
        let app = app_with(ProviderPlan::Providers(vec![Arc::new(CannedProvider) as Arc<dyn NewsProvider>]), None);
        let (status, body) = post(app, "{}").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "GEMINI_API_KEY not configured");
    }

    #[tokio::test]
    async fn test_malformed_body_is_400() {
        let (status, body) = post(live_app(), "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
    }

    #[tokio::test]
    async fn test_health() {
        let response = live_app()
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"status": "ok", "providers": ["newsapi"], "analyzer": true}));
    }
}
