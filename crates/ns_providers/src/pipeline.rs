use std::sync::Arc;

use ns_core::{AnalyzeResponse, Error, InferenceModel, PipelineConfig, ProviderKind, Result, SearchRequest};
use ns_inference::ArticleAnalyzer;
use tracing::{info, instrument};

use crate::assemble::assemble;
use crate::enricher::ContentEnricher;
use crate::fetch::fetch_articles;
use crate::providers::{http_client, placeholder_response, select_providers, ProviderPlan};

pub const NO_ARTICLES_MESSAGE: &str = "No articles found";
pub const MISSING_GEMINI_KEY: &str = "GEMINI_API_KEY not configured";

/// Fetch, enrich, analyze and assemble one request.
pub struct NewsPipeline {
    config: Arc<PipelineConfig>,
    plan: ProviderPlan,
    enricher: ContentEnricher,
    analyzer: Option<ArticleAnalyzer>,
}

impl NewsPipeline {
    pub fn new(
        config: Arc<PipelineConfig>,
        plan: ProviderPlan,
        enricher: ContentEnricher,
        analyzer: Option<ArticleAnalyzer>,
    ) -> Self {
        Self {
            config,
            plan,
            enricher,
            analyzer,
        }
    }

    /// Wires real providers, the page fetcher and the Gemini model from configuration.
    pub fn from_config(config: PipelineConfig) -> Result<Self> {
        let model = ns_inference::create_model(&config)?;
        Self::with_model(config, model)
    }

    /// Like [`NewsPipeline::from_config`] but with an explicit model in place of Gemini.
    pub fn with_model(config: PipelineConfig, model: Option<Arc<dyn InferenceModel>>) -> Result<Self> {
        let client = http_client()?;
        let plan = select_providers(&config, &client);
        let enricher = ContentEnricher::from_config(&config)?;
        let analyzer = model.map(ArticleAnalyzer::new);
        Ok(Self::new(Arc::new(config), plan, enricher, analyzer))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn provider_kinds(&self) -> Vec<ProviderKind> {
        self.plan.kinds()
    }

    pub fn has_analyzer(&self) -> bool {
        self.analyzer.is_some()
    }

    #[instrument(skip(self), fields(query = %request.query, category = %request.category, region = request.region.as_str()))]
    pub async fn run(&self, request: &SearchRequest) -> Result<AnalyzeResponse> {
        let providers = match &self.plan {
            ProviderPlan::Placeholder => {
                info!("Serving sample article");
                return Ok(placeholder_response(&request.category));
            }
            ProviderPlan::Providers(providers) => providers,
        };
        let analyzer = self
            .analyzer
            .as_ref()
            .ok_or_else(|| Error::Config(MISSING_GEMINI_KEY.to_string()))?;

        let outcome = fetch_articles(providers, request).await;
        if outcome.articles.is_empty() {
            info!("No articles from any provider");
            return Ok(AnalyzeResponse::empty(NO_ARTICLES_MESSAGE));
        }

        let mut articles = outcome.articles;
        articles.truncate(self.config.article_limit());
        info!(
            provider = ?outcome.provider,
            broadened = outcome.broadened,
            count = articles.len(),
            "📰 Fetched articles"
        );

        let articles = self.enricher.enrich_all(articles).await;
        let analyses = analyzer
            .analyze_all(&articles, self.config.analysis_concurrency)
            .await;
        let output = assemble(articles, analyses, &request.category);

        info!(count = output.len(), model = analyzer.model_name(), "✅ Analysis complete");
        Ok(AnalyzeResponse::found(output))
    }
}
