use std::sync::Arc;

use futures::stream::{self, StreamExt};
use ns_core::{AnalysisResult, InferenceModel, RawArticle};
use tracing::{debug, instrument, warn};

use crate::parse::parse_reply;
use crate::prompt::build_prompt;
use crate::{DEFAULT_CREDIBILITY, ERROR_CREDIBILITY, NO_SUMMARY, SUMMARY_UNAVAILABLE};

/// Summarizes articles and scores their credibility, never failing per article.
#[derive(Debug, Clone)]
pub struct ArticleAnalyzer {
    model: Arc<dyn InferenceModel>,
}

impl ArticleAnalyzer {
    pub fn new(model: Arc<dyn InferenceModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Analyze every article, at most `concurrency` at a time, in input order.
    pub async fn analyze_all(
        &self,
        articles: &[RawArticle],
        concurrency: usize,
    ) -> Vec<AnalysisResult> {
        // Futures are built up front so the stream holds no borrowing closure.
        let pending: Vec<_> = articles.iter().map(|article| self.analyze(article)).collect();
        stream::iter(pending)
            .buffered(concurrency.max(1))
            .collect()
            .await
    }

    #[instrument(level = "debug", skip_all, fields(title = %article.title, model = %self.model.name()))]
    pub async fn analyze(&self, article: &RawArticle) -> AnalysisResult {
        let prompt = build_prompt(article);

        let reply = match self.model.generate(&prompt).await {
            Ok(Some(reply)) => reply,
            Ok(None) => {
                warn!(title = %article.title, "Model returned no candidates, using fallback");
                return fallback(article, NO_SUMMARY, DEFAULT_CREDIBILITY);
            }
            Err(e) => {
                warn!(title = %article.title, error = %e, "Article analysis failed");
                return fallback(article, SUMMARY_UNAVAILABLE, ERROR_CREDIBILITY);
            }
        };

        match parse_reply(&reply) {
            Some(parsed) => {
                debug!(credibility = parsed.credibility, "Parsed model reply");
                AnalysisResult {
                    summary: parsed
                        .summary
                        .unwrap_or_else(|| description_or(article, NO_SUMMARY)),
                    credibility: parsed.credibility,
                }
            }
            None => {
                warn!(title = %article.title, "Failed to parse model reply, using fallback");
                fallback(article, NO_SUMMARY, DEFAULT_CREDIBILITY)
            }
        }
    }
}

fn fallback(article: &RawArticle, default_summary: &str, credibility: u8) -> AnalysisResult {
    AnalysisResult {
        summary: description_or(article, default_summary),
        credibility,
    }
}

fn description_or(article: &RawArticle, default_summary: &str) -> String {
    article
        .description()
        .unwrap_or(default_summary)
        .to_string()
}
