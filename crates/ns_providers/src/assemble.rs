use ns_core::{AnalysisResult, OutputArticle, RawArticle, SourceRef};

/// Pairs each article with its analysis, keeping fetch order.
pub fn assemble(
    articles: Vec<RawArticle>,
    analyses: Vec<AnalysisResult>,
    category: &str,
) -> Vec<OutputArticle> {
    articles
        .into_iter()
        .zip(analyses)
        .map(|(article, analysis)| to_output(article, analysis, category))
        .collect()
}

pub fn to_output(article: RawArticle, analysis: AnalysisResult, category: &str) -> OutputArticle {
    let content = article
        .content()
        .or_else(|| article.description())
        .unwrap_or_default()
        .to_string();
    OutputArticle {
        title: article.title,
        content,
        summary: analysis.summary,
        credibility: analysis.credibility.min(100),
        sources: vec![SourceRef {
            name: article.source_name,
            url: article.url,
        }],
        category: category.to_string(),
        published_at: article.published_at,
    }
}
