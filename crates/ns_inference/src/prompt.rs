use ns_core::RawArticle;

/// Builds the fixed analysis prompt for one article.
pub fn build_prompt(article: &RawArticle) -> String {
    format!(
        r#"Analyze this news article and provide:
1. A concise 2-3 sentence summary
2. A credibility score from 0-100 based on:
   - Source reliability ({source})
   - Content quality and factual tone
   - Presence of citations or verifiable claims

Article Title: {title}
Source: {source}
Content: {content}

Respond in JSON format:
{{
  "summary": "your summary here",
  "credibility": 85,
  "reasoning": "brief explanation"
}}"#,
        source = article.source_name,
        title = article.title,
        content = article.analysis_text(),
    )
}
