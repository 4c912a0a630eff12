use serde::{Deserialize, Serialize};

/// Category that, together with [`LATEST_QUERY`], selects the top-headlines endpoint.
pub const GENERAL_CATEGORY: &str = "general";
pub const LATEST_QUERY: &str = "latest";
pub const DEFAULT_LANGUAGE: &str = "en";

/// Text handed to the model when an article carries no usable body.
pub const NO_CONTENT: &str = "No content available";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    #[default]
    Global,
    Indian,
}

impl Region {
    /// Anything that is not recognisably India falls back to `Global`.
    pub fn parse_lossy(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "indian" | "india" | "in" => Region::Indian,
            _ => Region::Global,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Global => "global",
            Region::Indian => "indian",
        }
    }

    /// ISO country filter for providers that accept one.
    pub fn country_code(&self) -> Option<&'static str> {
        match self {
            Region::Global => None,
            Region::Indian => Some("in"),
        }
    }

    /// Keyword used for the single broadened retry, if this region has one.
    pub fn broadened_keyword(&self) -> Option<&'static str> {
        match self {
            Region::Global => None,
            Region::Indian => Some("india"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub category: String,
    pub region: Region,
    pub language: String,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            category: category.into(),
            region: Region::default(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        let language = language.into();
        if !language.trim().is_empty() {
            self.language = language.trim().to_string();
        }
        self
    }

    /// The `general`/`latest` pair is a request for top stories rather than a keyword search.
    pub fn wants_headlines(&self) -> bool {
        self.category == GENERAL_CATEGORY && self.query == LATEST_QUERY
    }
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self::new(LATEST_QUERY, GENERAL_CATEGORY)
    }
}

/// An article as a provider returned it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawArticle {
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub url: String,
    pub source_name: String,
    pub published_at: Option<String>,
}

impl RawArticle {
    pub fn description(&self) -> Option<&str> {
        non_blank(self.description.as_deref())
    }

    pub fn content(&self) -> Option<&str> {
        non_blank(self.content.as_deref())
    }

    /// Body length in characters; a missing body counts as zero.
    pub fn content_chars(&self) -> usize {
        self.content.as_deref().map_or(0, |c| c.chars().count())
    }

    /// Text submitted for analysis: description, else body, else a fixed marker.
    pub fn analysis_text(&self) -> &str {
        self.description()
            .or_else(|| self.content())
            .unwrap_or(NO_CONTENT)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    /// Always within `0..=100`.
    pub credibility: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub name: String,
    pub url: String,
}

/// Client-facing article record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputArticle {
    pub title: String,
    pub content: String,
    pub summary: String,
    pub credibility: u8,
    pub sources: Vec<SourceRef>,
    pub category: String,
    #[serde(default)]
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub articles: Vec<OutputArticle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AnalyzeResponse {
    pub fn found(articles: Vec<OutputArticle>) -> Self {
        Self { articles, message: None }
    }

    pub fn empty(message: impl Into<String>) -> Self {
        Self {
            articles: Vec::new(),
            message: Some(message.into()),
        }
    }
}
