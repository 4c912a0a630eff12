use std::str::FromStr;
use std::time::Duration;

use clap::Args;
use ns_core::config::{
    DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, DEFAULT_GNEWS_BASE_URL, DEFAULT_NEWS_API_BASE_URL,
};
use ns_core::PipelineConfig;

/// Durations such as `10`, `10s`, `1m30s`; a bare number is seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumanDuration(pub Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut total_seconds = 0u64;
        let mut number = String::new();
        let mut seen = false;

        let overflow = || format!("Duration too large: {}", s);

        for c in s.trim().chars() {
            if c.is_ascii_digit() {
                number.push(c);
                continue;
            }
            let value: u64 = number
                .parse()
                .map_err(|_| format!("Expected a number before '{}'", c))?;
            let unit = match c {
                's' => 1,
                'm' => 60,
                'h' => 3600,
                _ => return Err(format!("Invalid duration unit: {}", c)),
            };
            total_seconds = value
                .checked_mul(unit)
                .and_then(|secs| total_seconds.checked_add(secs))
                .ok_or_else(overflow)?;
            number.clear();
            seen = true;
        }

        if !number.is_empty() {
            let value = number
                .parse::<u64>()
                .map_err(|_| "Invalid number in duration".to_string())?;
            total_seconds = total_seconds.checked_add(value).ok_or_else(overflow)?;
            seen = true;
        }
        if !seen {
            return Err("Duration must include a number".to_string());
        }
        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

/// Credentials and tuning shared by every subcommand; each flag falls back to its env var.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(long, env = "GNEWS_API_KEY", hide_env_values = true)]
    pub gnews_api_key: Option<String>,
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    pub news_api_key: Option<String>,
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    pub gemini_model: String,
    /// Request `application/json` replies from Gemini.
    #[arg(long, env = "GEMINI_JSON_MODE")]
    pub gemini_json_mode: bool,
    #[arg(long, env = "GNEWS_BASE_URL", default_value = DEFAULT_GNEWS_BASE_URL)]
    pub gnews_base_url: String,
    #[arg(long, env = "NEWS_API_BASE_URL", default_value = DEFAULT_NEWS_API_BASE_URL)]
    pub news_api_base_url: String,
    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_GEMINI_BASE_URL)]
    pub gemini_base_url: String,
    /// Articles analyzed per request, capped at 6.
    #[arg(long, env = "MAX_ARTICLES", default_value_t = 6)]
    pub max_articles: usize,
    /// Bodies shorter than this are replaced from the source page when possible.
    #[arg(long, env = "ENRICH_MIN_CHARS", default_value_t = 500)]
    pub enrich_min_chars: usize,
    #[arg(long, env = "ENRICH_TIMEOUT_SECS", default_value = "10")]
    pub enrich_timeout: HumanDuration,
    #[arg(long, env = "ENRICH_CONCURRENCY", default_value_t = 6)]
    pub enrich_concurrency: usize,
    #[arg(long, env = "ANALYSIS_CONCURRENCY", default_value_t = 1)]
    pub analysis_concurrency: usize,
}

impl ConfigArgs {
    pub fn into_pipeline_config(self) -> PipelineConfig {
        PipelineConfig {
            gnews_api_key: self.gnews_api_key,
            news_api_key: self.news_api_key,
            gemini_api_key: self.gemini_api_key,
            gemini_model: self.gemini_model,
            gemini_json_mode: self.gemini_json_mode,
            gnews_base_url: self.gnews_base_url,
            news_api_base_url: self.news_api_base_url,
            gemini_base_url: self.gemini_base_url,
            max_articles: self.max_articles,
            enrich_min_chars: self.enrich_min_chars,
            enrich_timeout: self.enrich_timeout.0,
            enrich_concurrency: self.enrich_concurrency,
            analysis_concurrency: self.analysis_concurrency,
            ..PipelineConfig::default()
        }
    }
}
