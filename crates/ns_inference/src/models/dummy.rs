use std::fmt;

use async_trait::async_trait;
use ns_core::{InferenceModel, Result};
use serde_json::json;

const SUMMARY_WORDS: usize = 20;
const CREDIBILITY: u8 = 50;

/// Offline model: echoes the first words of the prompt's content line as the summary.
pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InferenceModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn generate(&self, prompt: &str) -> Result<Option<String>> {
        let content = prompt
            .lines()
            .find_map(|line| line.strip_prefix("Content: "))
            .unwrap_or_default();
        let summary = content
            .split_whitespace()
            .take(SUMMARY_WORDS)
            .collect::<Vec<_>>()
            .join(" ");
        let reply = json!({
            "summary": summary,
            "credibility": CREDIBILITY,
            "reasoning": "offline model",
        });
        Ok(Some(format!("Analysis:\n{}", reply)))
    }
}
