use std::fmt;

use async_trait::async_trait;
use ns_core::{Error, InferenceModel, PipelineConfig, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

const TEMPERATURE: f64 = 0.3;
const MAX_OUTPUT_TOKENS: u32 = 500;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// `Ok(None)` for an empty candidate list; an error when the first candidate carries no text.
    fn into_text(self) -> Result<Option<String>> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            return Ok(None);
        };
        candidate
            .content
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .map(Some)
            .ok_or_else(|| Error::Inference("Gemini candidate has no text part".to_string()))
    }
}

/// Google Gemini `generateContent` client.
pub struct GeminiModel {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    json_mode: bool,
}

impl fmt::Debug for GeminiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("json_mode", &self.json_mode)
            .finish()
    }
}

impl GeminiModel {
    pub fn new(client: Client, api_key: impl Into<String>, config: &PipelineConfig) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
            model: config.gemini_model.clone(),
            json_mode: config.gemini_json_mode,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn request_body<'a>(&self, prompt: &'a str) -> GenerateRequest<'a> {
        GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
                response_mime_type: self.json_mode.then_some("application/json"),
            },
        }
    }
}

#[async_trait]
impl InferenceModel for GeminiModel {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<Option<String>> {
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&self.request_body(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!(
                "Gemini returned {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let text = response.json::<GenerateResponse>().await?.into_text()?;
        debug!(model = %self.model, chars = text.as_ref().map_or(0, |t| t.len()), "Gemini reply received");
        Ok(text)
    }
}
