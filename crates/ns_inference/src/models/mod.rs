use std::sync::Arc;

use ns_core::{InferenceModel, PipelineConfig, Result};
use reqwest::Client;
use tracing::info;

pub mod dummy;
pub mod gemini;

pub use dummy::DummyModel;
pub use gemini::GeminiModel;

/// Builds the configured model; `None` when no Gemini credential is set.
pub fn create_model(config: &PipelineConfig) -> Result<Option<Arc<dyn InferenceModel>>> {
    let Some(api_key) = config.gemini_key() else {
        return Ok(None);
    };
    let client = Client::builder().build()?;
    info!(model = %config.gemini_model, json_mode = config.gemini_json_mode, "Using Gemini model");
    Ok(Some(Arc::new(GeminiModel::new(client, api_key, config))))
}
