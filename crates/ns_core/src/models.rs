use async_trait::async_trait;
use std::fmt;
use crate::Result;

#[async_trait]
pub trait InferenceModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Send a prompt and return the first candidate's text.
    ///
    /// `Ok(None)` means the model answered but produced no candidates.
    async fn generate(&self, prompt: &str) -> Result<Option<String>>;
}
