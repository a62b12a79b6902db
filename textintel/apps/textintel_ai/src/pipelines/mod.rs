pub mod hf;

use async_trait::async_trait;

use crate::tasks::Tone;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("model runtime unreachable: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{task} pipeline returned {status}: {body}")]
    Status {
        task: &'static str,
        status: u16,
        body: String,
    },

    #[error("{0} pipeline returned no output")]
    EmptyOutput(&'static str),
}

#[async_trait]
pub trait TextModels: Send + Sync {
    async fn summarize(
        &self,
        text: &str,
        max_length: u32,
        min_length: u32,
    ) -> Result<String, PipelineError>;

    /// Extractive answer to `question` taken from `context`.
    async fn answer(&self, context: &str, question: &str) -> Result<String, PipelineError>;

    async fn rewrite(&self, text: &str, tone: Tone) -> Result<String, PipelineError>;
}

pub fn rewrite_prompt(text: &str, tone: Tone) -> String {
    format!("Rewrite the following text in a {} tone:\n{text}", tone.as_str())
}
