use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::{rewrite_prompt, PipelineError, TextModels};
use crate::tasks::Tone;

/// Generation cap for tone rewrites.
const REWRITE_MAX_LENGTH: u32 = 200;

#[derive(Clone, Debug)]
pub struct HfCfg {
    pub api_url: String,
    pub token: Option<String>,
    pub summarize_model: String,
    pub qa_model: String,
    pub rewrite_model: String,
    pub timeout: Duration,
}

impl HfCfg {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(url) = std::env::var("HF_API_URL") {
            cfg.api_url = url;
        }
        cfg.token = std::env::var("HF_API_TOKEN").ok().filter(|t| !t.is_empty());
        if let Ok(model) = std::env::var("SUMMARIZE_MODEL") {
            cfg.summarize_model = model;
        }
        if let Ok(model) = std::env::var("QA_MODEL") {
            cfg.qa_model = model;
        }
        if let Ok(model) = std::env::var("REWRITE_MODEL") {
            cfg.rewrite_model = model;
        }
        let timeout_secs = std::env::var("HF_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        cfg.timeout = Duration::from_secs(timeout_secs);
        cfg
    }
}

impl Default for HfCfg {
    fn default() -> Self {
        Self {
            api_url: "https://router.huggingface.co/hf-inference".into(),
            token: None,
            summarize_model: "sshleifer/distilbart-cnn-12-6".into(),
            qa_model: "distilbert-base-cased-distilled-squad".into(),
            rewrite_model: "google/flan-t5-small".into(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Endpoint for one task, built on first use.
#[derive(Debug)]
struct Pipeline {
    task: &'static str,
    endpoint: String,
}

pub struct HfPipelines {
    cfg: HfCfg,
    client: Client,
    summarizer: OnceLock<Pipeline>,
    answerer: OnceLock<Pipeline>,
    rewriter: OnceLock<Pipeline>,
}

#[derive(Deserialize)]
struct SummaryOut {
    summary_text: String,
}

#[derive(Deserialize)]
struct AnswerOut {
    answer: String,
}

#[derive(Deserialize)]
struct GeneratedOut {
    generated_text: String,
}

impl HfPipelines {
    pub fn new(cfg: HfCfg) -> Result<Self, PipelineError> {
        let client = Client::builder().timeout(cfg.timeout).build()?;
        Ok(Self {
            cfg,
            client,
            summarizer: OnceLock::new(),
            answerer: OnceLock::new(),
            rewriter: OnceLock::new(),
        })
    }

    fn pipeline<'a>(
        &self,
        slot: &'a OnceLock<Pipeline>,
        task: &'static str,
        model: &str,
    ) -> &'a Pipeline {
        slot.get_or_init(|| {
            info!(task, model, "loading pipeline");
            Pipeline {
                task,
                endpoint: format!("{}/models/{}", self.cfg.api_url.trim_end_matches('/'), model),
            }
        })
    }

    async fn infer<T: DeserializeOwned>(
        &self,
        pipe: &Pipeline,
        body: Value,
    ) -> Result<T, PipelineError> {
        let mut req = self.client.post(&pipe.endpoint).json(&body);
        if let Some(token) = &self.cfg.token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await?;
        let status = resp.status();
        debug!(task = pipe.task, status = status.as_u16(), "inference response");
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PipelineError::Status {
                task: pipe.task,
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp.json::<T>().await?)
    }
}

#[async_trait]
impl TextModels for HfPipelines {
    async fn summarize(
        &self,
        text: &str,
        max_length: u32,
        min_length: u32,
    ) -> Result<String, PipelineError> {
        let pipe = self.pipeline(&self.summarizer, "summarization", &self.cfg.summarize_model);
        let body = json!({
            "inputs": text,
            "parameters": {"max_length": max_length, "min_length": min_length, "truncation": true},
            "options": {"wait_for_model": true},
        });
        let out: Vec<SummaryOut> = self.infer(pipe, body).await?;
        out.into_iter()
            .next()
            .map(|o| o.summary_text.trim().to_string())
            .ok_or(PipelineError::EmptyOutput(pipe.task))
    }

    async fn answer(&self, context: &str, question: &str) -> Result<String, PipelineError> {
        let pipe = self.pipeline(&self.answerer, "question-answering", &self.cfg.qa_model);
        let body = json!({
            "inputs": {"question": question, "context": context},
            "options": {"wait_for_model": true},
        });
        let out: AnswerOut = self.infer(pipe, body).await?;
        Ok(out.answer)
    }

    async fn rewrite(&self, text: &str, tone: Tone) -> Result<String, PipelineError> {
        let pipe = self.pipeline(&self.rewriter, "text2text-generation", &self.cfg.rewrite_model);
        let body = json!({
            "inputs": rewrite_prompt(text, tone),
            "parameters": {"max_length": REWRITE_MAX_LENGTH},
            "options": {"wait_for_model": true},
        });
        let out: Vec<GeneratedOut> = self.infer(pipe, body).await?;
        out.into_iter()
            .next()
            .map(|o| o.generated_text.trim().to_string())
            .ok_or(PipelineError::EmptyOutput(pipe.task))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn pipelines(url: String, token: Option<&str>) -> HfPipelines {
        HfPipelines::new(HfCfg {
            api_url: url,
            token: token.map(String::from),
            ..HfCfg::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn summarize_trims_and_forwards_bounds() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/sshleifer/distilbart-cnn-12-6")
            .match_body(Matcher::PartialJson(json!({
                "inputs": "long text",
                "parameters": {"max_length": 60, "min_length": 10},
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"summary_text": "  short text \n"}]"#)
            .expect(2)
            .create_async()
            .await;

        let models = pipelines(server.url(), None);
        assert_eq!(models.summarize("long text", 60, 10).await.unwrap(), "short text");
        // handle is reused on the second call
        assert_eq!(models.summarize("long text", 60, 10).await.unwrap(), "short text");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn answer_sends_question_and_context() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/distilbert-base-cased-distilled-squad")
            .match_header("authorization", "Bearer hf_test")
            .match_body(Matcher::PartialJson(json!({
                "inputs": {"question": "Who?", "context": "Ada wrote it."},
            })))
            .with_status(200)
            .with_body(r#"{"answer": "Ada", "score": 0.98, "start": 0, "end": 3}"#)
            .create_async()
            .await;

        let models = pipelines(server.url(), Some("hf_test"));
        assert_eq!(models.answer("Ada wrote it.", "Who?").await.unwrap(), "Ada");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rewrite_uses_tone_prompt() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/google/flan-t5-small")
            .match_body(Matcher::PartialJson(json!({
                "inputs": "Rewrite the following text in a formal tone:\nhey there",
                "parameters": {"max_length": 200},
            })))
            .with_status(200)
            .with_body(r#"[{"generated_text": "Good day. "}]"#)
            .create_async()
            .await;

        let models = pipelines(server.url(), None);
        assert_eq!(models.rewrite("hey there", Tone::Formal).await.unwrap(), "Good day.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/google/flan-t5-small")
            .with_status(503)
            .with_body("model is loading")
            .create_async()
            .await;

        let models = pipelines(server.url(), None);
        let err = models.rewrite("hi", Tone::Informal).await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Status { status: 503, ref body, .. } if body == "model is loading"
        ));
    }

    #[tokio::test]
    async fn empty_output_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/sshleifer/distilbart-cnn-12-6")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let models = pipelines(server.url(), None);
        let err = models.summarize("text", 150, 25).await.unwrap_err();
        assert!(matches!(err, PipelineError::EmptyOutput("summarization")));
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let models = pipelines("http://localhost:9/".into(), None);
        let pipe = models.pipeline(&models.answerer, "question-answering", "m");
        assert_eq!(pipe.endpoint, "http://localhost:9/models/m");
    }
}
