use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use textintel_core::store::memory::MemoryStore;
use textintel_core::{AppState, Cfg};

use crate::pipelines::{PipelineError, TextModels};
use crate::tasks::Tone;

/// Deterministic stand-in for the model runtime.
#[derive(Default)]
pub struct FakeModels {
    calls: AtomicUsize,
    fail: bool,
}

impl FakeModels {
    pub fn failing() -> Self {
        Self { calls: AtomicUsize::new(0), fail: true }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn call(&self, task: &'static str, out: String) -> Result<String, PipelineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(PipelineError::Status { task, status: 503, body: "overloaded".into() });
        }
        Ok(out)
    }
}

#[async_trait]
impl TextModels for FakeModels {
    async fn summarize(&self, text: &str, _: u32, _: u32) -> Result<String, PipelineError> {
        self.call("summarization", format!("summary of: {text}"))
    }

    async fn answer(&self, _: &str, question: &str) -> Result<String, PipelineError> {
        self.call("question-answering", format!("answer to: {question}"))
    }

    async fn rewrite(&self, text: &str, tone: Tone) -> Result<String, PipelineError> {
        self.call("text2text-generation", format!("{} {text}", tone.as_str()))
    }
}

pub fn core_state() -> AppState {
    AppState::new(Arc::new(MemoryStore::new()), &Cfg::default())
}
