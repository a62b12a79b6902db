use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use textintel_core::models::task::TaskType;

use crate::pipelines::{PipelineError, TextModels};
use crate::serializers::{
    textintel_qa::QaIn, textintel_rewrite::RewriteIn, textintel_summarize::SummarizeIn,
};

pub const DEFAULT_MAX_LENGTH: u32 = 150;
pub const DEFAULT_MIN_LENGTH: u32 = 25;
pub const LENGTH_LIMIT: u32 = 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Formal,
    Informal,
}

impl Tone {
    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Formal => "formal",
            Tone::Informal => "informal",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("`{0}` must not be empty")]
    Blank(&'static str),

    #[error(
        "need 1 <= min_length <= max_length <= {limit}, got min_length={min} max_length={max}",
        limit = LENGTH_LIMIT
    )]
    Bounds { min: u32, max: u32 },

    #[error("invalid {task} payload: {source}")]
    Payload {
        task: TaskType,
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Summarize {
    pub text: String,
    pub max_length: u32,
    pub min_length: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Qa {
    pub context: String,
    pub question: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Rewrite {
    pub text: String,
    pub tone: Tone,
}

fn required(field: &'static str, value: &str) -> Result<String, RequestError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RequestError::Blank(field));
    }
    Ok(trimmed.to_string())
}

impl TryFrom<SummarizeIn> for Summarize {
    type Error = RequestError;

    fn try_from(inp: SummarizeIn) -> Result<Self, Self::Error> {
        let max = inp.max_length.unwrap_or(DEFAULT_MAX_LENGTH);
        let min = inp.min_length.unwrap_or(DEFAULT_MIN_LENGTH);
        if min == 0 || min > max || max > LENGTH_LIMIT {
            return Err(RequestError::Bounds { min, max });
        }
        Ok(Self {
            text: required("text", &inp.text)?,
            max_length: max,
            min_length: min,
        })
    }
}

impl TryFrom<QaIn> for Qa {
    type Error = RequestError;

    fn try_from(inp: QaIn) -> Result<Self, Self::Error> {
        Ok(Self {
            context: required("context", &inp.context)?,
            question: required("question", &inp.question)?,
        })
    }
}

impl TryFrom<RewriteIn> for Rewrite {
    type Error = RequestError;

    fn try_from(inp: RewriteIn) -> Result<Self, Self::Error> {
        Ok(Self {
            text: required("text", &inp.text)?,
            tone: inp.tone,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TaskRequest {
    Summarize(Summarize),
    Qa(Qa),
    Rewrite(Rewrite),
}

impl TaskRequest {
    /// Validate a raw JSON body for `task`.
    pub fn from_payload(task: TaskType, payload: Value) -> Result<Self, RequestError> {
        let invalid = |source| RequestError::Payload { task, source };
        Ok(match task {
            TaskType::Summarize => {
                let inp: SummarizeIn = serde_json::from_value(payload).map_err(invalid)?;
                TaskRequest::Summarize(inp.try_into()?)
            }
            TaskType::Qa => {
                let inp: QaIn = serde_json::from_value(payload).map_err(invalid)?;
                TaskRequest::Qa(inp.try_into()?)
            }
            TaskType::Rewrite => {
                let inp: RewriteIn = serde_json::from_value(payload).map_err(invalid)?;
                TaskRequest::Rewrite(inp.try_into()?)
            }
        })
    }

    pub fn task(&self) -> TaskType {
        match self {
            TaskRequest::Summarize(_) => TaskType::Summarize,
            TaskRequest::Qa(_) => TaskType::Qa,
            TaskRequest::Rewrite(_) => TaskType::Rewrite,
        }
    }

    /// Normalized parameters; the cache fingerprint and the queued payload.
    pub fn params(&self) -> Value {
        match self {
            TaskRequest::Summarize(s) => json!({
                "text": s.text,
                "max_length": s.max_length,
                "min_length": s.min_length,
            }),
            TaskRequest::Qa(q) => json!({"context": q.context, "question": q.question}),
            TaskRequest::Rewrite(r) => json!({"text": r.text, "tone": r.tone}),
        }
    }

    pub async fn execute(&self, models: &dyn TextModels) -> Result<String, PipelineError> {
        match self {
            TaskRequest::Summarize(s) => {
                models.summarize(&s.text, s.max_length, s.min_length).await
            }
            TaskRequest::Qa(q) => models.answer(&q.context, &q.question).await,
            TaskRequest::Rewrite(r) => models.rewrite(&r.text, r.tone).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarize_defaults_and_trims() {
        let req =
            TaskRequest::from_payload(TaskType::Summarize, json!({"text": "  body \n"})).unwrap();
        assert_eq!(
            req,
            TaskRequest::Summarize(Summarize {
                text: "body".into(),
                max_length: DEFAULT_MAX_LENGTH,
                min_length: DEFAULT_MIN_LENGTH,
            })
        );
        assert_eq!(
            req.params(),
            json!({"text": "body", "max_length": 150, "min_length": 25})
        );
    }

    #[test]
    fn explicit_null_bounds_take_defaults() {
        let req = TaskRequest::from_payload(
            TaskType::Summarize,
            json!({"text": "t", "max_length": null, "min_length": 5}),
        )
        .unwrap();
        let TaskRequest::Summarize(s) = req else { panic!("wrong variant") };
        assert_eq!((s.max_length, s.min_length), (DEFAULT_MAX_LENGTH, 5));
    }

    #[test]
    fn summarize_rejects_bad_bounds() {
        for (min, max) in [(0, 10), (50, 10), (10, LENGTH_LIMIT + 1)] {
            let err = TaskRequest::from_payload(
                TaskType::Summarize,
                json!({"text": "t", "max_length": max, "min_length": min}),
            )
            .unwrap_err();
            assert!(matches!(err, RequestError::Bounds { .. }), "{min}..{max}");
        }
    }

    #[test]
    fn blank_fields_are_rejected() {
        let payload = json!({"context": "c", "question": "  "});
        let err = TaskRequest::from_payload(TaskType::Qa, payload).unwrap_err();
        assert_eq!(err.to_string(), "`question` must not be empty");
    }

    #[test]
    fn unknown_tone_is_a_payload_error() {
        let payload = json!({"text": "t", "tone": "angry"});
        let err = TaskRequest::from_payload(TaskType::Rewrite, payload).unwrap_err();
        assert!(matches!(err, RequestError::Payload { task: TaskType::Rewrite, .. }));
    }

    #[test]
    fn params_round_trip_through_payload() {
        let payload = json!({"text": " hi ", "tone": "informal"});
        let req = TaskRequest::from_payload(TaskType::Rewrite, payload).unwrap();
        let again = TaskRequest::from_payload(TaskType::Rewrite, req.params()).unwrap();
        assert_eq!(req, again);
        assert_eq!(req.params()["tone"], "informal");
    }
}
