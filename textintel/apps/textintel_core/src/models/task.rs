use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The pipeline a request is routed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Summarize,
    Qa,
    Rewrite,
}

impl TaskType {
    /// Identifier used in paths, cache keys and queued payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            TaskType::Summarize => "summarize",
            TaskType::Qa => "qa",
            TaskType::Rewrite => "rewrite",
        }
    }

    /// Name reported in the `task` field of synchronous responses.
    pub fn label(self) -> &'static str {
        match self {
            TaskType::Summarize => "summarization",
            TaskType::Qa => "qa",
            TaskType::Rewrite => "rewrite",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported task type: {0}")]
pub struct UnknownTaskType(pub String);

impl FromStr for TaskType {
    type Err = UnknownTaskType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "summarize" => Ok(TaskType::Summarize),
            "qa" => Ok(TaskType::Qa),
            "rewrite" => Ok(TaskType::Rewrite),
            other => Err(UnknownTaskType(other.to_string())),
        }
    }
}
