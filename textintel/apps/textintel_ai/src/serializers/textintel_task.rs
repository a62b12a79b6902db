use serde::{Deserialize, Serialize};

/// Body of the synchronous endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskOut {
    pub task: String,
    pub cached: bool,
    pub result: String,
}
