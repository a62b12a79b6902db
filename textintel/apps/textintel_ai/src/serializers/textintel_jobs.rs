use serde::{Deserialize, Serialize};
use textintel_core::models::job::JobStatus;

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitOut {
    pub job_id: String,
    pub status: JobStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusOut {
    pub job_id: String,
    /// a job status, or "unknown" when no record exists
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResultOut {
    pub job_id: String,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
