pub mod textintel_jobs;
pub mod textintel_qa;
pub mod textintel_rewrite;
pub mod textintel_summarize;
pub mod textintel_task;
