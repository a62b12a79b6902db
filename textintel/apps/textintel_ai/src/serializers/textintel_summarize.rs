use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SummarizeIn {
    pub text: String,
    #[serde(default)]
    pub max_length: Option<u32>,
    #[serde(default)]
    pub min_length: Option<u32>,
}
