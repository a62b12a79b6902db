use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct QaIn {
    pub context: String,
    pub question: String,
}
