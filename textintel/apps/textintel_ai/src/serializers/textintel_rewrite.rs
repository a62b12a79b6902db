use serde::Deserialize;

use crate::tasks::Tone;

#[derive(Debug, Deserialize)]
pub struct RewriteIn {
    pub text: String,
    pub tone: Tone,
}
