pub mod pipelines;
pub mod serializers;
pub mod tasks;
pub mod urls;
pub mod views;
pub mod worker;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use textintel_core::AppState;

use crate::pipelines::TextModels;

#[derive(Clone)]
pub struct AiState {
    pub core: AppState,
    pub models: Arc<dyn TextModels>,
}

impl AiState {
    pub fn new(core: AppState, models: Arc<dyn TextModels>) -> Self {
        Self { core, models }
    }
}
