use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, Router};
use dotenvy::dotenv;
use textintel_ai::pipelines::hf::{HfCfg, HfPipelines};
use textintel_ai::pipelines::TextModels;
use textintel_ai::AiState;
use textintel_core::{AppState, Cfg};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).compact().init();

    let port: u16 = std::env::var("PORT").ok().and_then(|s| s.parse().ok()).unwrap_or(8000);

    let cfg = Cfg::from_env();
    let core = textintel_core::connect(&cfg)?;
    let models = Arc::new(HfPipelines::new(HfCfg::from_env())?);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("listening on http://{}", addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app(core, models))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;
    Ok(())
}

fn app(core: AppState, models: Arc<dyn TextModels>) -> Router {
    Router::new()
        .merge(textintel_core::urls::router().with_state(core.clone()))
        .merge(textintel_ai::urls::router().with_state(AiState::new(core, models)))
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024))
}
