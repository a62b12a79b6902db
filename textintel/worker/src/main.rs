use std::sync::Arc;

use dotenvy::dotenv;
use textintel_ai::pipelines::hf::{HfCfg, HfPipelines};
use textintel_ai::worker::Worker;
use textintel_core::Cfg;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).compact().init();

    let cfg = Cfg::from_env();
    let core = textintel_core::connect(&cfg)?;
    let models = Arc::new(HfPipelines::new(HfCfg::from_env())?);
    info!(queue = %cfg.queue_name, "consuming jobs");

    Worker::new(core.jobs, core.cache, models, cfg.worker_poll)
        .run(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await;
    Ok(())
}
