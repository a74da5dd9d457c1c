use tracing::info;

use motortest_common::MemoryStore;
use motortest_web::{WebConfig, WebServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cfg = WebConfig::from_env()?;

    let store = if cfg.seed {
        MemoryStore::seeded()
    } else {
        MemoryStore::empty()
    };

    info!(
        "Starting MotorTest API on http://{}/api (seeded: {})",
        cfg.addr, cfg.seed
    );

    WebServer::new(store).serve(cfg.addr).await
}
