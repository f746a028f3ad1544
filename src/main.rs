use anyhow::Context;
use studysync_a2a::server::{A2AServerBuilder, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env().context("invalid configuration")?;
    let addr = config.socket_addr();

    A2AServerBuilder::from_config(&config)
        .build()
        .serve(addr)
        .await
        .with_context(|| format!("server on {addr} failed"))
}
