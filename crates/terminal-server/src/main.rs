mod config;
mod wiring;

use std::error::Error;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::Config::from_env()?;
    let state = wiring::build_state(&config);
    let listener = TcpListener::bind(config.listen_addr).await?;

    info!(
        addr = %listener.local_addr()?,
        tick_interval_ms = config.tick_interval.as_millis() as u64,
        ticks_per_run = config.ticks_per_run,
        relaunch_policy = config.relaunch_policy.as_str(),
        seeded = config.price_seed.is_some(),
        "trading terminal listening"
    );

    axum::serve(listener, wiring::build_app(state)).await?;
    Ok(())
}
