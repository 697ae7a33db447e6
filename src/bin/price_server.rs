//! Home Price Prediction Service
//!
//! Loads a linear regression artifact plus its column order and serves
//! synchronous price estimates over REST.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use celebface::config::Config;
use celebface::price::rest::{create_price_router, PriceAppState};
use celebface::price::PriceEstimator;

#[tokio::main]
async fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    info!(
        "Starting Home Price Prediction Service v{}",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::load(Config::default_path()).unwrap_or_else(|e| {
        info!("Using default config ({})", e);
        Config::default()
    });

    // Artifacts load before the listener binds (fail fast).
    let estimator = PriceEstimator::load(
        config.artifacts.price_model_path(),
        config.artifacts.price_columns_path(),
    )
    .context("failed to load price model artifacts")?;
    info!("Price model loaded: {} locations", estimator.locations().len());

    let state = Arc::new(PriceAppState {
        estimator: Arc::new(estimator),
    });
    let router = create_price_router(state);

    let addr = format!("0.0.0.0:{}", config.server.price_port);
    info!("REST API listening on http://{}", addr);
    let listener = TcpListener::bind(&addr).await?;

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown signal received");
        })
        .await?;

    info!("Goodbye!");
    Ok(())
}
