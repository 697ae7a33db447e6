//! Celebrity Face Classification Service
//!
//! Detects faces with a Haar cascade pair (face + eye gate), extracts
//! raw + wavelet features and classifies them with a pre-trained model,
//! exposed over a small Axum REST API.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use celebface::api::rest::{create_rest_router, AppState};
use celebface::artifacts::ArtifactStore;
use celebface::config::Config;
use celebface::engine::{CascadeModel, FaceDetector};
use celebface::service::ClassifyService;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    info!(
        "Starting Face Classification Service v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Load configuration
    let config = Config::load(Config::default_path()).unwrap_or_else(|e| {
        info!("Using default config ({})", e);
        Config::default()
    });

    info!("Configuration loaded:");
    info!("  REST port: {}", config.server.rest_port);
    info!("  Artifacts dir: {:?}", config.artifacts.dir);
    info!(
        "  Detector: scale_factor={} min_neighbors={} min_eyes={}",
        config.detector.scale_factor, config.detector.min_neighbors, config.detector.min_eyes
    );
    info!(
        "  Wavelet: {} level {}",
        config.wavelet.family, config.wavelet.level
    );

    // Load cascade models
    let face_cascade = CascadeModel::load(config.artifacts.face_cascade_path())
        .context("failed to load face cascade artifact")?;
    let eye_cascade = CascadeModel::load(config.artifacts.eye_cascade_path())
        .context("failed to load eye cascade artifact")?;
    let detector = Arc::new(FaceDetector::new(
        face_cascade,
        eye_cascade,
        config.detector.clone(),
    ));

    // Load classifier artifacts before accepting any request (fail fast).
    let store = Arc::new(ArtifactStore::new(&config.artifacts));
    store
        .load()
        .context("failed to load classifier artifacts")?;

    // Create classify service
    let service = Arc::new(ClassifyService::new(
        detector,
        store,
        &config.wavelet,
    )?);

    let app_state = Arc::new(AppState {
        service,
        start_time: Instant::now(),
    });

    let router = create_rest_router(app_state);

    let addr = format!("0.0.0.0:{}", config.server.rest_port);
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
