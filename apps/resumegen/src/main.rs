use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use resumegen::config::Config;
use resumegen::generation::Generator;
use resumegen::pdf;
use resumegen::render::Renderer;
use resumegen::routes::build_router;
use resumegen::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails only on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let level = &config.rust_log;
            EnvFilter::new(format!(
                "{}={level},{}={level},tower_http={level}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_CRATE_NAME")
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Generator API v{}", env!("CARGO_PKG_VERSION"));

    // Missing templates abort startup rather than failing the first request
    let renderer = Renderer::from_dir(&config.template_dir)
        .context("failed to load document templates")?;
    info!("Templates loaded from {}", config.template_dir.display());

    std::fs::create_dir_all(&config.scratch_dir).with_context(|| {
        format!(
            "failed to create scratch directory {}",
            config.scratch_dir.display()
        )
    })?;

    let converter = pdf::from_config(&config.pdf_backend());
    info!("PDF backend: {}", converter.backend_name());
    if let Err(e) = converter.health_check().await {
        warn!("PDF backend is not ready: {e}");
    }

    let generator = Generator::new(Arc::new(renderer), converter, &config.scratch_dir);

    // Build app state
    let state = AppState { generator };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
