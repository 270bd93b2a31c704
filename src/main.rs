use anyhow::Context;
use axum::{routing::get, Router};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, warn};

use petsit_rs::{
    create_app, handlers::metrics_handler, init_observability, observability::Metrics,
    repositories::HttpBookingRepository, services::BookingService, shutdown_observability, Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_environment().context("failed to load configuration")?;

    init_observability(&config.observability).context("failed to initialize observability")?;

    info!(
        "Starting {} v{}",
        config.observability.service_name, config.observability.service_version
    );
    info!("Booking backend: {}", config.backend.backend_base_url);

    let metrics = Arc::new(Metrics::new()?);

    let repository = HttpBookingRepository::new(
        config.backend.backend_base_url.clone(),
        config.backend.timeout(),
        config.backend.backend_api_token.clone(),
    )
    .context("failed to build booking backend client")?
    .with_metrics(metrics.clone());

    let booking_service = Arc::new(BookingService::new_with_metrics(
        Arc::new(repository),
        metrics.clone(),
    ));

    let app = create_app(metrics.clone(), booking_service, &config.server);

    let addr = SocketAddr::new(
        config
            .server
            .host
            .parse()
            .with_context(|| format!("invalid host {}", config.server.host))?,
        config.server.port,
    );
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("Server listening on {}", addr);

    // Dedicated scrape port; /metrics stays on the main listener as well
    if config.observability.metrics_port != config.server.port {
        let metrics_addr = SocketAddr::new(addr.ip(), config.observability.metrics_port);
        let metrics_listener = TcpListener::bind(metrics_addr)
            .await
            .with_context(|| format!("failed to bind metrics listener {}", metrics_addr))?;
        let metrics_app = Router::new()
            .route("/metrics", get(metrics_handler))
            .with_state(metrics);

        info!("Metrics listening on {}", metrics_addr);
        tokio::spawn(async move {
            if let Err(e) = axum::serve(metrics_listener, metrics_app).await {
                warn!("Metrics listener stopped: {}", e);
            }
        });
    }

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for shutdown signal: {}", e);
        }
        info!("Shutdown signal received");
        shutdown_observability().await;
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
