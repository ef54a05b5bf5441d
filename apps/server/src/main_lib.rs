use std::sync::Arc;

use anyhow::Context;
use tcsi_core::{CashCollector, CollectorRegistry, PortfolioCollector};
use tcsi_invest_api::{InvestApiClient, InvestApiError, RestClient};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{api::app_router, config::Config};

pub struct AppState {
    pub registry: CollectorRegistry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// Selected with `TCSI_LOG_FORMAT`; anything but `json` means text.
    pub fn from_env() -> Self {
        match std::env::var("TCSI_LOG_FORMAT") {
            Ok(value) if value.trim().eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match LogFormat::from_env() {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init(),
    }
}

/// Connect to the Invest API (validating the token) and wire the collectors.
pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let client = RestClient::connect(config.client_settings())
        .await
        .map_err(|e| {
            let context = setup_error_context(&e);
            anyhow::Error::new(e).context(context)
        })?;
    build_state_with_client(Arc::new(client))
}

fn setup_error_context(err: &InvestApiError) -> &'static str {
    if err.is_unauthorized() {
        "Invest API rejected the access token (check COLLECTOR_TOKEN)"
    } else {
        "Invest API client setup failed"
    }
}

/// Wire the collectors around an already constructed client.
pub fn build_state_with_client(client: Arc<dyn InvestApiClient>) -> anyhow::Result<Arc<AppState>> {
    let mut registry = CollectorRegistry::new();
    registry.register(Arc::new(PortfolioCollector::new(client.clone())?))?;
    registry.register(Arc::new(CashCollector::new(client)?))?;
    tracing::info!(
        "Registered {} collectors exposing {} metrics",
        registry.len(),
        registry.describe().len()
    );

    Ok(Arc::new(AppState { registry }))
}

/// Bind `listen_addr` and serve the router until the process stops.
pub async fn serve(listen_addr: &str, state: Arc<AppState>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", listen_addr))?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app_router(state)).await?;
    Ok(())
}
