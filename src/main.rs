// =============================================================================
// FX Signal Board — Main Entry Point
// =============================================================================
//
// Loads configuration, wires the Yahoo provider behind the fetch cache, runs
// one analysis pass so the first page load is warm, then serves the dashboard
// until Ctrl+C.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod error;
mod indicators;
mod market_data;
mod pipeline;
mod report;
mod runtime_config;
mod strategy;
mod types;

use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::market_data::{CachedProvider, YahooClient};
use crate::runtime_config::RuntimeConfig;

const DEFAULT_CONFIG_PATH: &str = "runtime_config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║        FX Signal Board — Starting Up                     ║");
    info!("╚══════════════════════════════════════════════════════════╝");

    let config_path =
        std::env::var("FXSIG_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let mut config = RuntimeConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });

    if !std::path::Path::new(&config_path).exists() {
        if let Err(e) = config.save(&config_path) {
            warn!(error = %e, path = %config_path, "Could not write config template");
        }
    }

    if let Ok(syms) = std::env::var("FXSIG_SYMBOLS") {
        config.apply_symbol_override(&syms);
    }
    if let Ok(addr) = std::env::var("FXSIG_BIND_ADDR") {
        config.bind_addr = addr;
    }

    info!(
        symbols = ?config.symbols,
        lookback_days = config.lookback_days,
        interval = %config.bar_interval,
        cache_ttl_secs = config.cache_ttl_secs,
        "Configured currency pairs"
    );

    // ── 2. Market data provider ──────────────────────────────────────────
    let yahoo = YahooClient::new(
        config.lookback_days,
        config.bar_interval.clone(),
        config.request_timeout(),
    )?
    .with_base_url(config.provider_base_url.clone());
    let provider = Arc::new(CachedProvider::new(yahoo, config.cache_ttl()));

    // ── 3. Shared state & initial pass ───────────────────────────────────
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config, provider));

    let first = state.recompute().await;
    let actionable = first
        .reports
        .iter()
        .filter_map(|r| r.signal_value())
        .filter(|s| s.is_actionable())
        .count();
    info!(
        pairs = first.reports.len(),
        actionable,
        "Initial analysis pass complete"
    );

    // ── 4. API server ────────────────────────────────────────────────────
    let app = api::rest::router(state.clone());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind dashboard server on {bind_addr}"))?;
    info!(addr = %bind_addr, "Dashboard listening. Press Ctrl+C to stop.");

    // ── 5. Graceful shutdown ─────────────────────────────────────────────
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
            warn!("Shutdown signal received — stopping gracefully");
        })
        .await;

    if let Err(e) = served {
        error!(error = %e, "Dashboard server failed");
        return Err(e.into());
    }

    info!("FX Signal Board shut down complete.");
    Ok(())
}
