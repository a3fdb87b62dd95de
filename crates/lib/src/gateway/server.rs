//! Gateway HTTP server: webhook routes, stats API and dashboard on a single port.

use crate::analysis::{build_analyzer, Analyzer, OllamaAnalyzer};
use crate::config::{self, resolve_analyzer_backend, AnalyzerBackend, Config};
use crate::extract::InboundBody;
use crate::gateway::dashboard;
use crate::pipeline;
use crate::platforms::PlatformKind;
use crate::stats::{StatsSnapshot, StatsStore};
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

const SERVICE_NAME: &str = "smartmail";

/// Shared state for the gateway (config, analyzer, stats).
#[derive(Clone)]
pub struct GatewayState {
    pub config: Arc<Config>,
    /// Port actually bound (config or PORT override).
    pub port: u16,
    pub analyzer: Arc<dyn Analyzer>,
    /// Present when the dashboard is enabled; every successful analysis is appended.
    pub stats: Option<Arc<StatsStore>>,
}

impl GatewayState {
    /// Build state from config with the configured analyzer backend.
    pub fn from_config(config: Config) -> Self {
        let analyzer = build_analyzer(&config.analyzer);
        Self::with_analyzer(config, analyzer)
    }

    /// Build state with an explicit analyzer (e.g. a test double).
    pub fn with_analyzer(config: Config, analyzer: Arc<dyn Analyzer>) -> Self {
        let stats = config
            .dashboard
            .enabled
            .then(|| Arc::new(StatsStore::new()));
        let port = config::resolve_port(&config);
        Self {
            config: Arc::new(config),
            port,
            analyzer,
            stats,
        }
    }

    async fn reply(&self, platform: PlatformKind, headers: &HeaderMap, body: Bytes) -> Value {
        let inbound = InboundBody::parse(headers, body).await;
        pipeline::handle(
            &inbound,
            platform,
            self.analyzer.as_ref(),
            self.stats.as_deref(),
        )
        .await
    }
}

/// Routes for the given state. Stats and dashboard routes are only mounted when stats are kept.
pub fn router(state: GatewayState) -> Router {
    let mut app = Router::new()
        .route("/", get(health_http))
        .route("/webhook", post(cliq_webhook))
        .route("/salesiq/webhook", post(salesiq_webhook));
    if let Some(store) = state.stats.clone() {
        let poll_interval_ms = state.config.dashboard.poll_interval_ms;
        let stats_routes: Router<GatewayState> = Router::new()
            .route("/api/stats", get(stats_http))
            .route(
                "/dashboard",
                get(move || async move { Html(dashboard::render(poll_interval_ms)) }),
            )
            .with_state(store);
        app = app.merge(stats_routes);
    }
    app.with_state(state)
}

/// Run the gateway server; binds to config.gateway.bind and the resolved port.
/// Blocks until shutdown (e.g. Ctrl+C).
pub async fn run_gateway(config: Config) -> Result<()> {
    run_with_state(GatewayState::from_config(config)).await
}

/// Run the gateway with prepared state.
pub async fn run_with_state(state: GatewayState) -> Result<()> {
    let bind = state.config.gateway.bind.trim().to_string();
    let port = state.port;
    log::info!(
        "analyzer backend: {}; dashboard {}",
        state.analyzer.name(),
        if state.stats.is_some() { "enabled" } else { "disabled" }
    );

    if resolve_analyzer_backend(&state.config.analyzer) == AnalyzerBackend::Ollama {
        let ollama = OllamaAnalyzer::new(
            state.config.analyzer.base_url.clone(),
            state.config.analyzer.model.as_deref(),
        );
        tokio::spawn(async move {
            match ollama.client().list_models().await {
                Ok(models) => {
                    if models.iter().any(|m| m.name == ollama.model()) {
                        log::info!("ollama model {} available", ollama.model());
                    } else {
                        log::warn!(
                            "ollama model {} not found at {}; analysis requests will fail until it is pulled",
                            ollama.model(),
                            ollama.client().base_url()
                        );
                    }
                }
                Err(e) => {
                    log::warn!("ollama model discovery failed: {}", e);
                }
            }
        });
    }

    let app = router(state);
    let bind_addr = format!("{}:{}", bind, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("gateway listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("gateway server exited")?;
    log::info!("gateway stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received, draining connections");
}

/// POST /webhook — Zoho Cliq slash command (form `arguments`) or JSON body. Always 200.
async fn cliq_webhook(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Value> {
    Json(state.reply(PlatformKind::Cliq, &headers, body).await)
}

/// POST /salesiq/webhook — Zoho SalesIQ bot message. Always 200.
async fn salesiq_webhook(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Value> {
    Json(state.reply(PlatformKind::SalesIq, &headers, body).await)
}

/// GET / returns a simple health JSON (for health checks).
async fn health_http(State(state): State<GatewayState>) -> Json<Value> {
    Json(json!({
        "runtime": "running",
        "service": SERVICE_NAME,
        "port": state.port,
        "analyzer": state.analyzer.name(),
        "dashboard": state.stats.is_some(),
    }))
}

/// GET /api/stats — current stats snapshot.
async fn stats_http(State(store): State<Arc<StatsStore>>) -> Json<StatsSnapshot> {
    Json(store.snapshot().await)
}
