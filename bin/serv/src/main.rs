use anyhow::Context;
use axum::{Router, middleware, routing::get};
use sbx_api::{config::ApiConfig, state::ApiState};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment variables
    dotenvy::dotenv().ok();
    let config = ApiConfig::from_env().context("invalid SUGGESTION_* configuration")?;

    sbx_api::tracing::init_tracing(&config.env);

    let metrics_handle = sbx_api::metrics::init_metrics()?;

    let pool = sbx_db::create_pool(&config.db_path, config.db_max_connections).await?;
    sbx_db::migrate(&pool).await?;
    tracing::info!(db_path = %config.db_path.display(), "database ready");

    let state = ApiState::new(&config, pool);

    let cors = sbx_api::middleware::cors::create_cors_layer(config.parsed_allowed_origins());

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let metrics_app = Router::new()
        .route("/metrics", get(sbx_api::metrics::metrics_handler))
        .with_state(metrics_handle);

    let router = match &config.frontend_dist_path {
        Some(dist) => {
            tracing::info!(dist = %dist.display(), "serving frontend");
            sbx_api::router::router_with_frontend(dist)
        }
        None => sbx_api::router::router(),
    };

    let app = metrics_app
        .merge(router.with_state(state))
        .layer(cors)
        .layer(trace_layer)
        .layer(middleware::from_fn(sbx_api::metrics::track_metrics))
        .layer(middleware::from_fn(
            sbx_api::middleware::request_id::request_id_middleware,
        ));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
    }
    tracing::info!("shutting down");
}
