use std::{net::SocketAddr, sync::Arc};

use anyhow::{bail, Context};
use axum::http::{header, HeaderName, HeaderValue, Method};
use tokio::signal;
use tower_http::cors::{AllowHeaders, CorsLayer};
use tracing::{error, info, warn};

use chemistry_cms as api;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = api::config::load_config().context("failed to load configuration")?;
    api::config::init_tracing(cfg.log_level(), cfg.log_json);

    let db_pool = api::db::establish_connection_from_app_config(&cfg).await?;
    if cfg.auto_migrate {
        api::db::run_migrations(&db_pool).await.map_err(|e| {
            error!("Failed running migrations: {}", e);
            e
        })?;
    }

    let image_store = Arc::new(api::services::images::FileSystemImageStore::new(
        cfg.upload_dir.clone(),
    ));
    let app_state = api::AppState::new(Arc::new(db_pool), cfg.clone(), image_store);

    let app = api::build_router(app_state).layer(cors_layer(&cfg)?);

    let addr = SocketAddr::new(
        cfg.host.parse().context("invalid host address")?,
        cfg.port,
    );
    info!("chemistry-cms listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn cors_layer(cfg: &api::config::AppConfig) -> anyhow::Result<CorsLayer> {
    let configured_origins: Option<Vec<HeaderValue>> = cfg
        .cors_allowed_origins
        .as_ref()
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .filter_map(|origin| HeaderValue::from_str(origin).ok())
                .collect::<Vec<_>>()
        })
        .filter(|origins| !origins.is_empty());

    if let Some(origins) = configured_origins {
        return Ok(CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers(AllowHeaders::mirror_request())
            .expose_headers(exposed_headers())
            .allow_credentials(cfg.cors_allow_credentials));
    }
    if cfg.should_allow_permissive_cors() {
        info!("Using permissive CORS because explicit origins were not configured");
        return Ok(CorsLayer::permissive());
    }
    bail!("Missing CORS configuration: set APP__CORS_ALLOWED_ORIGINS or APP__CORS_ALLOW_ANY_ORIGIN=true")
}

// Paging and alert headers the admin UI reads.
fn exposed_headers() -> Vec<HeaderName> {
    vec![
        header::LINK,
        HeaderName::from_static(api::handlers::common::TOTAL_COUNT_HEADER),
        HeaderName::from_static(api::handlers::common::ALERT_HEADER),
        HeaderName::from_static(api::errors::ERROR_HEADER),
        HeaderName::from_static(api::errors::PARAMS_HEADER),
    ]
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
