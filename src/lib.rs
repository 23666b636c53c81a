//! Chemistry CMS API Library
//!
//! Content backend for the chemistry department website: blog posts,
//! categories, banners and images behind a JSON HTTP API.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod criteria;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod services;
pub mod text;
pub mod tracing;

use axum::{routing::get, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn new(
        db: Arc<DatabaseConnection>,
        config: config::AppConfig,
        image_store: Arc<dyn services::images::ImageStore>,
    ) -> Self {
        let services = handlers::AppServices::new(db.clone(), &config, image_store);
        Self {
            db,
            config,
            services,
        }
    }
}

/// Full application router: `/api`, `/health` and the Swagger UI, with the
/// tracing, compression and request-id layers applied. CORS is left to the
/// caller.
pub fn build_router(state: AppState) -> Router {
    let health = health::health_routes(state.db.clone(), state.config.upload_dir.clone());

    Router::<AppState>::new()
        .route("/", get(|| async { "chemistry-cms up" }))
        .nest("/api", handlers::api_routes(&state.config))
        .with_state(state)
        .nest("/health", health)
        .merge(openapi::swagger_ui())
        .layer(crate::tracing::configure_http_tracing())
        .layer(CompressionLayer::new())
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
}
