//! Marginalia Server Library
//!
//! Essay annotation server: teachers attach typed inline comments to
//! character ranges of student essay responses, and the highlight engine
//! partitions the annotated text into renderable segments.
//!
//! # Modules
//!
//! - `highlight`: pure segmentation, selection mapping, and session state
//! - `db`: SQLite persistence for annotations and the type catalog
//! - `routes`: REST surface over the store and the engine

pub mod config;
pub mod db;
pub mod error;
pub mod highlight;
pub mod routes;
pub mod state;

use axum::{routing::get, Router};
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the application router
pub fn app(pool: SqlitePool) -> Router {
    let app_state = AppState::new(pool.clone());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api/v1/health", get(routes::health::health_check))
        .nest("/api/v1/annotations", routes::annotations::router(pool.clone()))
        .nest("/api/v1/annotation-types", routes::annotation_types::router(pool))
        .nest("/api/v1/highlight", routes::highlight::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}
