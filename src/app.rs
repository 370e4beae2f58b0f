use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use sqlx::sqlite::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::routes;
use crate::uploads::PUBLIC_PREFIX;

/// Shared handler state. The pool is opened once in `main` and handed to
/// every handler through here.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    let uploads = ServeDir::new(&state.config.upload_dir);
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/", get(|| async { "Hello my pelotari friend!" }))
        .route("/health", get(routes::health::health_check))

        // Published canchas
        .route(
            "/canchas",
            get(routes::canchas::list_canchas).post(routes::canchas::create_cancha),
        )
        .route("/canchas/count", get(routes::canchas::count_canchas))
        .route(
            "/canchas/{id}",
            get(routes::canchas::get_cancha).delete(routes::canchas::delete_cancha),
        )

        // Moderation queue
        .route(
            "/pending-canchas",
            get(routes::pending_canchas::list_pending_canchas)
                .post(routes::pending_canchas::create_pending_cancha),
        )
        .route(
            "/pending-canchas/count",
            get(routes::pending_canchas::count_pending_canchas),
        )
        .route(
            "/pending-canchas/{id}",
            put(routes::pending_canchas::update_pending_cancha)
                .delete(routes::pending_canchas::delete_pending_cancha),
        )
        .route(
            "/pending-canchas/approve-cancha/{id}",
            post(routes::pending_canchas::approve_pending_cancha),
        )

        .nest_service(PUBLIC_PREFIX, uploads)
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the frontend at `CLIENT_BASE_URL` plus the local dev server.
fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = [config.client_base_url.as_str(), "http://localhost:3001"]
        .into_iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true)
}
