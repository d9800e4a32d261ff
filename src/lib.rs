use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod models;
pub mod progression;
pub mod store;

use config::Config;
use store::ProgressStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProgressStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn ProgressStore>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = std::iter::once(&config.frontend_url)
        .chain(config.cors_extra_origins.iter())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(hv) => Some(hv),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

pub fn app(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz));

    let engine_routes = Router::new()
        .route("/api/levels/:total_xp", get(handlers::levels::get_level))
        .route("/api/xp/workout", post(handlers::levels::workout_xp))
        .route("/api/streaks", post(handlers::metrics::get_streak))
        .route("/api/stats", post(handlers::metrics::get_stats))
        .route("/api/overload", post(handlers::metrics::suggest_overload));

    let user_routes = Router::new()
        .route(
            "/api/users/:user_id/progress",
            get(handlers::levels::get_progress),
        )
        .route("/api/users/:user_id/xp", post(handlers::levels::award_xp))
        // Achievements
        .route(
            "/api/users/:user_id/achievements",
            get(handlers::achievements::list_achievements),
        )
        .route(
            "/api/users/:user_id/achievements/check",
            post(handlers::achievements::check),
        )
        // Challenges
        .route(
            "/api/users/:user_id/challenges",
            get(handlers::challenges::list_challenges),
        )
        .route(
            "/api/users/:user_id/challenges/progress",
            post(handlers::challenges::update_progress),
        );

    Router::new()
        .merge(public_routes)
        .merge(engine_routes)
        .merge(user_routes)
        .layer(cors_layer(&state.config))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
