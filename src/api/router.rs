use std::time::Duration;

use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::*;

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(health))
        .route("/api/game", get(get_game))
        .route("/api/games", get(list_games))
        .route("/games", get(list_games_legacy))
        .route("/api/releases", get(list_releases))
        .route("/api/sitemap", get(get_sitemap))
        .route("/api/igdb", get(search_igdb))
        .route("/api/test-env", get(test_env))
        .with_state(state)
        .layer(middleware::from_fn(cache_policy))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
