use crate::handlers;
use crate::middleware::require_api_key;
use crate::state::AppState;
use axum::{middleware, routing::get, Router};

/// Creates all API routes with state. Every route below the `/health`
/// check runs behind `require_api_key`, which is a no-op when
/// `ServerConfig.api_key` is unset.
pub fn create_api_routes(state: AppState) -> Router {
    let protected = Router::new()
        .route("/stats", get(handlers::get_stats))
        .route("/queries", get(handlers::get_queries))
        .route("/timeline", get(handlers::get_timeline))
        .route("/blocklist", get(handlers::get_blocklist))
        .route("/cache/stats", get(handlers::get_cache_stats))
        .route("/cache/metrics", get(handlers::get_cache_metrics))
        .route("/hostname", get(handlers::get_hostname))
        .merge(handlers::groups::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(protected)
        .with_state(state)
}
