use crate::{dto::QueryResponse, state::AppState};
use axum::{extract::State, Json};
use tracing::{debug, error, instrument};

#[instrument(skip(state), name = "api_get_queries")]
pub async fn get_queries(State(state): State<AppState>) -> Json<Vec<QueryResponse>> {
    debug!("Fetching recent queries");

    match state.get_queries.execute(100).await {
        Ok(queries) => {
            debug!(count = queries.len(), "Recent queries retrieved");
            Json(queries.into_iter().map(QueryResponse::from).collect())
        }
        Err(e) => {
            error!(error = %e, "Failed to retrieve recent queries");
            Json(vec![])
        }
    }
}
