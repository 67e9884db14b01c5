pub mod movie;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{ser::SerializeMap as _, Serialize};
use serde_json::json;

use crate::{error::ApiError, state::AppState};

/// Wraps a response payload in a single key object, e.g. `{"movie": {...}}`.
#[derive(Debug, Clone)]
pub struct Envelope<T> {
    key: &'static str,
    value: T,
}

impl<T> Envelope<T> {
    pub fn new(key: &'static str, value: T) -> Self {
        Envelope { key, value }
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.key, &self.value)?;
        map.end()
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

async fn healthcheck(State(state): State<AppState>) -> impl IntoResponse {
    let config = state.config();
    Json(json!({
        "status": "available",
        "system_info": {
            "environment": config.environment,
            "version": config.version,
        }
    }))
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/healthcheck", get(healthcheck))
        .nest("/v1/movies", movie::router())
        .fallback(not_found)
}
