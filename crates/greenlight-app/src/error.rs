use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    response::{IntoResponse, Response},
};
use greenlight_types::ValidationError;
use http::StatusCode;
use tracing::{debug, error};

use crate::rest_api::Envelope;

pub type ApiResult<T, E = ApiError> = std::result::Result<T, E>;

const NOT_FOUND_MESSAGE: &str = "the requested resource could not be found";
const EDIT_CONFLICT_MESSAGE: &str =
    "unable to update the record due to an edit conflict, please try again";
const SERVER_ERROR_MESSAGE: &str =
    "the server encountered a problem and could not process your request";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Resource not found")]
    NotFound,

    #[error("Edit conflict")]
    EditConflict,

    #[error("Database error: {0}")]
    Database(#[source] greenlight_dal::Error),
}

impl From<greenlight_dal::Error> for ApiError {
    fn from(value: greenlight_dal::Error) -> Self {
        match value {
            greenlight_dal::Error::RecordNotFound(what) => {
                debug!("Not found: {what}");
                ApiError::NotFound
            }
            greenlight_dal::Error::EditConflict { .. } => ApiError::EditConflict,
            other => ApiError::Database(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        ApiError::BadRequest(value.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(value: PathRejection) -> Self {
        debug!("Invalid path: {value}");
        ApiError::NotFound
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Envelope::new("error", msg)).into_response()
            }
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Envelope::new("error", errors),
            )
                .into_response(),
            ApiError::NotFound => {
                (StatusCode::NOT_FOUND, Envelope::new("error", NOT_FOUND_MESSAGE)).into_response()
            }
            ApiError::EditConflict => (
                StatusCode::CONFLICT,
                Envelope::new("error", EDIT_CONFLICT_MESSAGE),
            )
                .into_response(),
            ApiError::Database(e) => {
                error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Envelope::new("error", SERVER_ERROR_MESSAGE),
                )
                    .into_response()
            }
        }
    }
}
