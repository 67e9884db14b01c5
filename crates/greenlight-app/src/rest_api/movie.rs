use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path,
    },
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json,
};
use greenlight_dal::{
    movie::{validate_movie, Movie, MovieRepository},
    runtime::Runtime,
};
use greenlight_types::Validator;
use http::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::{ApiError, ApiResult},
    repository_from_request,
    rest_api::Envelope,
    state::AppState,
};

repository_from_request!(MovieRepository);

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateMovie {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub runtime: Option<Runtime>,
    pub genres: Option<Vec<String>>,
}

/// Partial update, absent fields keep their stored value.
///
/// When `version` is given it must match the stored version.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateMovie {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub runtime: Option<Runtime>,
    pub genres: Option<Vec<String>>,
    pub version: Option<i32>,
}

impl UpdateMovie {
    fn apply(self, movie: &mut Movie) {
        if let Some(title) = self.title {
            movie.title = title;
        }
        if let Some(year) = self.year {
            movie.year = Some(year);
        }
        if let Some(runtime) = self.runtime {
            movie.runtime = Some(runtime);
        }
        if let Some(genres) = self.genres {
            movie.genres = Some(genres);
        }
    }
}

fn read_id(id: Result<Path<i64>, PathRejection>) -> ApiResult<i64> {
    let Path(id) = id?;
    if id < 1 {
        debug!("Invalid id {id}");
        return Err(ApiError::NotFound);
    }
    Ok(id)
}

fn validate(movie: &Movie) -> ApiResult<()> {
    let mut v = Validator::new();
    validate_movie(&mut v, movie);
    v.into_result()?;
    Ok(())
}

pub async fn create(
    repository: MovieRepository,
    payload: Result<Json<CreateMovie>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(input) = payload?;
    let mut movie = Movie::new(
        input.title.unwrap_or_default(),
        input.year,
        input.runtime,
        input.genres,
    );
    validate(&movie)?;

    repository.insert(&mut movie).await?;
    let location = format!("/v1/movies/{}", movie.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Envelope::new("movie", movie),
    ))
}

pub async fn show(
    id: Result<Path<i64>, PathRejection>,
    repository: MovieRepository,
) -> ApiResult<impl IntoResponse> {
    let id = read_id(id)?;
    let movie = repository.get(id).await?;

    Ok((StatusCode::OK, Envelope::new("movie", movie)))
}

pub async fn update(
    id: Result<Path<i64>, PathRejection>,
    repository: MovieRepository,
    payload: Result<Json<UpdateMovie>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = read_id(id)?;
    let Json(input) = payload?;
    let mut movie = repository.get(id).await?;

    if let Some(expected) = input.version {
        if expected != movie.version {
            debug!(id, expected, actual = movie.version, "Stale version in update");
            return Err(ApiError::EditConflict);
        }
    }
    input.apply(&mut movie);
    validate(&movie)?;

    repository.update(&mut movie).await?;

    Ok((StatusCode::OK, Envelope::new("movie", movie)))
}

pub async fn delete(
    id: Result<Path<i64>, PathRejection>,
    repository: MovieRepository,
) -> ApiResult<impl IntoResponse> {
    let id = read_id(id)?;
    repository.delete(id).await?;

    Ok((
        StatusCode::OK,
        Envelope::new("message", "movie successfully deleted"),
    ))
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new().route("/", post(create)).route(
        "/{id}",
        get(show).patch(update).delete(delete),
    )
}
