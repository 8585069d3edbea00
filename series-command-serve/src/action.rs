//! Request handlers: decode, validate, run the interactor, map the outcome.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use series_common::{models::SeriesId, repository::Store};
use series_usecase::{CreateReviewInput, CreateSeriesInput};

use crate::{response::ApiError, Interactors};

const INVALID_SERIES_ID: &str = "invalid or missing series id";
const INVALID_QUERY: &str = "invalid or missing query";

fn validate<T>(input: &T) -> Result<(), ApiError>
where
    T: garde::Validate,
    T::Context: Default,
{
    input.validate().map_err(|report| {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            report
                .iter()
                .map(|(path, error)| format!("{}: {}", path, error)),
        )
    })
}

pub async fn create_series<S: Store>(
    Extension(interactors): Extension<Arc<Interactors<S>>>,
    body: Result<Json<CreateSeriesInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = body.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    validate(&input)?;

    let output = interactors
        .create_series
        .execute(input)
        .await
        .map_err(ApiError::from_interactor)?;

    Ok((StatusCode::CREATED, Json(output)))
}

#[derive(Debug, serde::Deserialize)]
pub struct TitleQuery {
    q: String,
}

pub async fn find_series_by_title<S: Store>(
    Extension(interactors): Extension<Arc<Interactors<S>>>,
    query: Result<Query<TitleQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(TitleQuery { q }) = query.map_err(|_| ApiError::bad_request(INVALID_QUERY))?;

    let output = interactors
        .find_series_by_title
        .execute(&q)
        .await
        .map_err(ApiError::from_interactor)?;

    Ok(Json(output))
}

pub async fn find_series_by_id<S: Store>(
    Extension(interactors): Extension<Arc<Interactors<S>>>,
    id: Result<Path<SeriesId>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = id.map_err(|_| ApiError::bad_request(INVALID_SERIES_ID))?;

    let output = interactors
        .find_series_by_id
        .execute(id)
        .await
        .map_err(ApiError::from_lookup)?;

    Ok(Json(output))
}

pub async fn find_reviews_by_series<S: Store>(
    Extension(interactors): Extension<Arc<Interactors<S>>>,
    id: Result<Path<SeriesId>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = id.map_err(|_| ApiError::bad_request(INVALID_SERIES_ID))?;

    let output = interactors
        .find_reviews_by_series
        .execute(id)
        .await
        .map_err(ApiError::from_lookup)?;

    Ok(Json(output))
}

pub async fn create_review<S: Store>(
    Extension(interactors): Extension<Arc<Interactors<S>>>,
    body: Result<Json<CreateReviewInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = body.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    validate(&input)?;

    let output = interactors
        .create_review
        .execute(input)
        .await
        .map_err(ApiError::from_interactor)?;

    Ok((StatusCode::CREATED, Json(output)))
}
