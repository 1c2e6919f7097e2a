use axum::{
    Json,
    extract::{FromRequestParts, Path},
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::AppError;

pub mod news;
pub mod notes;
pub mod users;

/// `302 Found` to `location`.
pub fn found(location: impl Into<String>) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.into())]).into_response()
}

/// `200 OK` with `page` as the JSON body.
pub fn render<T: Serialize>(page: T) -> Response {
    (StatusCode::OK, Json(page)).into_response()
}

/// Numeric id taken from the path. A segment that is not an integer names no
/// record, so it answers 404 like a missing one.
pub struct PathId(pub i64);

impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<i64>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(PathId(id)),
            Err(rejection) => {
                tracing::debug!(%rejection, "non-numeric id in path");
                Err(AppError::NotFound)
            }
        }
    }
}
