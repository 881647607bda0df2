//! Custom Axum extractors
//!
//! Every extractor rejects with [`ApiError::Validation`], so malformed input
//! never reaches a handler body or the repository.

use std::collections::HashMap;

use axum::extract::{FromRequest, FromRequestParts, Json, Path, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::models::{parse_identifier, ValidationError};
use super::error::ApiError;

/// Header carrying the acting principal
pub const USER_ID_HEADER: &str = "x-user-id";

/// Decoded path parameters. A segment that can't be decoded (bad
/// percent-encoding, invalid UTF-8) is reported against `field`.
async fn path_params<S>(
    parts: &mut Parts,
    state: &S,
    field: &'static str,
) -> Result<HashMap<String, String>, ApiError>
where
    S: Send + Sync,
{
    let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
        .await
        .map_err(|rejection| {
            tracing::debug!(%rejection, "path rejected");
            ApiError::Validation(ValidationError::InvalidIdentifier { field })
        })?;
    Ok(params)
}

fn identifier_param(
    params: &HashMap<String, String>,
    key: &str,
    field: &'static str,
) -> Result<Uuid, ApiError> {
    let raw = params.get(key).map(String::as_str).unwrap_or_default();
    Ok(parse_identifier(field, raw)?)
}

/// Post identifier from the `{id}` path segment
pub struct PostId(pub Uuid);

impl<S> FromRequestParts<S> for PostId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let params = path_params(parts, state, "post id").await?;
        Ok(Self(identifier_param(&params, "id", "post id")?))
    }
}

/// Post and comment identifiers from `{id}/comments/{comment_id}`
pub struct CommentPath {
    pub post_id: Uuid,
    pub comment_id: Uuid,
}

impl<S> FromRequestParts<S> for CommentPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let params = path_params(parts, state, "post id").await?;
        Ok(Self {
            post_id: identifier_param(&params, "id", "post id")?,
            comment_id: identifier_param(&params, "comment_id", "comment id")?,
        })
    }
}

/// Acting principal from the `X-User-Id` header.
///
/// The header is trusted as-is; there is no authentication layer.
pub struct Principal(pub Uuid);

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = match parts.headers.get(USER_ID_HEADER) {
            Some(value) => value.to_str().map_err(|_| {
                ApiError::Validation(ValidationError::InvalidIdentifier { field: "user id" })
            })?,
            None => "",
        };

        Ok(Self(parse_identifier("user id", raw.trim())?))
    }
}

/// JSON body whose decode failures are reported as validation errors
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            ApiError::Validation(ValidationError::InvalidBody {
                reason: rejection.body_text(),
            })
        })?;

        Ok(Self(value))
    }
}
