use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::Principal;
use super::permissions::ensure_own_status;
use super::validation::validate_id;
use super::{ApiError, ApiResponse, AppState, FeedItemDto};
use crate::domain::validation::REQUIRED;
use crate::domain::{FeedItemId, FieldErrors, IdentityId};

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub owner: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct StatusPayload {
    pub status_text: Option<String>,
}

impl StatusPayload {
    fn required_text(self) -> Result<String, ApiError> {
        self.status_text
            .ok_or_else(|| ApiError::InvalidFields(FieldErrors::single("status_text", REQUIRED)))
    }
}

/// GET /feed/?owner=
pub async fn list_feed(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FeedQuery>,
) -> Result<Json<ApiResponse<Vec<FeedItemDto>>>, ApiError> {
    let items = state
        .feed()
        .list_feed_items(params.owner.map(IdentityId::new))
        .await?;

    Ok(Json(ApiResponse::success(
        items.into_iter().map(FeedItemDto::from).collect(),
    )))
}

/// POST /feed/
/// The owner is always the caller, whatever the body says.
pub async fn create_feed_item(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<StatusPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let owner = principal.require()?.id;
    let Json(payload) = payload?;
    let text = payload.required_text()?;

    let item = state.feed().create_feed_item(owner, &text).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(FeedItemDto::from(item))),
    ))
}

/// GET /feed/{id}/
pub async fn get_feed_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<FeedItemDto>>, ApiError> {
    let id = FeedItemId::new(validate_id(id, "Feed item")?);
    let item = state.feed().get(id).await?;
    Ok(Json(ApiResponse::success(FeedItemDto::from(item))))
}

/// PUT /feed/{id}/
pub async fn replace_feed_item(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
    payload: Result<Json<StatusPayload>, JsonRejection>,
) -> Result<Json<ApiResponse<FeedItemDto>>, ApiError> {
    let id = FeedItemId::new(validate_id(id, "Feed item")?);
    principal.require()?;

    let existing = state.feed().get(id).await?;
    ensure_own_status(&principal, &existing)?;

    let Json(payload) = payload?;
    let text = payload.required_text()?;

    let item = state.feed().update_status(id, &text).await?;
    Ok(Json(ApiResponse::success(FeedItemDto::from(item))))
}

/// PATCH /feed/{id}/
pub async fn update_feed_item(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
    payload: Result<Json<StatusPayload>, JsonRejection>,
) -> Result<Json<ApiResponse<FeedItemDto>>, ApiError> {
    let id = FeedItemId::new(validate_id(id, "Feed item")?);
    principal.require()?;

    let existing = state.feed().get(id).await?;
    ensure_own_status(&principal, &existing)?;

    let Json(payload) = payload?;
    let item = match payload.status_text {
        Some(text) => state.feed().update_status(id, &text).await?,
        None => existing,
    };

    Ok(Json(ApiResponse::success(FeedItemDto::from(item))))
}

/// DELETE /feed/{id}/
pub async fn delete_feed_item(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let id = FeedItemId::new(validate_id(id, "Feed item")?);
    principal.require()?;

    let existing = state.feed().get(id).await?;
    ensure_own_status(&principal, &existing)?;

    state.feed().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
