use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::Principal;
use super::permissions::ensure_own_profile;
use super::validation::{
    check_email, check_password, check_profile_name, validate_id, validate_search_query,
};
use super::{ApiError, ApiResponse, AppState, ProfileDto};
use crate::domain::{FieldErrors, IdentityChanges, IdentityId};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProfilePayload {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

impl ProfilePayload {
    /// Full validation for create and PUT. The password is optional on PUT.
    fn validate_full(&self, password_required: bool) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        check_email(&mut errors, self.email.as_deref());
        check_profile_name(&mut errors, self.name.as_deref());
        if password_required || self.password.is_some() {
            check_password(&mut errors, self.password.as_deref());
        }
        errors.into_result().map_err(ApiError::InvalidFields)
    }

    /// Only the fields present are checked.
    fn validate_partial(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        if self.email.is_some() {
            check_email(&mut errors, self.email.as_deref());
        }
        if self.name.is_some() {
            check_profile_name(&mut errors, self.name.as_deref());
        }
        if self.password.is_some() {
            check_password(&mut errors, self.password.as_deref());
        }
        errors.into_result().map_err(ApiError::InvalidFields)
    }

    fn into_changes(self) -> IdentityChanges {
        IdentityChanges {
            email: self.email,
            name: self.name,
            password: self.password,
        }
    }
}

/// GET /profile/?search=
pub async fn list_profiles(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<ProfileDto>>>, ApiError> {
    let search = validate_search_query(params.search.as_deref());
    let profiles = state.identities().list(search).await?;

    Ok(Json(ApiResponse::success(
        profiles.into_iter().map(ProfileDto::from).collect(),
    )))
}

/// POST /profile/
/// Open registration
pub async fn create_profile(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ProfilePayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    payload.validate_full(true)?;

    let identity = state
        .identities()
        .create_user(
            payload.email.as_deref().unwrap_or_default(),
            payload.name.as_deref().unwrap_or_default(),
            payload.password.as_deref(),
        )
        .await?;

    tracing::info!(identity_id = %identity.id, "Registered profile");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ProfileDto::from(identity))),
    ))
}

/// GET /profile/{id}/
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ProfileDto>>, ApiError> {
    let id = IdentityId::new(validate_id(id, "Profile")?);
    let identity = state.identities().get(id).await?;
    Ok(Json(ApiResponse::success(ProfileDto::from(identity))))
}

/// PUT /profile/{id}/
pub async fn replace_profile(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
    payload: Result<Json<ProfilePayload>, JsonRejection>,
) -> Result<Json<ApiResponse<ProfileDto>>, ApiError> {
    let id = IdentityId::new(validate_id(id, "Profile")?);
    ensure_own_profile(&principal, id)?;

    let Json(payload) = payload?;
    payload.validate_full(false)?;

    let identity = state
        .identities()
        .update(id, payload.into_changes())
        .await?;
    Ok(Json(ApiResponse::success(ProfileDto::from(identity))))
}

/// PATCH /profile/{id}/
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
    payload: Result<Json<ProfilePayload>, JsonRejection>,
) -> Result<Json<ApiResponse<ProfileDto>>, ApiError> {
    let id = IdentityId::new(validate_id(id, "Profile")?);
    ensure_own_profile(&principal, id)?;

    let Json(payload) = payload?;
    payload.validate_partial()?;

    let changes = payload.into_changes();
    let identity = if changes.is_empty() {
        state.identities().get(id).await?
    } else {
        state.identities().update(id, changes).await?
    };

    Ok(Json(ApiResponse::success(ProfileDto::from(identity))))
}

/// DELETE /profile/{id}/
/// Removes the profile along with its feed items and token
pub async fn delete_profile(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let id = IdentityId::new(validate_id(id, "Profile")?);
    ensure_own_profile(&principal, id)?;

    state.identities().delete(id).await?;
    tracing::info!(identity_id = %id, "Deleted profile");

    Ok(StatusCode::NO_CONTENT)
}
