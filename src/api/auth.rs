use axum::{
    Extension, Json,
    extract::{Request, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, MessageResponse};
use crate::domain::validation::{BLANK, REQUIRED};
use crate::domain::{FieldErrors, Identity};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "email")]
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// The caller of the current request. Anonymous when no token was sent.
#[derive(Debug, Clone, Default)]
pub struct Principal(Option<Identity>);

impl Principal {
    #[must_use]
    pub const fn anonymous() -> Self {
        Self(None)
    }

    #[must_use]
    pub const fn authenticated(identity: Identity) -> Self {
        Self(Some(identity))
    }

    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        self.0.as_ref()
    }

    /// The identity, or 401 for anonymous callers.
    pub fn require(&self) -> Result<&Identity, ApiError> {
        self.identity().ok_or_else(ApiError::not_authenticated)
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Resolves the caller from either header form:
/// 1. `Authorization: Token <key>`
/// 2. `Authorization: Bearer <key>`
///
/// A missing header means an anonymous caller; an unknown key is rejected.
pub async fn resolve_principal(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Response {
    let principal = match extract_token(&headers) {
        None => Principal::anonymous(),
        Some(key) => match state.identities().identity_for_token(&key).await {
            Ok(Some(identity)) => {
                tracing::Span::current().record("user_id", identity.id.value());
                Principal::authenticated(identity)
            }
            Ok(None) => {
                return ApiError::Unauthorized("Invalid token.".to_string()).into_response();
            }
            Err(e) => return ApiError::from(e).into_response(),
        },
    };

    request.extensions_mut().insert(principal);
    next.run(request).await
}

fn extract_token(headers: &HeaderMap) -> Option<String> {
    let auth_str = headers.get("Authorization")?.to_str().ok()?;

    let token = auth_str
        .strip_prefix("Token ")
        .or_else(|| auth_str.strip_prefix("Bearer "))?
        .trim();

    (!token.is_empty()).then(|| token.to_string())
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /login/
/// Exchange email and password for a token
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    let Json(payload) = payload?;

    let mut errors = FieldErrors::new();
    for (field, value) in [("username", &payload.username), ("password", &payload.password)] {
        match value.as_deref() {
            None => errors.add(field, REQUIRED),
            Some("") => errors.add(field, BLANK),
            Some(_) => {}
        }
    }
    errors.into_result().map_err(ApiError::InvalidFields)?;

    let email = payload.username.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    let identity = state.identities().authenticate(&email, &password).await?;
    let token = state.identities().issue_token(&identity).await?;

    tracing::info!("Identity {} logged in", identity.id);

    Ok(Json(ApiResponse::success(TokenResponse { token })))
}

/// POST /logout/
/// Revoke the caller's token
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let identity = principal.require()?;
    state.identities().revoke_token(identity).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(MessageResponse {
            message: "Logged out".to_string(),
        })),
    ))
}
