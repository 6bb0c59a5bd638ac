//! Demonstration endpoints. One is routed method by method, the other is a
//! resource-style collection with list/create and per-item actions.

use axum::{
    Json,
    extract::{Path, rejection::JsonRejection},
    http::Method,
};
use serde::{Deserialize, Serialize};

use super::validation::validate_hello_name;
use super::{ApiError, ApiResponse, MessageResponse};

const AN_APIVIEW: [&str; 4] = [
    "Uses HTTP methods as function (get, post, patch, put, delete)",
    "Is similar to a traditional Django View",
    "Gives you the most control over your application logic",
    "Is mapped manually to URLs",
];

const A_VIEWSET: [&str; 3] = [
    "Uses actions (list, create, retrieve, update, partial_update, destroy)",
    "Automatically maps to URLs using a router",
    "Provides more functionality with less code",
];

#[derive(Debug, Deserialize)]
pub struct HelloRequest {
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApiViewResponse {
    pub message: &'static str,
    pub an_apiview: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct ViewSetResponse {
    pub message: &'static str,
    pub a_viewset: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct MethodResponse {
    pub method: String,
}

#[derive(Debug, Serialize)]
pub struct HttpMethodResponse {
    pub http_method: String,
}

fn greeting(
    payload: Result<Json<HelloRequest>, JsonRejection>,
    suffix: &str,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let Json(payload) = payload?;
    let name = validate_hello_name(payload.name.as_deref())?;

    Ok(Json(ApiResponse::success(MessageResponse {
        message: format!("Hello {name}{suffix}"),
    })))
}

/// GET /hello-view/
pub async fn view_get() -> Json<ApiResponse<ApiViewResponse>> {
    Json(ApiResponse::success(ApiViewResponse {
        message: "Hello!",
        an_apiview: AN_APIVIEW.to_vec(),
    }))
}

/// POST /hello-view/
pub async fn view_post(
    payload: Result<Json<HelloRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    greeting(payload, "")
}

/// PUT, PATCH and DELETE /hello-view/ echo the method back.
pub async fn view_echo(method: Method) -> Json<ApiResponse<MethodResponse>> {
    Json(ApiResponse::success(MethodResponse {
        method: method.to_string(),
    }))
}

/// GET /hello-viewset/
pub async fn viewset_list() -> Json<ApiResponse<ViewSetResponse>> {
    Json(ApiResponse::success(ViewSetResponse {
        message: "Hello!",
        a_viewset: A_VIEWSET.to_vec(),
    }))
}

/// POST /hello-viewset/
pub async fn viewset_create(
    payload: Result<Json<HelloRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    greeting(payload, "!")
}

/// GET, PUT, PATCH and DELETE /hello-viewset/{pk}/
pub async fn viewset_item(
    method: Method,
    Path(_pk): Path<String>,
) -> Json<ApiResponse<HttpMethodResponse>> {
    Json(ApiResponse::success(HttpMethodResponse {
        http_method: method.to_string(),
    }))
}
