use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::services::{FeedStore, IdentityStore};
use crate::state::SharedState;

pub mod auth;
mod error;
mod feed;
mod hello;
mod observability;
mod permissions;
mod profiles;
mod system;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn identities(&self) -> &Arc<dyn IdentityStore> {
        &self.shared.identities
    }

    #[must_use]
    pub fn feed(&self) -> &Arc<dyn FeedStore> {
        &self.shared.feed
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let api_router = Router::new()
        .merge(hello_routes())
        .merge(resource_routes())
        .route("/login/", post(auth::login))
        .route("/logout/", post(auth::logout))
        .route("/health", get(system::health))
        .route("/metrics", get(observability::get_metrics))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::resolve_principal,
        ))
        .with_state(state);

    let cors_layer = if cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(middleware::from_fn(observability::security_headers_middleware))
        // Must stay inside TraceLayer so user_id is recorded on the request span
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(TraceLayer::new_for_http())
}

fn hello_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/hello-view/",
            get(hello::view_get)
                .post(hello::view_post)
                .put(hello::view_echo)
                .patch(hello::view_echo)
                .delete(hello::view_echo),
        )
        .route(
            "/hello-viewset/",
            get(hello::viewset_list).post(hello::viewset_create),
        )
        .route(
            "/hello-viewset/{pk}/",
            get(hello::viewset_item)
                .put(hello::viewset_item)
                .patch(hello::viewset_item)
                .delete(hello::viewset_item),
        )
}

fn resource_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/profile/",
            get(profiles::list_profiles).post(profiles::create_profile),
        )
        .route(
            "/profile/{id}/",
            get(profiles::get_profile)
                .put(profiles::replace_profile)
                .patch(profiles::update_profile)
                .delete(profiles::delete_profile),
        )
        .route("/feed/", get(feed::list_feed).post(feed::create_feed_item))
        .route(
            "/feed/{id}/",
            get(feed::get_feed_item)
                .put(feed::replace_feed_item)
                .patch(feed::update_feed_item)
                .delete(feed::delete_feed_item),
        )
}
