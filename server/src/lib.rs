pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod fixtures;
pub mod models;
pub mod raw_sql;
pub mod schema;
pub mod telemetry;

use axum::extract::MatchedPath;
use axum::http::{Request, Response};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::trace::TraceLayer;
use tracing::Span;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::ApiError;
use crate::config::Config;
use crate::db::{DbConn, DbPool};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(pool: DbPool, config: Config) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }

    pub fn conn(&self) -> Result<DbConn, ApiError> {
        Ok(self.pool.get()?)
    }
}

/// The full HTTP application: API routes, Swagger UI and request tracing.
pub fn build_router(state: AppState) -> Router {
    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::openapi());

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<_>| {
            // Route template rather than raw path keeps span names low-cardinality
            let route = request
                .extensions()
                .get::<MatchedPath>()
                .map_or(request.uri().path(), MatchedPath::as_str);
            tracing::info_span!("request", method = %request.method(), route = %route)
        })
        .on_request(())
        .on_response(|response: &Response<_>, latency: Duration, _: &Span| {
            let status = response.status();
            let elapsed_ms = latency.as_millis() as u64;
            if status.is_server_error() {
                tracing::error!(%status, elapsed_ms, "responded");
            } else {
                tracing::info!(%status, elapsed_ms, "responded");
            }
        })
        .on_failure(|failure: ServerErrorsFailureClass, latency: Duration, _: &Span| {
            tracing::error!(%failure, elapsed_ms = latency.as_millis() as u64, "request failed");
        });

    Router::new()
        .merge(api::router())
        .merge(swagger_ui)
        .with_state(state)
        .layer(trace_layer)
}
