pub mod tweets;
pub mod users;

use axum::{
    extract::Path,
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use models::RecordId;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::errors::JsonApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn metrics() -> Result<String, JsonApiError> {
    Ok(service::metrics::encode_metrics()?)
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Parse a path identifier. An id that can never exist is reported as a
/// missing record rather than a malformed request.
pub(crate) fn record_id(kind: &str, Path(raw): Path<String>) -> Result<RecordId, JsonApiError> {
    RecordId::parse(&raw).map_err(|_| {
        JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some(format!("{kind} {raw} not found")))
    })
}

/// Build the full application router: users, tweets and service endpoints.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let service_routes = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/api-docs/openapi.json", get(openapi_json));

    let user_routes = Router::new()
        .route("/signup", post(users::signup))
        .route("/login", post(users::login))
        .route("/users", get(users::list_users))
        .route("/users/:user_id", get(users::show_user))
        .route("/users/:user_id/update", put(users::update_user))
        .route("/users/:user_id/delete", delete(users::delete_user));

    let tweet_routes = Router::new()
        .route("/", get(tweets::home))
        .route("/post", post(tweets::post_tweet))
        .route("/tweets/:tweet_id", get(tweets::show_tweet))
        .route("/tweets/:tweet_id/update", put(tweets::update_tweet))
        .route("/tweets/:tweet_id/delete", delete(tweets::delete_tweet));

    service_routes
        .merge(user_routes)
        .merge(tweet_routes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
