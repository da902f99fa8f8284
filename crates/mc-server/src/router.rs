//! Axum router construction.

use axum::middleware;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::context::AppContext;
use crate::middleware::request_id::assign_request_id;
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health::health_check,
        routes::media::list_media,
        routes::media::add_media,
        routes::media::get_media,
        routes::media::update_media,
        routes::media::rate_media,
        routes::media::rate_by_reference,
        routes::media::mark_watched,
    ),
    components(schemas(
        routes::health::HealthResponse,
        routes::media::MediaResponse,
        routes::media::AddMediaRequest,
        routes::media::UpdateMediaRequest,
        routes::media::RateMediaRequest,
        routes::media::RateByReferenceRequest,
        mc_core::MediaKind,
        mc_core::Genre,
    ))
)]
pub struct ApiDoc;

/// GET /api-docs/openapi.json
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route(
            "/media",
            get(routes::media::list_media).post(routes::media::add_media),
        )
        .route("/media/rate", post(routes::media::rate_by_reference))
        .route(
            "/media/{id}",
            get(routes::media::get_media).put(routes::media::update_media),
        )
        .route("/media/{id}/rate", post(routes::media::rate_media))
        .route("/media/{id}/watched", post(routes::media::mark_watched));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api", api)
        .layer(middleware::from_fn(assign_request_id))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
