//! Media catalog route handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mc_catalog::{ListCriteria, MediaRef, MediaUpdate};
use mc_core::{Genre, MediaId, MediaItem, MediaKind, NewMedia};
use serde::{Deserialize, Serialize};

use crate::context::AppContext;
use crate::error::AppError;
use crate::extract::{ApiJson, ApiQuery};
use crate::middleware::request_id::RequestId;

/// Query parameters for listing media.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct ListMediaParams {
    /// Case-insensitive title substring.
    pub search: Option<String>,
    /// `movie` or `series`.
    pub kind: Option<String>,
    pub genre: Option<String>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub rating_min: Option<f64>,
    pub rating_max: Option<f64>,
    pub watched: Option<bool>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    /// `title`, `releaseYear`, `rating`, `createdAt` or `updatedAt`.
    pub sort_by: Option<String>,
    pub ascending: Option<bool>,
}

impl ListMediaParams {
    /// Parse the textual filters into listing criteria.
    pub fn into_criteria(self) -> mc_core::Result<ListCriteria> {
        let defaults = ListCriteria::default();
        Ok(ListCriteria {
            search: self.search,
            kind: parse_kind(self.kind.as_deref())?,
            genre: parse_genre(self.genre.as_deref())?,
            year_from: self.year_from,
            year_to: self.year_to,
            rating_min: self.rating_min,
            rating_max: self.rating_max,
            watched: self.watched,
            page: self.page.unwrap_or(defaults.page),
            page_size: self.page_size.unwrap_or(defaults.page_size),
            sort_by: self.sort_by,
            ascending: self.ascending.unwrap_or(defaults.ascending),
        })
    }
}

/// Blank means "no kind filter".
pub fn parse_kind(raw: Option<&str>) -> mc_core::Result<Option<MediaKind>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some),
    }
}

/// Blank means "no genre filter".
pub fn parse_genre(raw: Option<&str>) -> mc_core::Result<Option<Genre>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some),
    }
}

fn parse_media_id(raw: &str) -> mc_core::Result<MediaId> {
    raw.trim()
        .parse()
        .map_err(|_| mc_core::Error::invalid(format!("Invalid media ID '{raw}'")))
}

/// Request body for adding media.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AddMediaRequest {
    #[serde(default)]
    pub title: String,
    pub release_year: i32,
    /// `movie` or `series`, any case.
    pub kind: String,
    pub genre: Option<String>,
    pub rating: Option<f64>,
    #[serde(default)]
    pub watched: bool,
}

/// Request body for rating media addressed by path id.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RateMediaRequest {
    pub rating: f64,
}

/// Request body for rating media by id or exact title.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RateByReferenceRequest {
    pub id: Option<String>,
    pub title: Option<String>,
    pub rating: f64,
}

/// Request body for replacing basic fields.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateMediaRequest {
    #[serde(default)]
    pub title: String,
    pub release_year: i32,
    pub kind: String,
    pub genre: Option<String>,
}

/// Media response.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MediaResponse {
    pub id: String,
    pub title: String,
    pub release_year: i32,
    pub kind: MediaKind,
    pub genre: Option<String>,
    pub rating: Option<f64>,
    pub watched: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl MediaResponse {
    pub fn from_model(item: &MediaItem) -> Self {
        Self {
            id: item.id().to_string(),
            title: item.title().to_string(),
            release_year: item.release_year(),
            kind: item.kind(),
            genre: item.genre().map(String::from),
            rating: item.rating(),
            watched: item.watched(),
            created_at: item.created_at().to_rfc3339(),
            updated_at: item.updated_at().to_rfc3339(),
        }
    }
}

/// Attach the request id to a catalog error.
fn tagged(request_id: &RequestId) -> impl Fn(mc_core::Error) -> AppError + '_ {
    move |e| AppError::new(e).with_request_id(request_id.0.clone())
}

/// GET /api/media
#[utoipa::path(
    get,
    path = "/api/media",
    params(ListMediaParams),
    responses(
        (status = 200, description = "One page of matching media", body = Vec<MediaResponse>),
        (status = 400, description = "Unknown kind or genre, or a malformed value")
    )
)]
pub async fn list_media(
    State(ctx): State<AppContext>,
    request_id: RequestId,
    ApiQuery(params): ApiQuery<ListMediaParams>,
) -> Result<Json<Vec<MediaResponse>>, AppError> {
    let criteria = params.into_criteria().map_err(tagged(&request_id))?;
    let cancel = ctx.request_token();
    let items = ctx
        .catalog
        .list_media(&criteria, &cancel)
        .await
        .map_err(tagged(&request_id))?;
    Ok(Json(items.iter().map(MediaResponse::from_model).collect()))
}

/// POST /api/media
#[utoipa::path(
    post,
    path = "/api/media",
    request_body = AddMediaRequest,
    responses(
        (status = 201, description = "Media added", body = MediaResponse),
        (status = 400, description = "Missing or invalid field")
    )
)]
pub async fn add_media(
    State(ctx): State<AppContext>,
    request_id: RequestId,
    ApiJson(payload): ApiJson<AddMediaRequest>,
) -> Result<impl IntoResponse, AppError> {
    let kind: MediaKind = payload.kind.parse().map_err(tagged(&request_id))?;
    let draft = NewMedia {
        title: payload.title,
        release_year: payload.release_year,
        kind,
        genre: payload.genre,
        rating: payload.rating,
        watched: payload.watched,
    };

    let cancel = ctx.request_token();
    let item = ctx
        .catalog
        .add_media(draft, &cancel)
        .await
        .map_err(tagged(&request_id))?;
    Ok((StatusCode::CREATED, Json(MediaResponse::from_model(&item))))
}

/// GET /api/media/{id}
#[utoipa::path(
    get,
    path = "/api/media/{id}",
    params(("id" = String, Path, description = "Media ID")),
    responses(
        (status = 200, description = "Media details", body = MediaResponse),
        (status = 404, description = "Media not found")
    )
)]
pub async fn get_media(
    State(ctx): State<AppContext>,
    request_id: RequestId,
    Path(id): Path<String>,
) -> Result<Json<MediaResponse>, AppError> {
    let id = parse_media_id(&id).map_err(tagged(&request_id))?;
    let cancel = ctx.request_token();
    let item = ctx
        .catalog
        .get_media(id, &cancel)
        .await
        .map_err(tagged(&request_id))?;
    Ok(Json(MediaResponse::from_model(&item)))
}

/// PUT /api/media/{id}
#[utoipa::path(
    put,
    path = "/api/media/{id}",
    params(("id" = String, Path, description = "Media ID")),
    request_body = UpdateMediaRequest,
    responses(
        (status = 200, description = "Media updated", body = MediaResponse),
        (status = 400, description = "Missing or invalid field"),
        (status = 404, description = "Media not found")
    )
)]
pub async fn update_media(
    State(ctx): State<AppContext>,
    request_id: RequestId,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateMediaRequest>,
) -> Result<Json<MediaResponse>, AppError> {
    let id = parse_media_id(&id).map_err(tagged(&request_id))?;
    let kind: MediaKind = payload.kind.parse().map_err(tagged(&request_id))?;
    let changes = MediaUpdate {
        title: payload.title,
        release_year: payload.release_year,
        kind,
        genre: payload.genre,
    };

    let cancel = ctx.request_token();
    let item = ctx
        .catalog
        .update_media(&MediaRef::by_id(id), changes, &cancel)
        .await
        .map_err(tagged(&request_id))?;
    Ok(Json(MediaResponse::from_model(&item)))
}

/// POST /api/media/{id}/rate
#[utoipa::path(
    post,
    path = "/api/media/{id}/rate",
    params(("id" = String, Path, description = "Media ID")),
    request_body = RateMediaRequest,
    responses(
        (status = 200, description = "Media rated", body = MediaResponse),
        (status = 400, description = "Rating out of range"),
        (status = 404, description = "Media not found")
    )
)]
pub async fn rate_media(
    State(ctx): State<AppContext>,
    request_id: RequestId,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<RateMediaRequest>,
) -> Result<Json<MediaResponse>, AppError> {
    let id = parse_media_id(&id).map_err(tagged(&request_id))?;
    let cancel = ctx.request_token();
    let item = ctx
        .catalog
        .rate_media(&MediaRef::by_id(id), payload.rating, &cancel)
        .await
        .map_err(tagged(&request_id))?;
    Ok(Json(MediaResponse::from_model(&item)))
}

/// POST /api/media/rate
#[utoipa::path(
    post,
    path = "/api/media/rate",
    request_body = RateByReferenceRequest,
    responses(
        (status = 200, description = "Media rated", body = MediaResponse),
        (status = 400, description = "No id or title, or rating out of range"),
        (status = 404, description = "Media not found"),
        (status = 409, description = "Title matches more than one item")
    )
)]
pub async fn rate_by_reference(
    State(ctx): State<AppContext>,
    request_id: RequestId,
    ApiJson(payload): ApiJson<RateByReferenceRequest>,
) -> Result<Json<MediaResponse>, AppError> {
    let id = payload
        .id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_media_id)
        .transpose()
        .map_err(tagged(&request_id))?;
    let target = MediaRef {
        id,
        title: payload.title,
    };

    let cancel = ctx.request_token();
    let item = ctx
        .catalog
        .rate_media(&target, payload.rating, &cancel)
        .await
        .map_err(tagged(&request_id))?;
    Ok(Json(MediaResponse::from_model(&item)))
}

/// POST /api/media/{id}/watched
#[utoipa::path(
    post,
    path = "/api/media/{id}/watched",
    params(("id" = String, Path, description = "Media ID")),
    responses(
        (status = 200, description = "Media marked watched", body = MediaResponse),
        (status = 404, description = "Media not found")
    )
)]
pub async fn mark_watched(
    State(ctx): State<AppContext>,
    request_id: RequestId,
    Path(id): Path<String>,
) -> Result<Json<MediaResponse>, AppError> {
    let id = parse_media_id(&id).map_err(tagged(&request_id))?;
    let cancel = ctx.request_token();
    let item = ctx
        .catalog
        .mark_watched(&MediaRef::by_id(id), &cancel)
        .await
        .map_err(tagged(&request_id))?;
    Ok(Json(MediaResponse::from_model(&item)))
}
