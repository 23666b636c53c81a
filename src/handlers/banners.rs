use super::common::{
    alert_headers, check_body_id, page_request, pagination_headers, reject_id_on_create,
    validate_input,
};
use crate::{
    criteria::{BannerCriteria, Criteria},
    entities::{banner, CurrentStatus},
    errors::ApiError,
    services::banners::{BannerInput, ENTITY_NAME},
    AppState,
};
use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

pub fn banner_routes() -> Router<AppState> {
    Router::new()
        .route("/banners", get(list_banners).post(create_banner))
        .route("/banners/count", get(count_banners))
        .route(
            "/banners/:id",
            get(get_banner)
                .put(update_banner)
                .patch(partial_update_banner)
                .delete(delete_banner),
        )
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BannerRequest {
    pub id: Option<i64>,
    #[validate(length(min = 1))]
    pub banner_link: Option<String>,
    pub banner_status: Option<CurrentStatus>,
    pub created_by: Option<String>,
    pub created_time: Option<DateTime<Utc>>,
    pub modified_time: Option<DateTime<Utc>>,
    pub modified_by: Option<String>,
}

impl From<BannerRequest> for BannerInput {
    fn from(request: BannerRequest) -> Self {
        Self {
            banner_link: request.banner_link,
            banner_status: request.banner_status,
            created_by: request.created_by,
            created_time: request.created_time,
            modified_time: request.modified_time,
            modified_by: request.modified_by,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BannerResponse {
    pub id: i64,
    pub banner_link: String,
    pub banner_status: Option<CurrentStatus>,
    pub created_by: Option<String>,
    pub created_time: Option<DateTime<Utc>>,
    pub modified_time: Option<DateTime<Utc>>,
    pub modified_by: Option<String>,
}

impl From<banner::Model> for BannerResponse {
    fn from(model: banner::Model) -> Self {
        Self {
            id: model.id,
            banner_link: model.banner_link,
            banner_status: model.banner_status,
            created_by: model.created_by,
            created_time: model.created_time,
            modified_time: model.modified_time,
            modified_by: model.modified_by,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/banners",
    params(
        ("page" = Option<u64>, Query, description = "Zero-based page number"),
        ("size" = Option<u64>, Query, description = "Page size"),
        ("sort" = Option<String>, Query, description = "property,(asc|desc); repeatable")
    ),
    responses(
        (status = 200, description = "Page of banners", body = [BannerResponse]),
        (status = 400, description = "Invalid filter value or sort", body = crate::errors::ErrorResponse)
    ),
    tag = "banners"
)]
pub async fn list_banners(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let criteria = BannerCriteria::from_pairs(pairs.iter().map(|(k, v)| (k, v)))?;
    let request = page_request(&pairs, &state.config)?;
    let page = state
        .services
        .banner_queries
        .find_page_by_criteria(&criteria, &request)
        .await?;

    let headers = pagination_headers(uri.path(), &pairs, &page);
    let body: Vec<BannerResponse> = page.content.into_iter().map(Into::into).collect();
    Ok((headers, Json(body)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/banners/count",
    responses((status = 200, description = "Number of matching banners", body = u64)),
    tag = "banners"
)]
pub async fn count_banners(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<u64>, ApiError> {
    let criteria = BannerCriteria::from_pairs(pairs)?;
    let count = state
        .services
        .banner_queries
        .count_by_criteria(&criteria)
        .await?;
    Ok(Json(count))
}

#[utoipa::path(
    get,
    path = "/api/banners/{id}",
    params(("id" = i64, Path, description = "Banner id")),
    responses(
        (status = 200, description = "Banner", body = BannerResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "banners"
)]
pub async fn get_banner(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<BannerResponse>, ApiError> {
    state
        .services
        .banners
        .find_one(id)
        .await?
        .map(|model| Json(model.into()))
        .ok_or_else(|| ApiError::NotFound(format!("Banner {} not found", id)))
}

#[utoipa::path(
    post,
    path = "/api/banners",
    request_body = BannerRequest,
    responses(
        (status = 201, description = "Created", body = BannerResponse),
        (status = 400, description = "idexists or blank link", body = crate::errors::ErrorResponse)
    ),
    tag = "banners"
)]
pub async fn create_banner(
    State(state): State<AppState>,
    Json(payload): Json<BannerRequest>,
) -> Result<Response, ApiError> {
    reject_id_on_create(payload.id, ENTITY_NAME)?;
    validate_input(&payload)?;

    let model = state.services.banners.create(payload.into()).await?;
    let mut headers = alert_headers(ENTITY_NAME, "created", model.id);
    if let Ok(location) = format!("/api/banners/{}", model.id).parse() {
        headers.insert(header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(BannerResponse::from(model))).into_response())
}

#[utoipa::path(
    put,
    path = "/api/banners/{id}",
    params(("id" = i64, Path, description = "Banner id")),
    request_body = BannerRequest,
    responses(
        (status = 200, description = "Updated", body = BannerResponse),
        (status = 400, description = "idnull, idinvalid or idnotfound", body = crate::errors::ErrorResponse)
    ),
    tag = "banners"
)]
pub async fn update_banner(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<BannerRequest>,
) -> Result<Response, ApiError> {
    check_body_id(id, payload.id, ENTITY_NAME)?;
    validate_input(&payload)?;

    let model = state.services.banners.update(id, payload.into()).await?;
    Ok((
        alert_headers(ENTITY_NAME, "updated", id),
        Json(BannerResponse::from(model)),
    )
        .into_response())
}

#[utoipa::path(
    patch,
    path = "/api/banners/{id}",
    params(("id" = i64, Path, description = "Banner id")),
    request_body = BannerRequest,
    responses(
        (status = 200, description = "Updated", body = BannerResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "banners"
)]
pub async fn partial_update_banner(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<BannerRequest>,
) -> Result<Response, ApiError> {
    check_body_id(id, payload.id, ENTITY_NAME)?;
    validate_input(&payload)?;

    let model = state
        .services
        .banners
        .partial_update(id, payload.into())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Banner {} not found", id)))?;
    Ok((
        alert_headers(ENTITY_NAME, "updated", id),
        Json(BannerResponse::from(model)),
    )
        .into_response())
}

#[utoipa::path(
    delete,
    path = "/api/banners/{id}",
    params(("id" = i64, Path, description = "Banner id")),
    responses((status = 204, description = "Deleted")),
    tag = "banners"
)]
pub async fn delete_banner(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    state.services.banners.delete(id).await?;
    Ok((StatusCode::NO_CONTENT, alert_headers(ENTITY_NAME, "deleted", id)).into_response())
}
