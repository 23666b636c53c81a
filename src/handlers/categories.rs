use super::common::{
    alert_headers, check_body_id, page_request, pagination_headers, reject_id_on_create,
    validate_input, EntityRef,
};
use crate::{
    criteria::{CategoryCriteria, Criteria},
    entities::{category, CurrentStatus},
    errors::ApiError,
    services::categories::{CategoryInput, ENTITY_NAME},
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

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/count", get(count_categories))
        .route("/categories/all", get(enabled_categories))
        .route("/categories/homepage", get(homepage_categories))
        .route(
            "/categories/:id",
            get(get_category)
                .put(update_category)
                .patch(partial_update_category)
                .delete(delete_category),
        )
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "categoryName": "Tin tức",
    "categorySlug": "tin-tuc",
    "categoryStatus": "ENABLED",
    "parentCategory": { "id": 1 }
}))]
pub struct CategoryRequest {
    pub id: Option<i64>,
    #[validate(length(min = 1, max = 255))]
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    pub category_status: Option<CurrentStatus>,
    pub created_by: Option<String>,
    pub created_time: Option<DateTime<Utc>>,
    pub parent_category: Option<EntityRef>,
}

impl From<CategoryRequest> for CategoryInput {
    fn from(request: CategoryRequest) -> Self {
        Self {
            category_name: request.category_name,
            category_slug: request.category_slug,
            category_status: request.category_status,
            created_by: request.created_by,
            created_time: request.created_time,
            parent_category_id: request.parent_category.map(|parent| parent.id),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: i64,
    pub category_name: String,
    pub category_slug: Option<String>,
    pub category_status: Option<CurrentStatus>,
    pub created_by: Option<String>,
    pub created_time: Option<DateTime<Utc>>,
    pub parent_category: Option<EntityRef>,
}

impl From<category::Model> for CategoryResponse {
    fn from(model: category::Model) -> Self {
        Self {
            id: model.id,
            category_name: model.category_name,
            category_slug: model.category_slug,
            category_status: model.category_status,
            created_by: model.created_by,
            created_time: model.created_time,
            parent_category: EntityRef::from_id(model.parent_category_id),
        }
    }
}

fn render(models: Vec<category::Model>) -> Json<Vec<CategoryResponse>> {
    Json(models.into_iter().map(Into::into).collect())
}

#[utoipa::path(
    get,
    path = "/api/categories",
    params(
        ("page" = Option<u64>, Query, description = "Zero-based page number"),
        ("size" = Option<u64>, Query, description = "Page size"),
        ("sort" = Option<String>, Query, description = "property,(asc|desc); repeatable")
    ),
    responses(
        (status = 200, description = "Page of categories", body = [CategoryResponse]),
        (status = 400, description = "Invalid filter value or sort", body = crate::errors::ErrorResponse)
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let criteria = CategoryCriteria::from_pairs(pairs.iter().map(|(k, v)| (k, v)))?;
    let request = page_request(&pairs, &state.config)?;
    let page = state
        .services
        .category_queries
        .find_page_by_criteria(&criteria, &request)
        .await?;

    let headers = pagination_headers(uri.path(), &pairs, &page);
    Ok((headers, render(page.content)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/categories/count",
    responses((status = 200, description = "Number of matching categories", body = u64)),
    tag = "categories"
)]
pub async fn count_categories(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<u64>, ApiError> {
    let criteria = CategoryCriteria::from_pairs(pairs)?;
    Ok(Json(
        state
            .services
            .category_queries
            .count_by_criteria(&criteria)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/categories/all",
    responses((status = 200, description = "Enabled categories", body = [CategoryResponse])),
    tag = "categories"
)]
pub async fn enabled_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    Ok(render(state.services.categories.enabled().await?))
}

#[utoipa::path(
    get,
    path = "/api/categories/homepage",
    responses((status = 200, description = "Categories featured on the homepage", body = [CategoryResponse])),
    tag = "categories"
)]
pub async fn homepage_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    Ok(render(state.services.categories.homepage().await?))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category", body = CategoryResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CategoryResponse>, ApiError> {
    state
        .services
        .categories
        .find_one(id)
        .await?
        .map(|model| Json(model.into()))
        .ok_or_else(|| ApiError::NotFound(format!("Category {} not found", id)))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Created", body = CategoryResponse),
        (status = 400, description = "idexists or parentnotfound", body = crate::errors::ErrorResponse)
    ),
    tag = "categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CategoryRequest>,
) -> Result<Response, ApiError> {
    reject_id_on_create(payload.id, ENTITY_NAME)?;
    validate_input(&payload)?;

    let model = state.services.categories.create(payload.into()).await?;
    let mut headers = alert_headers(ENTITY_NAME, "created", model.id);
    if let Ok(location) = format!("/api/categories/{}", model.id).parse() {
        headers.insert(header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(CategoryResponse::from(model))).into_response())
}

#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(("id" = i64, Path, description = "Category id")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Updated", body = CategoryResponse),
        (status = 400, description = "idnull, idinvalid, idnotfound or cyclicparent", body = crate::errors::ErrorResponse)
    ),
    tag = "categories"
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryRequest>,
) -> Result<Response, ApiError> {
    check_body_id(id, payload.id, ENTITY_NAME)?;
    validate_input(&payload)?;

    let model = state.services.categories.update(id, payload.into()).await?;
    Ok((
        alert_headers(ENTITY_NAME, "updated", id),
        Json(CategoryResponse::from(model)),
    )
        .into_response())
}

#[utoipa::path(
    patch,
    path = "/api/categories/{id}",
    params(("id" = i64, Path, description = "Category id")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Updated", body = CategoryResponse),
        (status = 400, description = "idnull, idinvalid or cyclicparent", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "categories"
)]
pub async fn partial_update_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryRequest>,
) -> Result<Response, ApiError> {
    check_body_id(id, payload.id, ENTITY_NAME)?;
    validate_input(&payload)?;

    let model = state
        .services
        .categories
        .partial_update(id, payload.into())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Category {} not found", id)))?;
    Ok((
        alert_headers(ENTITY_NAME, "updated", id),
        Json(CategoryResponse::from(model)),
    )
        .into_response())
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(("id" = i64, Path, description = "Category id")),
    responses((status = 204, description = "Deleted together with its posts")),
    tag = "categories"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    state.services.categories.delete(id).await?;
    Ok((StatusCode::NO_CONTENT, alert_headers(ENTITY_NAME, "deleted", id)).into_response())
}
