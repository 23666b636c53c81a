use super::common::{
    alert_headers, check_body_id, page_request, pagination_headers, reject_id_on_create,
    validate_input, EntityRef,
};
use crate::{
    criteria::{BlogPostCriteria, Criteria},
    entities::{blog_post, CurrentStatus},
    errors::ApiError,
    services::blog_posts::{BlogPostInput, ENTITY_NAME},
    AppState,
};
use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

pub fn blog_post_routes() -> Router<AppState> {
    Router::new()
        .route("/blog-posts", get(list_blog_posts).post(create_blog_post))
        .route("/blog-posts/count", get(count_blog_posts))
        .route("/blog-posts/search", get(search_blog_posts))
        .route("/blog-posts/blogpost-carousel", get(blog_post_carousel))
        .route(
            "/blog-posts/:id",
            get(get_blog_post)
                .put(update_blog_post)
                .patch(partial_update_blog_post)
                .delete(delete_blog_post),
        )
        .route("/blog-posts/:id/views", put(increment_blog_post_views))
}

/// Request body for create, update and partial update.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "blogPostTitleVi": "Hóa học xanh",
    "blogPostTitleEn": "Green chemistry",
    "blogPostContentVi": "<p>Nội dung</p>",
    "blogPostStatus": "ENABLED",
    "timeToPublish": "2024-03-01T08:00:00Z",
    "category": { "id": 1 }
}))]
pub struct BlogPostRequest {
    pub id: Option<i64>,
    #[validate(length(min = 1, max = 255))]
    pub blog_post_title_vi: Option<String>,
    pub blog_post_description_vi: Option<String>,
    pub blog_post_content_vi: Option<String>,
    #[validate(length(max = 255))]
    pub blog_post_title_en: Option<String>,
    pub blog_post_description_en: Option<String>,
    pub blog_post_content_en: Option<String>,
    pub blog_post_status: Option<CurrentStatus>,
    pub blog_post_author: Option<String>,
    pub blog_post_slug: Option<String>,
    pub time_to_publish: Option<DateTime<Utc>>,
    pub thumbnail_link: Option<String>,
    pub created_time: Option<DateTime<Utc>>,
    pub modified_time: Option<DateTime<Utc>>,
    pub modified_by: Option<String>,
    pub created_by: Option<String>,
    #[validate(range(min = 1))]
    pub number_of_views: Option<i32>,
    pub category: Option<EntityRef>,
}

impl From<BlogPostRequest> for BlogPostInput {
    fn from(request: BlogPostRequest) -> Self {
        Self {
            blog_post_title_vi: request.blog_post_title_vi,
            blog_post_description_vi: request.blog_post_description_vi,
            blog_post_content_vi: request.blog_post_content_vi,
            blog_post_title_en: request.blog_post_title_en,
            blog_post_description_en: request.blog_post_description_en,
            blog_post_content_en: request.blog_post_content_en,
            blog_post_status: request.blog_post_status,
            blog_post_author: request.blog_post_author,
            blog_post_slug: request.blog_post_slug,
            time_to_publish: request.time_to_publish,
            thumbnail_link: request.thumbnail_link,
            created_time: request.created_time,
            modified_time: request.modified_time,
            modified_by: request.modified_by,
            created_by: request.created_by,
            number_of_views: request.number_of_views,
            category_id: request.category.map(|category| category.id),
        }
    }
}

/// Every field of a post except the long-form bodies.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostSummary {
    pub id: i64,
    pub blog_post_title_vi: String,
    pub blog_post_description_vi: Option<String>,
    pub blog_post_title_en: Option<String>,
    pub blog_post_description_en: Option<String>,
    pub blog_post_status: Option<CurrentStatus>,
    pub blog_post_author: Option<String>,
    pub blog_post_slug: Option<String>,
    pub time_to_publish: Option<DateTime<Utc>>,
    pub thumbnail_link: Option<String>,
    pub created_time: Option<DateTime<Utc>>,
    pub modified_time: Option<DateTime<Utc>>,
    pub modified_by: Option<String>,
    pub created_by: Option<String>,
    pub number_of_views: Option<i32>,
    pub category: Option<EntityRef>,
}

/// A full post.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostResponse {
    #[serde(flatten)]
    pub summary: BlogPostSummary,
    pub blog_post_content_vi: Option<String>,
    pub blog_post_content_en: Option<String>,
}

impl From<blog_post::Model> for BlogPostResponse {
    fn from(model: blog_post::Model) -> Self {
        let blog_post_content_vi = model.blog_post_content_vi.clone();
        let blog_post_content_en = model.blog_post_content_en.clone();
        Self {
            summary: BlogPostSummary::from(model),
            blog_post_content_vi,
            blog_post_content_en,
        }
    }
}

impl From<blog_post::Model> for BlogPostSummary {
    fn from(model: blog_post::Model) -> Self {
        Self {
            id: model.id,
            blog_post_title_vi: model.blog_post_title_vi,
            blog_post_description_vi: model.blog_post_description_vi,
            blog_post_title_en: model.blog_post_title_en,
            blog_post_description_en: model.blog_post_description_en,
            blog_post_status: model.blog_post_status,
            blog_post_author: model.blog_post_author,
            blog_post_slug: model.blog_post_slug,
            time_to_publish: model.time_to_publish,
            thumbnail_link: model.thumbnail_link,
            created_time: model.created_time,
            modified_time: model.modified_time,
            modified_by: model.modified_by,
            created_by: model.created_by,
            number_of_views: model.number_of_views,
            category: EntityRef::from_id(model.category_id),
        }
    }
}

/// Homepage carousel entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostCarouselItem {
    pub id: i64,
    pub blog_post_title_vi: String,
    pub blog_post_title_en: Option<String>,
    pub blog_post_slug: Option<String>,
    pub thumbnail_link: Option<String>,
    pub created_time: Option<DateTime<Utc>>,
}

impl From<blog_post::Model> for BlogPostCarouselItem {
    fn from(model: blog_post::Model) -> Self {
        Self {
            id: model.id,
            blog_post_title_vi: model.blog_post_title_vi,
            blog_post_title_en: model.blog_post_title_en,
            blog_post_slug: model.blog_post_slug,
            thumbnail_link: model.thumbnail_link,
            created_time: model.created_time,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Text to look for; case and accents are ignored
    pub query_string: String,
    /// `en` searches English fields, anything else Vietnamese
    pub language: String,
}

#[utoipa::path(
    get,
    path = "/api/blog-posts",
    params(
        ("page" = Option<u64>, Query, description = "Zero-based page number"),
        ("size" = Option<u64>, Query, description = "Page size"),
        ("sort" = Option<String>, Query, description = "property,(asc|desc); repeatable")
    ),
    responses(
        (status = 200, description = "Page of posts with null content bodies; see X-Total-Count and Link headers", body = [BlogPostResponse]),
        (status = 400, description = "Invalid filter value or sort", body = crate::errors::ErrorResponse)
    ),
    tag = "blog-posts"
)]
pub async fn list_blog_posts(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let criteria = BlogPostCriteria::from_pairs(pairs.iter().map(|(k, v)| (k, v)))?;
    let request = page_request(&pairs, &state.config)?;
    let page = state
        .services
        .blog_post_queries
        .find_page_by_criteria(&criteria, &request)
        .await?;

    let headers = pagination_headers(uri.path(), &pairs, &page);
    let body: Vec<BlogPostResponse> = page.content.into_iter().map(Into::into).collect();
    Ok((headers, Json(body)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/blog-posts/count",
    responses(
        (status = 200, description = "Number of matching posts", body = u64)
    ),
    tag = "blog-posts"
)]
pub async fn count_blog_posts(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<u64>, ApiError> {
    let criteria = BlogPostCriteria::from_pairs(pairs)?;
    let count = state
        .services
        .blog_post_queries
        .count_by_criteria(&criteria)
        .await?;
    Ok(Json(count))
}

#[utoipa::path(
    get,
    path = "/api/blog-posts/{id}",
    params(("id" = i64, Path, description = "Blog post id")),
    responses(
        (status = 200, description = "Full post", body = BlogPostResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "blog-posts"
)]
pub async fn get_blog_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<BlogPostResponse>, ApiError> {
    state
        .services
        .blog_posts
        .find_one(id)
        .await?
        .map(|post| Json(BlogPostResponse::from(post)))
        .ok_or_else(|| ApiError::NotFound(format!("Blog post {} not found", id)))
}

#[utoipa::path(
    post,
    path = "/api/blog-posts",
    request_body = BlogPostRequest,
    responses(
        (status = 201, description = "Created", body = BlogPostResponse),
        (status = 400, description = "Body carries an id or is invalid", body = crate::errors::ErrorResponse)
    ),
    tag = "blog-posts"
)]
pub async fn create_blog_post(
    State(state): State<AppState>,
    Json(payload): Json<BlogPostRequest>,
) -> Result<Response, ApiError> {
    reject_id_on_create(payload.id, ENTITY_NAME)?;
    validate_input(&payload)?;

    let post = state.services.blog_posts.create(payload.into()).await?;
    let mut headers = alert_headers(ENTITY_NAME, "created", post.id);
    if let Ok(location) = format!("/api/blog-posts/{}", post.id).parse() {
        headers.insert(header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(BlogPostResponse::from(post))).into_response())
}

#[utoipa::path(
    put,
    path = "/api/blog-posts/{id}",
    params(("id" = i64, Path, description = "Blog post id")),
    request_body = BlogPostRequest,
    responses(
        (status = 200, description = "Updated", body = BlogPostResponse),
        (status = 400, description = "idnull, idinvalid or idnotfound", body = crate::errors::ErrorResponse)
    ),
    tag = "blog-posts"
)]
pub async fn update_blog_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<BlogPostRequest>,
) -> Result<Response, ApiError> {
    check_body_id(id, payload.id, ENTITY_NAME)?;
    validate_input(&payload)?;

    let post = state.services.blog_posts.update(id, payload.into()).await?;
    Ok((
        alert_headers(ENTITY_NAME, "updated", id),
        Json(BlogPostResponse::from(post)),
    )
        .into_response())
}

#[utoipa::path(
    patch,
    path = "/api/blog-posts/{id}",
    params(("id" = i64, Path, description = "Blog post id")),
    request_body = BlogPostRequest,
    responses(
        (status = 200, description = "Updated", body = BlogPostResponse),
        (status = 400, description = "idnull or idinvalid", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "blog-posts"
)]
pub async fn partial_update_blog_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<BlogPostRequest>,
) -> Result<Response, ApiError> {
    check_body_id(id, payload.id, ENTITY_NAME)?;
    validate_input(&payload)?;

    let post = state
        .services
        .blog_posts
        .partial_update(id, payload.into())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Blog post {} not found", id)))?;
    Ok((
        alert_headers(ENTITY_NAME, "updated", id),
        Json(BlogPostResponse::from(post)),
    )
        .into_response())
}

#[utoipa::path(
    delete,
    path = "/api/blog-posts/{id}",
    params(("id" = i64, Path, description = "Blog post id")),
    responses((status = 204, description = "Deleted")),
    tag = "blog-posts"
)]
pub async fn delete_blog_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    state.services.blog_posts.delete(id).await?;
    Ok((StatusCode::NO_CONTENT, alert_headers(ENTITY_NAME, "deleted", id)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/blog-posts/{id}/views",
    params(("id" = i64, Path, description = "Blog post id")),
    responses(
        (status = 200, description = "Post with its incremented counter", body = BlogPostResponse),
        (status = 400, description = "idnotfound", body = crate::errors::ErrorResponse)
    ),
    tag = "blog-posts"
)]
pub async fn increment_blog_post_views(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<BlogPostResponse>, ApiError> {
    let post = state.services.blog_posts.increment_views(id).await?;
    Ok(Json(post.into()))
}

#[utoipa::path(
    get,
    path = "/api/blog-posts/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching posts", body = [BlogPostResponse])
    ),
    tag = "blog-posts"
)]
pub async fn search_blog_posts(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<BlogPostResponse>>, ApiError> {
    let posts = state
        .services
        .blog_posts
        .search(&query.query_string, &query.language)
        .await?;
    Ok(Json(posts.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/blog-posts/blogpost-carousel",
    responses(
        (status = 200, description = "Latest published posts", body = [BlogPostCarouselItem])
    ),
    tag = "blog-posts"
)]
pub async fn blog_post_carousel(
    State(state): State<AppState>,
) -> Result<Json<Vec<BlogPostCarouselItem>>, ApiError> {
    let posts = state.services.blog_posts.carousel().await?;
    Ok(Json(posts.into_iter().map(Into::into).collect()))
}
