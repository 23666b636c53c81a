use crate::{
    errors::{ApiError, ServiceError},
    services::images::content_type,
    AppState,
};
use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

// Ten years; keeps the Expires arithmetic in range.
const MAX_EXPIRES_SECS: i64 = 10 * 365 * 24 * 60 * 60;

pub fn image_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/images/upload-image",
            post(upload_image).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route(
            "/public-images/:file_name",
            get(serve_image).delete(delete_image),
        )
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageUploadResponse {
    #[schema(example = "/api/public-images/05-03-2024_14-07-09_logo.png")]
    pub image_url: String,
}

/// Stores the multipart field `file` and returns its public URL.
#[utoipa::path(
    post,
    path = "/api/images/upload-image",
    request_body(content_type = "multipart/form-data", description = "Form with a `file` part"),
    responses(
        (status = 200, description = "Stored", body = ImageUploadResponse),
        (status = 400, description = "Missing or unreadable file part", body = crate::errors::ErrorResponse)
    ),
    tag = "images"
)]
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImageUploadResponse>, ApiError> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Malformed multipart body");
                return Err(ServiceError::BadRequest(format!("Malformed upload: {}", e)).into());
            }
        };
        if field.name() != Some("file") {
            continue;
        }

        let original = field.file_name().unwrap_or("upload").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ServiceError::BadRequest(format!("Unreadable file part: {}", e)))?;
        let image_url = state.services.images.upload(&original, data).await?;
        return Ok(Json(ImageUploadResponse { image_url }));
    }

    Err(ServiceError::BadRequest("Required part 'file' is not present".into()).into())
}

/// Long-lived cache headers for served images.
pub fn cache_headers(file_name: &str, ttl_secs: u64) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(content_type(file_name)),
    );
    if let Ok(value) = HeaderValue::from_str(&format!("max-age={}, public", ttl_secs)) {
        headers.insert(header::CACHE_CONTROL, value);
    }
    headers.insert(header::PRAGMA, HeaderValue::from_static("cache"));

    let capped = i64::try_from(ttl_secs).unwrap_or(MAX_EXPIRES_SECS).min(MAX_EXPIRES_SECS);
    let expires = Utc::now() + Duration::seconds(capped);
    if let Ok(value) =
        HeaderValue::from_str(&expires.format("%a, %d %b %Y %H:%M:%S GMT").to_string())
    {
        headers.insert(header::EXPIRES, value);
    }
    headers
}

#[utoipa::path(
    get,
    path = "/api/public-images/{fileName}",
    params(("fileName" = String, Path, description = "Stored image name")),
    responses(
        (status = 200, description = "Image bytes"),
        (status = 404, description = "No such image", body = crate::errors::ErrorResponse)
    ),
    tag = "images"
)]
pub async fn serve_image(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Result<Response, ApiError> {
    let data = state.services.images.load(&file_name).await?;
    let headers = cache_headers(&file_name, state.config.image_cache_ttl_secs());
    Ok((headers, data).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/public-images/{fileName}",
    params(("fileName" = String, Path, description = "Stored image name")),
    responses((status = 204, description = "Deleted or already absent")),
    tag = "images"
)]
pub async fn delete_image(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.services.images.delete(&file_name).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_headers_use_ttl_and_http_date() {
        let headers = cache_headers("logo.svg", 2_592_000);
        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "image/svg+xml");
        assert_eq!(
            headers.get(header::CACHE_CONTROL).unwrap(),
            "max-age=2592000, public"
        );
        assert_eq!(headers.get(header::PRAGMA).unwrap(), "cache");
        let expires = headers.get(header::EXPIRES).unwrap().to_str().unwrap();
        assert!(expires.ends_with(" GMT"));
        assert!(chrono::NaiveDateTime::parse_from_str(expires, "%a, %d %b %Y %H:%M:%S GMT").is_ok());
    }
}
