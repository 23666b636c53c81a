use axum::{
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::error::DbErr;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::criteria::CriteriaError;

/// Header carrying the translation key of a failed mutation.
pub const ERROR_HEADER: &str = "x-chemistry-error";
/// Header carrying the entity name (errors) or the entity id (alerts).
pub const PARAMS_HEADER: &str = "x-chemistry-params";

fn current_request_id() -> Option<String> {
    crate::tracing::current_request_id().map(|rid| rid.as_str().to_string())
}

/// Error body returned by every endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "error": "Bad Request",
    "message": "A new blogPost cannot already have an ID",
    "entityName": "blogPost",
    "errorKey": "idexists",
    "requestId": "req-abc123xyz",
    "timestamp": "2024-12-09T10:30:00.000Z"
}))]
pub struct ErrorResponse {
    /// HTTP status category (e.g., "Not Found", "Bad Request")
    #[schema(example = "Bad Request")]
    pub error: String,
    /// Human-readable error description
    pub message: String,
    /// Entity the failed operation targeted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,
    /// Machine-readable error key (e.g. "idnull", "idinvalid")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_key: Option<String>,
    /// Unique request identifier for support and debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// ISO 8601 timestamp when error occurred
    pub timestamp: String,
}

#[derive(Debug, thiserror::Error, Serialize)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(
        #[from]
        #[serde(skip)]
        DbErr,
    ),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A client error tied to one entity and a stable error key.
    #[error("{message}")]
    BadRequestAlert {
        message: String,
        entity_name: String,
        error_key: String,
    },

    #[error("Unsupported filter operation '{operation}' on field '{field}'")]
    InvalidFilter { field: String, operation: String },

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Other error: {0}")]
    Other(
        #[from]
        #[serde(skip)]
        anyhow::Error,
    ),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl From<CriteriaError> for ServiceError {
    fn from(err: CriteriaError) -> Self {
        match err {
            CriteriaError::InvalidFilter { field, operation } => {
                ServiceError::InvalidFilter { field, operation }
            }
            other => ServiceError::BadRequest(other.to_string()),
        }
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        ServiceError::StorageError(err.to_string())
    }
}

impl ServiceError {
    pub fn bad_request_alert(
        message: impl Into<String>,
        entity_name: &str,
        error_key: &str,
    ) -> Self {
        ServiceError::BadRequestAlert {
            message: message.into(),
            entity_name: entity_name.to_string(),
            error_key: error_key.to_string(),
        }
    }

    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ValidationError(_) | Self::BadRequest(_) | Self::BadRequestAlert { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::DatabaseError(_)
            | Self::InvalidFilter { .. }
            | Self::StorageError(_)
            | Self::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Internal errors return generic messages to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "Database error".to_string(),
            Self::StorageError(_) | Self::Other(_) => {
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        }
    }

    fn alert(&self) -> Option<(&str, &str)> {
        match self {
            Self::BadRequestAlert {
                entity_name,
                error_key,
                ..
            } => Some((entity_name.as_str(), error_key.as_str())),
            _ => None,
        }
    }
}

fn error_response(
    status: StatusCode,
    message: String,
    alert: Option<(&str, &str)>,
) -> Response {
    let err = ErrorResponse {
        error: status.canonical_reason().unwrap_or("Error").to_string(),
        message,
        entity_name: alert.map(|(entity, _)| entity.to_string()),
        error_key: alert.map(|(_, key)| key.to_string()),
        request_id: current_request_id(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    let mut headers = HeaderMap::new();
    if let Some((entity, key)) = alert {
        if let Ok(value) = HeaderValue::from_str(&format!("error.{}", key)) {
            headers.insert(HeaderName::from_static(ERROR_HEADER), value);
        }
        if let Ok(value) = HeaderValue::from_str(entity) {
            headers.insert(HeaderName::from_static(PARAMS_HEADER), value);
        }
    }

    (status, headers, Json(err)).into_response()
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        error_response(status, self.response_message(), self.alert())
    }
}

/// API Error type for HTTP responses
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Service error: {0}")]
    ServiceError(#[from] ServiceError),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {message}")]
    BadRequest {
        message: String,
        error_code: Option<String>,
    },
}

impl From<CriteriaError> for ApiError {
    fn from(err: CriteriaError) -> Self {
        ApiError::ServiceError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Delegate to ServiceError's unified status/message methods when applicable
        let (status, message) = match self {
            ApiError::ServiceError(service_error) => return service_error.into_response(),
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest { message, .. } => (StatusCode::BAD_REQUEST, message),
        };

        error_response(status, message, None)
    }
}

pub type AppError = ServiceError;

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn service_error_response_includes_request_id() {
        let response =
            crate::tracing::scope_request_id(crate::tracing::RequestId::new("req-123"), async {
                ServiceError::NotFound("missing".into()).into_response()
            })
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload.request_id.as_deref(), Some("req-123"));
    }

    #[tokio::test]
    async fn bad_request_alert_sets_headers_and_body_keys() {
        let response =
            ServiceError::bad_request_alert("Invalid id", "blogPost", "idnull").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(ERROR_HEADER).unwrap(),
            "error.idnull"
        );
        assert_eq!(response.headers().get(PARAMS_HEADER).unwrap(), "blogPost");

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload.entity_name.as_deref(), Some("blogPost"));
        assert_eq!(payload.error_key.as_deref(), Some("idnull"));
        assert_eq!(payload.message, "Invalid id");
    }

    #[test]
    fn service_error_status_code_mapping() {
        assert_eq!(
            ServiceError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::ValidationError("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::InvalidFilter {
                field: "id".into(),
                operation: "near".into()
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ServiceError::StorageError("disk".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn service_error_response_message_hides_internal_details() {
        assert_eq!(
            ServiceError::StorageError("/var/upload: permission denied".into()).response_message(),
            "Internal server error"
        );
        assert_eq!(
            ServiceError::DatabaseError(DbErr::Custom("secret".into())).response_message(),
            "Database error"
        );
        assert_eq!(
            ServiceError::NotFound("Banner 3".into()).response_message(),
            "Not found: Banner 3"
        );
    }

    #[test]
    fn criteria_errors_split_between_server_and_client_faults() {
        let unknown_op = CriteriaError::InvalidFilter {
            field: "id".into(),
            operation: "near".into(),
        };
        assert_matches!(
            ServiceError::from(unknown_op),
            ServiceError::InvalidFilter { .. }
        );

        let bad_value = CriteriaError::InvalidValue {
            field: "id".into(),
            value: "abc".into(),
            reason: "not a number".into(),
        };
        assert_matches!(ServiceError::from(bad_value), ServiceError::BadRequest(_));
    }
}
