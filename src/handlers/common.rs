use crate::config::AppConfig;
use crate::db::{Direction, Page, PageRequest};
use crate::errors::{ApiError, ServiceError, PARAMS_HEADER};
use axum::http::{header, HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;
use utoipa::ToSchema;
use validator::Validate;

/// Header naming the translation key of a successful mutation.
pub const ALERT_HEADER: &str = "x-chemistry-alert";
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

const APPLICATION_NAME: &str = "chemistryApp";

/// Reference to a related row, `{ "id": n }` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EntityRef {
    #[schema(example = 1)]
    pub id: i64,
}

impl EntityRef {
    pub fn from_id(id: Option<i64>) -> Option<Self> {
        id.map(|id| Self { id })
    }
}

/// Validate request input
pub fn validate_input<T: Validate>(input: &T) -> Result<(), ApiError> {
    input
        .validate()
        .map_err(|e| ApiError::ValidationError(format!("Validation failed: {}", e)))
}

/// Headers announcing a create/update/delete, e.g.
/// `x-chemistry-alert: chemistryApp.banner.created`.
pub fn alert_headers(entity_name: &str, action: &str, id: i64) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&format!("{APPLICATION_NAME}.{entity_name}.{action}")) {
        headers.insert(HeaderName::from_static(ALERT_HEADER), value);
    }
    headers.insert(HeaderName::from_static(PARAMS_HEADER), HeaderValue::from(id));
    headers
}

/// POST bodies must not carry an id.
pub fn reject_id_on_create(id: Option<i64>, entity_name: &str) -> Result<(), ServiceError> {
    if id.is_some() {
        return Err(ServiceError::bad_request_alert(
            format!("A new {} cannot already have an ID", entity_name),
            entity_name,
            "idexists",
        ));
    }
    Ok(())
}

/// PUT and PATCH bodies must carry the id named in the path.
pub fn check_body_id(path_id: i64, body_id: Option<i64>, entity_name: &str) -> Result<(), ServiceError> {
    match body_id {
        None => Err(ServiceError::bad_request_alert(
            "Invalid id",
            entity_name,
            "idnull",
        )),
        Some(id) if id != path_id => Err(ServiceError::bad_request_alert(
            "Invalid ID",
            entity_name,
            "idinvalid",
        )),
        Some(_) => Ok(()),
    }
}

/// Reads `page`, `size` and repeated `sort=field,dir` from raw query pairs.
/// Sizes are clamped to the configured maximum.
pub fn page_request(pairs: &[(String, String)], config: &AppConfig) -> Result<PageRequest, ServiceError> {
    let mut page = 0;
    let mut size = config.default_page_size;
    let mut sort = Vec::new();

    for (key, value) in pairs {
        match key.as_str() {
            "page" => {
                page = value
                    .parse()
                    .map_err(|_| ServiceError::BadRequest(format!("Invalid page '{}'", value)))?
            }
            "size" => {
                size = value
                    .parse()
                    .map_err(|_| ServiceError::BadRequest(format!("Invalid size '{}'", value)))?
            }
            "sort" => {
                let (field, direction) = match value.split_once(',') {
                    Some((field, dir)) => {
                        let direction = match dir.to_ascii_lowercase().as_str() {
                            "asc" => Direction::Asc,
                            "desc" => Direction::Desc,
                            _ => {
                                return Err(ServiceError::BadRequest(format!(
                                    "Invalid sort direction '{}'",
                                    dir
                                )))
                            }
                        };
                        (field, direction)
                    }
                    None => (value.as_str(), Direction::Asc),
                };
                sort.push((field.to_string(), direction));
            }
            _ => {}
        }
    }

    let mut request = PageRequest::new(page, size.min(config.max_page_size));
    request.sort = sort;
    Ok(request)
}

/// `X-Total-Count` plus an RFC 5988 `Link` header with next/prev/last/first
/// relations, keeping every non-paging query parameter.
pub fn pagination_headers<T>(path: &str, pairs: &[(String, String)], page: &Page<T>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(TOTAL_COUNT_HEADER),
        HeaderValue::from(page.total_elements),
    );

    let mut kept = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().filter(|(key, _)| key != "page" && key != "size"))
        .finish();
    if !kept.is_empty() {
        kept.push('&');
    }
    let link = |number: u64, rel: &str| {
        format!(
            "<{}?{}page={}&size={}>; rel=\"{}\"",
            path, kept, number, page.size, rel
        )
    };

    let last = page.total_pages().saturating_sub(1);
    let mut links = Vec::new();
    if page.page < last {
        links.push(link(page.page + 1, "next"));
    }
    if page.page > 0 {
        links.push(link(page.page - 1, "prev"));
    }
    links.push(link(last, "last"));
    links.push(link(0, "first"));

    if let Ok(value) = HeaderValue::from_str(&links.join(",")) {
        headers.insert(header::LINK, value);
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn config() -> AppConfig {
        AppConfig::new(
            "sqlite::memory:".into(),
            "127.0.0.1".into(),
            8080,
            "test".into(),
        )
    }

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn page_request_defaults_and_clamps() {
        let cfg = config();
        let request = page_request(&[], &cfg).unwrap();
        assert_eq!(request.page, 0);
        assert_eq!(request.size, cfg.default_page_size);

        let request = page_request(&pairs(&[("size", "1000000")]), &cfg).unwrap();
        assert_eq!(request.size, cfg.max_page_size);
    }

    #[test]
    fn sort_parameters_repeat() {
        let request = page_request(
            &pairs(&[("sort", "modifiedTime,desc"), ("sort", "blogPostTitleVi")]),
            &config(),
        )
        .unwrap();
        assert_eq!(
            request.sort,
            vec![
                ("modifiedTime".to_string(), Direction::Desc),
                ("blogPostTitleVi".to_string(), Direction::Asc)
            ]
        );
    }

    #[test]
    fn bad_paging_values_are_client_errors() {
        assert_matches!(
            page_request(&pairs(&[("page", "first")]), &config()),
            Err(ServiceError::BadRequest(_))
        );
        assert_matches!(
            page_request(&pairs(&[("sort", "id,sideways")]), &config()),
            Err(ServiceError::BadRequest(_))
        );
    }

    #[test]
    fn body_id_rules() {
        assert_matches!(
            check_body_id(3, None, "banner"),
            Err(ServiceError::BadRequestAlert { error_key, .. }) if error_key == "idnull"
        );
        assert_matches!(
            check_body_id(3, Some(4), "banner"),
            Err(ServiceError::BadRequestAlert { error_key, .. }) if error_key == "idinvalid"
        );
        assert!(check_body_id(3, Some(3), "banner").is_ok());
        assert_matches!(
            reject_id_on_create(Some(1), "banner"),
            Err(ServiceError::BadRequestAlert { error_key, .. }) if error_key == "idexists"
        );
    }

    #[test]
    fn link_header_lists_neighbours() {
        let page = Page::<u8> {
            content: vec![],
            page: 1,
            size: 10,
            total_elements: 35,
        };
        let headers = pagination_headers(
            "/api/banners",
            &pairs(&[("bannerLink.contains", "a b"), ("page", "1")]),
            &page,
        );
        assert_eq!(headers.get(TOTAL_COUNT_HEADER).unwrap(), "35");
        let link = headers.get(header::LINK).unwrap().to_str().unwrap();
        assert!(link.contains("</api/banners?bannerLink.contains=a+b&page=2&size=10>; rel=\"next\""));
        assert!(link.contains("page=0&size=10>; rel=\"prev\""));
        assert!(link.contains("page=3&size=10>; rel=\"last\""));
        assert!(link.contains("page=0&size=10>; rel=\"first\""));
    }

    #[test]
    fn link_header_escapes_reserved_characters() {
        let page = Page::<()> {
            content: vec![],
            page: 0,
            size: 5,
            total_elements: 5,
        };
        let headers = pagination_headers(
            "/api/blog-posts",
            &pairs(&[("blogPostTitleVi.contains", "a&b=c"), ("sort", "id,desc")]),
            &page,
        );
        let link = headers.get(header::LINK).unwrap().to_str().unwrap();
        assert!(link.contains(
            "</api/blog-posts?blogPostTitleVi.contains=a%26b%3Dc&sort=id%2Cdesc&page=0&size=5>; rel=\"last\""
        ));
        assert!(!link.contains("rel=\"next\""));
    }
}
