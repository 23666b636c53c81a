use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Chemistry CMS API",
        version = "1.0.0",
        description = r#"
# Chemistry department content API

Blog posts, categories, homepage banners and uploaded images.

## Filtering

List and count endpoints accept `<field>.<operation>=<value>` parameters,
combined with AND. Operations are `equals`, `notEquals`, `specified`, `in`,
`notIn`, `contains`, `doesNotContain`, `greaterThan`, `greaterThanOrEqual`,
`lessThan` and `lessThanOrEqual`, as supported by the field type.
`blogPostTitleVi.contains` ignores case and Vietnamese diacritics.

## Pagination

`page` is zero-based, `size` defaults to 20 and `sort=<property>,(asc|desc)`
may repeat. Responses carry `X-Total-Count` and a `Link` header.

## Alerts

Mutations return `X-chemistry-alert` and `X-chemistry-params`; rejected
requests return `X-chemistry-error` with a translation key.
        "#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers((url = "http://localhost:8080", description = "Local development")),
    tags(
        (name = "blog-posts", description = "Blog post management, search and carousel"),
        (name = "categories", description = "Category hierarchy"),
        (name = "banners", description = "Homepage banners"),
        (name = "images", description = "Image upload and delivery")
    ),
    paths(
        crate::handlers::blog_posts::list_blog_posts,
        crate::handlers::blog_posts::count_blog_posts,
        crate::handlers::blog_posts::get_blog_post,
        crate::handlers::blog_posts::create_blog_post,
        crate::handlers::blog_posts::update_blog_post,
        crate::handlers::blog_posts::partial_update_blog_post,
        crate::handlers::blog_posts::delete_blog_post,
        crate::handlers::blog_posts::increment_blog_post_views,
        crate::handlers::blog_posts::search_blog_posts,
        crate::handlers::blog_posts::blog_post_carousel,

        crate::handlers::categories::list_categories,
        crate::handlers::categories::count_categories,
        crate::handlers::categories::enabled_categories,
        crate::handlers::categories::homepage_categories,
        crate::handlers::categories::get_category,
        crate::handlers::categories::create_category,
        crate::handlers::categories::update_category,
        crate::handlers::categories::partial_update_category,
        crate::handlers::categories::delete_category,

        crate::handlers::banners::list_banners,
        crate::handlers::banners::count_banners,
        crate::handlers::banners::get_banner,
        crate::handlers::banners::create_banner,
        crate::handlers::banners::update_banner,
        crate::handlers::banners::partial_update_banner,
        crate::handlers::banners::delete_banner,

        crate::handlers::images::upload_image,
        crate::handlers::images::serve_image,
        crate::handlers::images::delete_image,
    ),
    components(
        schemas(
            crate::entities::CurrentStatus,
            crate::handlers::common::EntityRef,

            crate::handlers::blog_posts::BlogPostRequest,
            crate::handlers::blog_posts::BlogPostSummary,
            crate::handlers::blog_posts::BlogPostResponse,
            crate::handlers::blog_posts::BlogPostCarouselItem,

            crate::handlers::categories::CategoryRequest,
            crate::handlers::categories::CategoryResponse,

            crate::handlers::banners::BannerRequest,
            crate::handlers::banners::BannerResponse,

            crate::handlers::images::ImageUploadResponse,

            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_every_resource() {
        let json = serde_json::to_string(&ApiDocV1::openapi()).unwrap();
        assert!(json.contains("Chemistry CMS API"));
        assert!(json.contains("/api/blog-posts/{id}/views"));
        assert!(json.contains("/api/categories/homepage"));
        assert!(json.contains("/api/banners/count"));
        assert!(json.contains("/api/public-images/{fileName}"));
    }
}
