pub mod banners;
pub mod blog_posts;
pub mod categories;
pub mod common;
pub mod images;

use crate::{
    config::AppConfig,
    db::DbPool,
    services::{
        banners::BannerService,
        blog_posts::BlogPostService,
        categories::CategoryService,
        images::{ImageService, ImageStore},
        query::{BannerQueryService, BlogPostQueryService, CategoryQueryService},
    },
};
use axum::Router;
use std::sync::Arc;

pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub blog_posts: Arc<BlogPostService>,
    pub blog_post_queries: Arc<BlogPostQueryService>,
    pub categories: Arc<CategoryService>,
    pub category_queries: Arc<CategoryQueryService>,
    pub banners: Arc<BannerService>,
    pub banner_queries: Arc<BannerQueryService>,
    pub images: Arc<ImageService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, config: &AppConfig, image_store: Arc<dyn ImageStore>) -> Self {
        Self {
            blog_posts: Arc::new(BlogPostService::new(db_pool.clone(), config.carousel_size)),
            blog_post_queries: Arc::new(BlogPostQueryService::new(db_pool.clone())),
            categories: Arc::new(CategoryService::new(
                db_pool.clone(),
                config.homepage_categories.clone(),
            )),
            category_queries: Arc::new(CategoryQueryService::new(db_pool.clone())),
            banners: Arc::new(BannerService::new(db_pool.clone())),
            banner_queries: Arc::new(BannerQueryService::new(db_pool)),
            images: Arc::new(ImageService::new(
                image_store,
                config.public_image_prefix.clone(),
            )),
        }
    }
}

/// Every resource router, relative to the `/api` prefix.
pub fn api_routes(config: &AppConfig) -> Router<AppState> {
    Router::new()
        .merge(blog_posts::blog_post_routes())
        .merge(categories::category_routes())
        .merge(banners::banner_routes())
        .merge(images::image_routes(config.max_upload_bytes))
}
