use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::{info, instrument};

use crate::criteria::filter::substring_expr;
use crate::db::DbPool;
use crate::entities::{blog_post, category, CurrentStatus};
use crate::errors::ServiceError;
use crate::text::fold;

pub const ENTITY_NAME: &str = "blogPost";

/// Field values of a post as submitted by a client. `None` means "not
/// provided"; full updates write it as NULL, partial updates skip it.
#[derive(Debug, Clone, Default)]
pub struct BlogPostInput {
    pub blog_post_title_vi: Option<String>,
    pub blog_post_description_vi: Option<String>,
    pub blog_post_content_vi: Option<String>,
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
    pub number_of_views: Option<i32>,
    pub category_id: Option<i64>,
}

/// Commands and non-criteria reads for blog posts.
#[derive(Clone)]
pub struct BlogPostService {
    db_pool: Arc<DbPool>,
    carousel_size: u64,
}

impl BlogPostService {
    pub fn new(db_pool: Arc<DbPool>, carousel_size: u64) -> Self {
        Self {
            db_pool,
            carousel_size,
        }
    }

    /// Category links are only written after the referenced row is found.
    async fn ensure_category(&self, category_id: Option<i64>) -> Result<(), ServiceError> {
        let Some(category_id) = category_id else {
            return Ok(());
        };
        let exists = category::Entity::find_by_id(category_id)
            .one(&*self.db_pool)
            .await?
            .is_some();
        if exists {
            Ok(())
        } else {
            Err(ServiceError::bad_request_alert(
                format!("Category {} not found", category_id),
                ENTITY_NAME,
                "categorynotfound",
            ))
        }
    }

    fn required_title(input: &BlogPostInput) -> Result<String, ServiceError> {
        input
            .blog_post_title_vi
            .clone()
            .filter(|title| !title.trim().is_empty())
            .ok_or_else(|| {
                ServiceError::ValidationError("blogPostTitleVi must not be blank".to_string())
            })
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: BlogPostInput) -> Result<blog_post::Model, ServiceError> {
        let title = Self::required_title(&input)?;
        self.ensure_category(input.category_id).await?;

        let created_time = input.created_time.unwrap_or_else(Utc::now);
        let post = blog_post::ActiveModel {
            blog_post_title_vi: Set(title),
            blog_post_description_vi: Set(input.blog_post_description_vi),
            blog_post_content_vi: Set(input.blog_post_content_vi),
            blog_post_title_en: Set(input.blog_post_title_en),
            blog_post_description_en: Set(input.blog_post_description_en),
            blog_post_content_en: Set(input.blog_post_content_en),
            blog_post_status: Set(input.blog_post_status),
            blog_post_author: Set(input.blog_post_author),
            blog_post_slug: Set(input.blog_post_slug),
            time_to_publish: Set(input.time_to_publish),
            thumbnail_link: Set(input.thumbnail_link),
            created_time: Set(Some(created_time)),
            modified_time: Set(Some(input.modified_time.unwrap_or(created_time))),
            modified_by: Set(input.modified_by),
            created_by: Set(input.created_by),
            number_of_views: Set(input.number_of_views),
            category_id: Set(input.category_id),
            ..Default::default()
        };

        let post = post.insert(&*self.db_pool).await?;
        info!(blog_post_id = post.id, "Created blog post");
        Ok(post)
    }

    /// Replaces every client-editable field. Creation audit fields are kept
    /// when the body omits them.
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i64,
        input: BlogPostInput,
    ) -> Result<blog_post::Model, ServiceError> {
        let existing = blog_post::Entity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| {
                ServiceError::bad_request_alert("Entity not found", ENTITY_NAME, "idnotfound")
            })?;
        let title = Self::required_title(&input)?;
        self.ensure_category(input.category_id).await?;

        let created_time = input.created_time.or(existing.created_time);
        let created_by = input.created_by.or_else(|| existing.created_by.clone());
        let mut active = existing.into_active_model();
        active.blog_post_title_vi = Set(title);
        active.blog_post_description_vi = Set(input.blog_post_description_vi);
        active.blog_post_content_vi = Set(input.blog_post_content_vi);
        active.blog_post_title_en = Set(input.blog_post_title_en);
        active.blog_post_description_en = Set(input.blog_post_description_en);
        active.blog_post_content_en = Set(input.blog_post_content_en);
        active.blog_post_status = Set(input.blog_post_status);
        active.blog_post_author = Set(input.blog_post_author);
        active.blog_post_slug = Set(input.blog_post_slug);
        active.time_to_publish = Set(input.time_to_publish);
        active.thumbnail_link = Set(input.thumbnail_link);
        active.created_time = Set(created_time);
        active.modified_time = Set(Some(input.modified_time.unwrap_or_else(Utc::now)));
        active.modified_by = Set(input.modified_by);
        active.created_by = Set(created_by);
        active.number_of_views = Set(input.number_of_views);
        active.category_id = Set(input.category_id);

        let post = active.update(&*self.db_pool).await?;
        info!(blog_post_id = id, "Updated blog post");
        Ok(post)
    }

    /// Overwrites only the provided fields. `Ok(None)` when the post does
    /// not exist.
    #[instrument(skip(self, input))]
    pub async fn partial_update(
        &self,
        id: i64,
        input: BlogPostInput,
    ) -> Result<Option<blog_post::Model>, ServiceError> {
        let Some(existing) = blog_post::Entity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
        else {
            return Ok(None);
        };
        self.ensure_category(input.category_id).await?;

        let mut active = existing.into_active_model();
        if let Some(title) = input.blog_post_title_vi {
            active.blog_post_title_vi = Set(title);
        }
        if let Some(description) = input.blog_post_description_vi {
            active.blog_post_description_vi = Set(Some(description));
        }
        if let Some(content) = input.blog_post_content_vi {
            active.blog_post_content_vi = Set(Some(content));
        }
        if let Some(title) = input.blog_post_title_en {
            active.blog_post_title_en = Set(Some(title));
        }
        if let Some(description) = input.blog_post_description_en {
            active.blog_post_description_en = Set(Some(description));
        }
        if let Some(content) = input.blog_post_content_en {
            active.blog_post_content_en = Set(Some(content));
        }
        if let Some(status) = input.blog_post_status {
            active.blog_post_status = Set(Some(status));
        }
        if let Some(author) = input.blog_post_author {
            active.blog_post_author = Set(Some(author));
        }
        if let Some(slug) = input.blog_post_slug {
            active.blog_post_slug = Set(Some(slug));
        }
        if let Some(time_to_publish) = input.time_to_publish {
            active.time_to_publish = Set(Some(time_to_publish));
        }
        if let Some(thumbnail) = input.thumbnail_link {
            active.thumbnail_link = Set(Some(thumbnail));
        }
        if let Some(created_time) = input.created_time {
            active.created_time = Set(Some(created_time));
        }
        if let Some(modified_by) = input.modified_by {
            active.modified_by = Set(Some(modified_by));
        }
        if let Some(created_by) = input.created_by {
            active.created_by = Set(Some(created_by));
        }
        if let Some(views) = input.number_of_views {
            active.number_of_views = Set(Some(views));
        }
        if let Some(category_id) = input.category_id {
            active.category_id = Set(Some(category_id));
        }
        active.modified_time = Set(Some(input.modified_time.unwrap_or_else(Utc::now)));

        let post = active.update(&*self.db_pool).await?;
        info!(blog_post_id = id, "Partially updated blog post");
        Ok(Some(post))
    }

    #[instrument(skip(self))]
    pub async fn find_one(&self, id: i64) -> Result<Option<blog_post::Model>, ServiceError> {
        Ok(blog_post::Entity::find_by_id(id).one(&*self.db_pool).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let result = blog_post::Entity::delete_by_id(id)
            .exec(&*self.db_pool)
            .await?;
        info!(
            blog_post_id = id,
            rows = result.rows_affected,
            "Deleted blog post"
        );
        Ok(())
    }

    /// Adds one view in a single `UPDATE`; an unset counter becomes 1.
    #[instrument(skip(self))]
    pub async fn increment_views(&self, id: i64) -> Result<blog_post::Model, ServiceError> {
        let result = blog_post::Entity::update_many()
            .col_expr(
                blog_post::Column::NumberOfViews,
                Expr::col(blog_post::Column::NumberOfViews)
                    .if_null(0)
                    .add(1),
            )
            .filter(blog_post::Column::Id.eq(id))
            .exec(&*self.db_pool)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::bad_request_alert(
                "Entity not found",
                ENTITY_NAME,
                "idnotfound",
            ));
        }

        blog_post::Entity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Blog post {} not found", id)))
    }

    /// Accent- and case-insensitive match on the localized title or the
    /// tag-stripped localized body. `en` selects English, anything else
    /// Vietnamese.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        query_string: &str,
        language: &str,
    ) -> Result<Vec<blog_post::Model>, ServiceError> {
        let needle = fold(query_string.trim());
        let (title, content) = if language == "en" {
            (
                blog_post::Column::TitleEnFolded,
                blog_post::Column::ContentEnFolded,
            )
        } else {
            (
                blog_post::Column::TitleViFolded,
                blog_post::Column::ContentViFolded,
            )
        };
        let backend = self.db_pool.get_database_backend();

        Ok(blog_post::Entity::find()
            .filter(
                Condition::any()
                    .add(substring_expr(content, &needle, backend))
                    .add(substring_expr(title, &needle, backend)),
            )
            .order_by_asc(blog_post::Column::Id)
            .all(&*self.db_pool)
            .await?)
    }

    /// Latest published, enabled posts for the homepage carousel.
    #[instrument(skip(self))]
    pub async fn carousel(&self) -> Result<Vec<blog_post::Model>, ServiceError> {
        Ok(blog_post::Entity::find()
            .filter(blog_post::Column::BlogPostStatus.eq(CurrentStatus::Enabled))
            .filter(blog_post::Column::TimeToPublish.lte(Utc::now()))
            .order_by_desc(blog_post::Column::ModifiedTime)
            .order_by_desc(blog_post::Column::Id)
            .limit(self.carousel_size)
            .all(&*self.db_pool)
            .await?)
    }
}
