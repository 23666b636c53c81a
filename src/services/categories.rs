use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, Set,
    TransactionTrait,
};
use tracing::{info, instrument};

use super::category_tree::CategoryTree;
use crate::criteria::{CategoryCriteria, Filter};
use crate::db::DbPool;
use crate::entities::{blog_post, category, CurrentStatus};
use crate::errors::ServiceError;
use crate::services::query::CategoryQueryService;

pub const ENTITY_NAME: &str = "category";

#[derive(Debug, Clone, Default)]
pub struct CategoryInput {
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    pub category_status: Option<CurrentStatus>,
    pub created_by: Option<String>,
    pub created_time: Option<DateTime<Utc>>,
    pub parent_category_id: Option<i64>,
}

#[derive(Clone)]
pub struct CategoryService {
    db_pool: Arc<DbPool>,
    queries: CategoryQueryService,
    homepage_categories: Arc<Vec<String>>,
}

impl CategoryService {
    pub fn new(db_pool: Arc<DbPool>, homepage_categories: Vec<String>) -> Self {
        Self {
            queries: CategoryQueryService::new(db_pool.clone()),
            db_pool,
            homepage_categories: Arc::new(homepage_categories),
        }
    }

    fn required_name(input: &CategoryInput) -> Result<String, ServiceError> {
        input
            .category_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| {
                ServiceError::ValidationError("categoryName must not be blank".to_string())
            })
    }

    /// Validates a parent link before it is stored: the parent must exist
    /// and must not sit below `id` in the tree.
    async fn ensure_parent(&self, id: Option<i64>, parent: Option<i64>) -> Result<(), ServiceError> {
        let Some(parent) = parent else {
            return Ok(());
        };
        if category::Entity::find_by_id(parent)
            .one(&*self.db_pool)
            .await?
            .is_none()
        {
            return Err(ServiceError::bad_request_alert(
                format!("Parent category {} not found", parent),
                ENTITY_NAME,
                "parentnotfound",
            ));
        }
        if let Some(id) = id {
            let tree = CategoryTree::load(&*self.db_pool).await?;
            if tree.would_create_cycle(id, parent) {
                return Err(ServiceError::bad_request_alert(
                    "A category cannot be its own ancestor",
                    ENTITY_NAME,
                    "cyclicparent",
                ));
            }
        }
        Ok(())
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CategoryInput) -> Result<category::Model, ServiceError> {
        let name = Self::required_name(&input)?;
        self.ensure_parent(None, input.parent_category_id).await?;

        let model = category::ActiveModel {
            category_name: Set(name),
            category_slug: Set(input.category_slug),
            category_status: Set(input.category_status),
            created_by: Set(input.created_by),
            created_time: Set(Some(input.created_time.unwrap_or_else(Utc::now))),
            parent_category_id: Set(input.parent_category_id),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await?;

        info!(category_id = model.id, "Created category");
        Ok(model)
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i64,
        input: CategoryInput,
    ) -> Result<category::Model, ServiceError> {
        let existing = category::Entity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| {
                ServiceError::bad_request_alert("Entity not found", ENTITY_NAME, "idnotfound")
            })?;
        let name = Self::required_name(&input)?;
        self.ensure_parent(Some(id), input.parent_category_id).await?;

        let created_time = input.created_time.or(existing.created_time);
        let created_by = input.created_by.or_else(|| existing.created_by.clone());
        let mut active = existing.into_active_model();
        active.category_name = Set(name);
        active.category_slug = Set(input.category_slug);
        active.category_status = Set(input.category_status);
        active.created_by = Set(created_by);
        active.created_time = Set(created_time);
        active.parent_category_id = Set(input.parent_category_id);

        let model = active.update(&*self.db_pool).await?;
        info!(category_id = id, "Updated category");
        Ok(model)
    }

    #[instrument(skip(self, input))]
    pub async fn partial_update(
        &self,
        id: i64,
        input: CategoryInput,
    ) -> Result<Option<category::Model>, ServiceError> {
        let Some(existing) = category::Entity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
        else {
            return Ok(None);
        };
        self.ensure_parent(Some(id), input.parent_category_id).await?;

        let mut active = existing.into_active_model();
        if let Some(name) = input.category_name {
            active.category_name = Set(name);
        }
        if let Some(slug) = input.category_slug {
            active.category_slug = Set(Some(slug));
        }
        if let Some(status) = input.category_status {
            active.category_status = Set(Some(status));
        }
        if let Some(created_by) = input.created_by {
            active.created_by = Set(Some(created_by));
        }
        if let Some(created_time) = input.created_time {
            active.created_time = Set(Some(created_time));
        }
        if let Some(parent) = input.parent_category_id {
            active.parent_category_id = Set(Some(parent));
        }

        let model = active.update(&*self.db_pool).await?;
        info!(category_id = id, "Partially updated category");
        Ok(Some(model))
    }

    #[instrument(skip(self))]
    pub async fn find_one(&self, id: i64) -> Result<Option<category::Model>, ServiceError> {
        Ok(category::Entity::find_by_id(id).one(&*self.db_pool).await?)
    }

    /// Deletes the category and its posts. Direct sub-categories are kept
    /// and become roots.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let txn = self.db_pool.begin().await?;

        let posts = blog_post::Entity::delete_many()
            .filter(blog_post::Column::CategoryId.eq(id))
            .exec(&txn)
            .await?;
        let detached = category::Entity::update_many()
            .col_expr(
                category::Column::ParentCategoryId,
                Expr::value(Option::<i64>::None),
            )
            .filter(category::Column::ParentCategoryId.eq(id))
            .exec(&txn)
            .await?;
        category::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        info!(
            category_id = id,
            deleted_posts = posts.rows_affected,
            detached_children = detached.rows_affected,
            "Deleted category"
        );
        Ok(())
    }

    /// Categories with status `ENABLED`.
    #[instrument(skip(self))]
    pub async fn enabled(&self) -> Result<Vec<category::Model>, ServiceError> {
        let criteria = CategoryCriteria {
            category_status: Some(Filter {
                equals: Some(CurrentStatus::Enabled),
                ..Default::default()
            }),
            ..Default::default()
        };
        self.queries.find_by_criteria(&criteria).await
    }

    /// Categories featured on the homepage, in configured order.
    #[instrument(skip(self))]
    pub async fn homepage(&self) -> Result<Vec<category::Model>, ServiceError> {
        let mut criteria = CategoryCriteria::default();
        criteria
            .category_name
            .get_or_insert_with(Default::default)
            .base
            .in_list = Some(self.homepage_categories.as_ref().clone());

        let mut categories = self.queries.find_by_criteria(&criteria).await?;
        let rank = |model: &category::Model| {
            self.homepage_categories
                .iter()
                .position(|name| *name == model.category_name)
                .unwrap_or(usize::MAX)
        };
        categories.sort_by_key(|model| (rank(model), model.id));
        Ok(categories)
    }
}
