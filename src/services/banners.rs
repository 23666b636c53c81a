use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Set};
use tracing::{info, instrument};

use crate::db::DbPool;
use crate::entities::{banner, CurrentStatus};
use crate::errors::ServiceError;

pub const ENTITY_NAME: &str = "banner";

#[derive(Debug, Clone, Default)]
pub struct BannerInput {
    pub banner_link: Option<String>,
    pub banner_status: Option<CurrentStatus>,
    pub created_by: Option<String>,
    pub created_time: Option<DateTime<Utc>>,
    pub modified_time: Option<DateTime<Utc>>,
    pub modified_by: Option<String>,
}

#[derive(Clone)]
pub struct BannerService {
    db_pool: Arc<DbPool>,
}

impl BannerService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    fn required_link(input: &BannerInput) -> Result<String, ServiceError> {
        input
            .banner_link
            .clone()
            .filter(|link| !link.trim().is_empty())
            .ok_or_else(|| ServiceError::ValidationError("bannerLink must not be blank".into()))
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: BannerInput) -> Result<banner::Model, ServiceError> {
        let link = Self::required_link(&input)?;
        let created_time = input.created_time.unwrap_or_else(Utc::now);

        let model = banner::ActiveModel {
            banner_link: Set(link),
            banner_status: Set(input.banner_status),
            created_by: Set(input.created_by),
            created_time: Set(Some(created_time)),
            modified_time: Set(Some(input.modified_time.unwrap_or(created_time))),
            modified_by: Set(input.modified_by),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await?;

        info!(banner_id = model.id, "Created banner");
        Ok(model)
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i64, input: BannerInput) -> Result<banner::Model, ServiceError> {
        let existing = banner::Entity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| {
                ServiceError::bad_request_alert("Entity not found", ENTITY_NAME, "idnotfound")
            })?;
        let link = Self::required_link(&input)?;

        let created_time = input.created_time.or(existing.created_time);
        let created_by = input.created_by.or_else(|| existing.created_by.clone());
        let mut active = existing.into_active_model();
        active.banner_link = Set(link);
        active.banner_status = Set(input.banner_status);
        active.created_by = Set(created_by);
        active.created_time = Set(created_time);
        active.modified_time = Set(Some(input.modified_time.unwrap_or_else(Utc::now)));
        active.modified_by = Set(input.modified_by);

        let model = active.update(&*self.db_pool).await?;
        info!(banner_id = id, "Updated banner");
        Ok(model)
    }

    #[instrument(skip(self, input))]
    pub async fn partial_update(
        &self,
        id: i64,
        input: BannerInput,
    ) -> Result<Option<banner::Model>, ServiceError> {
        let Some(existing) = banner::Entity::find_by_id(id).one(&*self.db_pool).await? else {
            return Ok(None);
        };

        let mut active = existing.into_active_model();
        if let Some(link) = input.banner_link {
            active.banner_link = Set(link);
        }
        if let Some(status) = input.banner_status {
            active.banner_status = Set(Some(status));
        }
        if let Some(created_by) = input.created_by {
            active.created_by = Set(Some(created_by));
        }
        if let Some(created_time) = input.created_time {
            active.created_time = Set(Some(created_time));
        }
        if let Some(modified_by) = input.modified_by {
            active.modified_by = Set(Some(modified_by));
        }
        active.modified_time = Set(Some(input.modified_time.unwrap_or_else(Utc::now)));

        let model = active.update(&*self.db_pool).await?;
        info!(banner_id = id, "Partially updated banner");
        Ok(Some(model))
    }

    #[instrument(skip(self))]
    pub async fn find_one(&self, id: i64) -> Result<Option<banner::Model>, ServiceError> {
        Ok(banner::Entity::find_by_id(id).one(&*self.db_pool).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        banner::Entity::delete_by_id(id).exec(&*self.db_pool).await?;
        info!(banner_id = id, "Deleted banner");
        Ok(())
    }
}
