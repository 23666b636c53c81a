use std::marker::PhantomData;
use std::sync::Arc;

use sea_orm::ConnectionTrait;
use tracing::{debug, instrument};

use crate::criteria::Criteria;
use crate::db::{DbPool, Page, PageRequest, QueryBuilder, Sortable};
use crate::entities::{banner, blog_post, category};
use crate::errors::ServiceError;

/// Per-entity hook applied to each row of a paged listing.
pub trait PagedListing: Sortable {
    fn prepare_page_item(model: Self::Model) -> Self::Model {
        model
    }
}

impl PagedListing for blog_post::Entity {
    // Page responses never carry the long-form bodies.
    fn prepare_page_item(model: blog_post::Model) -> blog_post::Model {
        model.redact_content()
    }
}

impl PagedListing for category::Entity {}

impl PagedListing for banner::Entity {}

/// Read side shared by every entity: list, page and count by criteria.
pub struct QueryService<E, C> {
    db_pool: Arc<DbPool>,
    _marker: PhantomData<fn() -> (E, C)>,
}

impl<E, C> Clone for QueryService<E, C> {
    fn clone(&self) -> Self {
        Self {
            db_pool: self.db_pool.clone(),
            _marker: PhantomData,
        }
    }
}

pub type BlogPostQueryService = QueryService<blog_post::Entity, crate::criteria::BlogPostCriteria>;
pub type CategoryQueryService = QueryService<category::Entity, crate::criteria::CategoryCriteria>;
pub type BannerQueryService = QueryService<banner::Entity, crate::criteria::BannerCriteria>;

impl<E, C> QueryService<E, C>
where
    E: PagedListing,
    E::Model: Send + Sync,
    C: Criteria,
{
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            db_pool,
            _marker: PhantomData,
        }
    }

    fn builder(&self, criteria: &C) -> QueryBuilder<E> {
        let predicate = criteria.to_predicate(self.db_pool.get_database_backend());
        QueryBuilder::new(&predicate)
    }

    /// Every match, with all fields.
    #[instrument(skip(self))]
    pub async fn find_by_criteria(&self, criteria: &C) -> Result<Vec<E::Model>, ServiceError> {
        debug!("find by criteria");
        Ok(self.builder(criteria).all(&*self.db_pool).await?)
    }

    #[instrument(skip(self))]
    pub async fn find_page_by_criteria(
        &self,
        criteria: &C,
        page: &PageRequest,
    ) -> Result<Page<E::Model>, ServiceError> {
        let page = self.builder(criteria).page(&*self.db_pool, page).await?;
        Ok(page.map(E::prepare_page_item))
    }

    #[instrument(skip(self))]
    pub async fn count_by_criteria(&self, criteria: &C) -> Result<u64, ServiceError> {
        Ok(self.builder(criteria).count(&*self.db_pool).await?)
    }
}
