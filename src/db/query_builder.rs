use sea_orm::{
    ConnectionTrait, EntityTrait, IdenStatic, Order, PaginatorTrait, QueryOrder, QuerySelect,
    Select,
};
use serde::Deserialize;

use crate::criteria::{CriteriaError, Predicate};

/// Sort direction of one `sort=field,dir` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

impl From<Direction> for Order {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Asc => Order::Asc,
            Direction::Desc => Order::Desc,
        }
    }
}

/// A zero-based page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
    pub sort: Vec<(String, Direction)>,
}

impl PageRequest {
    pub fn new(page: u64, size: u64) -> Self {
        Self {
            page,
            size: size.max(1),
            sort: Vec::new(),
        }
    }

    pub fn sorted_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.sort.push((field.into(), direction));
        self
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }
}

/// One page of results together with the total number of matches.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            return 0;
        }
        self.total_elements.div_ceil(self.size)
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
        }
    }
}

/// An entity whose rows can be listed by criteria. `sort_column` is the
/// whitelist of client-visible sort properties.
pub trait Sortable: EntityTrait {
    fn sort_column(field: &str) -> Option<Self::Column>;

    fn id_column() -> Self::Column;
}

/// Runs a predicate against one entity's table.
pub struct QueryBuilder<E: Sortable> {
    query: Select<E>,
}

impl<E: Sortable> QueryBuilder<E> {
    pub fn new(predicate: &Predicate) -> Self {
        Self {
            query: predicate.apply(E::find()),
        }
    }

    /// All matches in id order.
    pub async fn all<C: ConnectionTrait>(self, db: &C) -> Result<Vec<E::Model>, sea_orm::DbErr> {
        self.query.order_by_asc(E::id_column()).all(db).await
    }

    pub async fn count<C: ConnectionTrait>(self, db: &C) -> Result<u64, sea_orm::DbErr>
    where
        E::Model: Send + Sync,
    {
        self.query.count(db).await
    }

    /// Applies the requested sort, always ending with the id so pages are
    /// stable across requests.
    pub fn ordered(mut self, sort: &[(String, Direction)]) -> Result<Self, CriteriaError> {
        let id = E::id_column();
        let mut has_id = false;
        for (field, direction) in sort {
            let column =
                E::sort_column(field).ok_or_else(|| CriteriaError::InvalidSort(field.clone()))?;
            has_id |= column.as_str() == id.as_str();
            self.query = self.query.order_by(column, (*direction).into());
        }
        if !has_id {
            self.query = self.query.order_by_asc(id);
        }
        Ok(self)
    }

    pub async fn page<C: ConnectionTrait>(
        self,
        db: &C,
        request: &PageRequest,
    ) -> Result<Page<E::Model>, crate::errors::ServiceError>
    where
        E::Model: Send + Sync,
    {
        let total_elements = self.query.clone().count(db).await?;
        let content = self
            .ordered(&request.sort)?
            .query
            .limit(request.size)
            .offset(request.offset())
            .all(db)
            .await?;

        Ok(Page {
            content,
            page: request.page,
            size: request.size,
            total_elements,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_rounds_up() {
        let page = Page::<u8> {
            content: vec![],
            page: 0,
            size: 20,
            total_elements: 41,
        };
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn offset_follows_zero_based_page() {
        assert_eq!(PageRequest::new(0, 20).offset(), 0);
        assert_eq!(PageRequest::new(3, 20).offset(), 60);
    }

    #[test]
    fn zero_size_is_clamped() {
        assert_eq!(PageRequest::new(0, 0).size, 1);
    }
}
