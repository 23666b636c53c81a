use sea_orm::sea_query::{Query, SimpleExpr, TableRef};
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QuerySelect, Select};

use super::filter::RangeFilter;
use super::FilterValue;

/// The composed, store-executable form of a criteria object.
#[derive(Debug, Clone)]
pub struct Predicate {
    pub condition: Condition,
    pub distinct: bool,
}

impl Default for Predicate {
    fn default() -> Self {
        Self {
            condition: Condition::all(),
            distinct: false,
        }
    }
}

impl Predicate {
    /// AND-folds the present fragments. Absent fragments add nothing, so a
    /// criteria object with no filters matches every row.
    pub fn all_of<I>(fragments: I) -> Self
    where
        I: IntoIterator<Item = Option<Condition>>,
    {
        let condition = fragments
            .into_iter()
            .flatten()
            .fold(Condition::all(), |acc, fragment| acc.add(fragment));
        Self {
            condition,
            distinct: false,
        }
    }

    pub fn with_distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    pub fn and(mut self, condition: Condition) -> Self {
        self.condition = self.condition.add(condition);
        self
    }

    pub fn apply<E: EntityTrait>(&self, select: Select<E>) -> Select<E> {
        let select = if self.distinct {
            select.distinct()
        } else {
            select
        };
        select.filter(self.condition.clone())
    }
}

/// Compiles a range filter over the ids of a one-to-many relation into
/// `owner_id IN (SELECT fk FROM related WHERE ...)`.
///
/// `specified=false` means "has no related rows" and becomes a `NOT IN`
/// over the non-null foreign keys.
pub fn one_to_many<T, O, R>(
    filter: &RangeFilter<T>,
    owner_id: O,
    related_id: R,
    related_fk: R,
) -> Option<Condition>
where
    T: FilterValue,
    O: ColumnTrait,
    R: ColumnTrait,
{
    let linked = |extra: Option<Condition>| {
        let mut inner = Condition::all().add(related_fk.is_not_null());
        if let Some(extra) = extra {
            inner = inner.add(extra);
        }
        Query::select()
            .column(related_fk)
            .from(TableRef::Table(related_fk.entity_name()))
            .cond_where(inner)
            .to_owned()
    };

    let mut parts: Vec<SimpleExpr> = Vec::new();
    if filter.base.specified == Some(false) {
        parts.push(owner_id.not_in_subquery(linked(None)));
    }
    let rest = filter.without_specified();
    if filter.base.specified == Some(true) || !rest.is_empty() {
        parts.push(owner_id.in_subquery(linked(rest.to_condition(related_id))));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.into_iter().fold(Condition::all(), |acc, p| acc.add(p)))
    }
}
