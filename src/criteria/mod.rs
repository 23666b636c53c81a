//! Criteria query builder.
//!
//! A criteria object is a bag of independently optional per-field filters
//! parsed from flat `field.operation=value` query parameters. Each present
//! filter compiles to a `Condition` fragment and the fragments are AND-folded
//! into a [`Predicate`] the executor can list, page or count with.

mod banner;
mod blog_post;
mod category;
pub mod filter;
pub mod predicate;

pub use banner::BannerCriteria;
pub use blog_post::BlogPostCriteria;
pub use category::CategoryCriteria;
pub use filter::{
    BooleanFilter, EnumFilter, Filter, FilterValue, RangeFilter, StringFilter, StringTarget,
};
pub use predicate::Predicate;

use sea_orm::DbBackend;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CriteriaError {
    #[error("Unsupported filter operation '{operation}' on field '{field}'")]
    InvalidFilter { field: String, operation: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown sort property '{0}'")]
    InvalidSort(String),
}

/// Implemented by every entity's criteria object.
pub trait Criteria: Default + std::fmt::Debug {
    /// Records one `field.op=value` parameter. Returns `Ok(false)` when the
    /// field does not belong to this entity.
    fn apply_param(&mut self, field: &str, op: &str, value: &str) -> Result<bool, CriteriaError>;

    fn set_distinct(&mut self, distinct: bool);

    fn to_predicate(&self, backend: DbBackend) -> Predicate;

    /// Builds criteria from raw query pairs. Keys without an operation
    /// suffix (`page`, `size`, `sort`) and unknown fields are ignored.
    fn from_pairs<I, K, V>(pairs: I) -> Result<Self, CriteriaError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut criteria = Self::default();
        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            if key == "distinct" {
                let distinct =
                    filter::parse_bool(value).map_err(|reason| CriteriaError::InvalidValue {
                        field: key.to_string(),
                        value: value.to_string(),
                        reason,
                    })?;
                criteria.set_distinct(distinct);
                continue;
            }
            if let Some((field, op)) = key.rsplit_once('.') {
                criteria.apply_param(field, op, value)?;
            }
        }
        Ok(criteria)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn paging_keys_and_unknown_fields_are_ignored() {
        let criteria = BannerCriteria::from_pairs([
            ("page", "2"),
            ("size", "10"),
            ("sort", "id,desc"),
            ("colour.equals", "red"),
        ])
        .unwrap();
        assert_eq!(criteria, BannerCriteria::default());
    }

    #[test]
    fn distinct_flag_requires_a_boolean() {
        assert_matches!(
            BannerCriteria::from_pairs([("distinct", "maybe")]),
            Err(CriteriaError::InvalidValue { field, .. }) if field == "distinct"
        );
        let criteria = BannerCriteria::from_pairs([("distinct", "true")]).unwrap();
        assert!(criteria.distinct.unwrap_or(false));
    }

    #[test]
    fn known_field_with_unknown_operation_fails() {
        assert_matches!(
            BannerCriteria::from_pairs([("bannerLink.startsWith", "http")]),
            Err(CriteriaError::InvalidFilter { field, operation })
                if field == "bannerLink" && operation == "startsWith"
        );
    }
}
