use chrono::{DateTime, Utc};
use sea_orm::DbBackend;

use super::predicate::one_to_many;
use super::{Criteria, CriteriaError, EnumFilter, Predicate, RangeFilter, StringFilter, StringTarget};
use crate::entities::category::Column;
use crate::entities::{blog_post, CurrentStatus};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryCriteria {
    pub id: Option<RangeFilter<i64>>,
    pub category_name: Option<StringFilter>,
    pub category_slug: Option<StringFilter>,
    pub category_status: Option<EnumFilter<CurrentStatus>>,
    pub created_by: Option<StringFilter>,
    pub created_time: Option<RangeFilter<DateTime<Utc>>>,
    pub blog_post_id: Option<RangeFilter<i64>>,
    pub sub_category_id: Option<RangeFilter<i64>>,
    pub parent_category_id: Option<RangeFilter<i64>>,
    pub distinct: Option<bool>,
}

impl Criteria for CategoryCriteria {
    fn apply_param(&mut self, field: &str, op: &str, value: &str) -> Result<bool, CriteriaError> {
        match field {
            "categoryName" | "categorySlug" | "createdBy" => {
                let slot = match field {
                    "categoryName" => &mut self.category_name,
                    "categorySlug" => &mut self.category_slug,
                    _ => &mut self.created_by,
                };
                slot.get_or_insert_with(Default::default)
                    .apply(field, op, value)?
            }
            "id" | "blogPostId" | "subCategoryId" | "parentCategoryId" => {
                let slot = match field {
                    "id" => &mut self.id,
                    "blogPostId" => &mut self.blog_post_id,
                    "subCategoryId" => &mut self.sub_category_id,
                    _ => &mut self.parent_category_id,
                };
                slot.get_or_insert_with(Default::default)
                    .apply(field, op, value)?
            }
            "categoryStatus" => self
                .category_status
                .get_or_insert_with(Default::default)
                .apply(field, op, value)?,
            "createdTime" => self
                .created_time
                .get_or_insert_with(Default::default)
                .apply(field, op, value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn set_distinct(&mut self, distinct: bool) {
        self.distinct = Some(distinct);
    }

    fn to_predicate(&self, backend: DbBackend) -> Predicate {
        let string = |filter: &Option<StringFilter>, column: Column| {
            filter
                .as_ref()
                .and_then(|f| f.to_condition(StringTarget::Plain(column), backend))
        };

        Predicate::all_of([
            self.id.as_ref().and_then(|f| f.to_condition(Column::Id)),
            string(&self.category_name, Column::CategoryName),
            string(&self.category_slug, Column::CategorySlug),
            self.category_status
                .as_ref()
                .and_then(|f| f.to_condition(Column::CategoryStatus)),
            string(&self.created_by, Column::CreatedBy),
            self.created_time
                .as_ref()
                .and_then(|f| f.to_condition(Column::CreatedTime)),
            self.blog_post_id.as_ref().and_then(|f| {
                one_to_many(
                    f,
                    Column::Id,
                    blog_post::Column::Id,
                    blog_post::Column::CategoryId,
                )
            }),
            self.sub_category_id.as_ref().and_then(|f| {
                one_to_many(f, Column::Id, Column::Id, Column::ParentCategoryId)
            }),
            self.parent_category_id
                .as_ref()
                .and_then(|f| f.to_condition(Column::ParentCategoryId)),
        ])
        .with_distinct(self.distinct.unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::category;
    use sea_orm::{EntityTrait, QueryTrait};

    fn sql(pairs: &[(&str, &str)]) -> String {
        CategoryCriteria::from_pairs(pairs.iter().copied())
            .unwrap()
            .to_predicate(DbBackend::Sqlite)
            .apply(category::Entity::find())
            .build(DbBackend::Sqlite)
            .to_string()
    }

    #[test]
    fn blog_post_join_compiles_to_a_sub_select() {
        let sql = sql(&[("blogPostId.equals", "12")]);
        assert!(sql.contains(r#""category"."id" IN (SELECT "category_id" FROM "blog_post""#), "{sql}");
        assert!(sql.contains(r#""blog_post"."id" = 12"#), "{sql}");
    }

    #[test]
    fn unspecified_sub_categories_select_leaves() {
        let sql = sql(&[("subCategoryId.specified", "false")]);
        assert!(sql.contains(r#""category"."id" NOT IN (SELECT "parent_category_id" FROM "category""#), "{sql}");
    }

    #[test]
    fn parent_join_filters_the_foreign_key() {
        let sql = sql(&[("parentCategoryId.equals", "1")]);
        assert!(sql.contains(r#""category"."parent_category_id" = 1"#), "{sql}");
    }
}
