use chrono::{DateTime, Utc};
use sea_orm::DbBackend;

use super::{Criteria, CriteriaError, EnumFilter, Predicate, RangeFilter, StringFilter, StringTarget};
use crate::entities::banner::Column;
use crate::entities::CurrentStatus;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BannerCriteria {
    pub id: Option<RangeFilter<i64>>,
    pub banner_link: Option<StringFilter>,
    pub banner_status: Option<EnumFilter<CurrentStatus>>,
    pub created_by: Option<StringFilter>,
    pub created_time: Option<RangeFilter<DateTime<Utc>>>,
    pub modified_time: Option<RangeFilter<DateTime<Utc>>>,
    pub modified_by: Option<StringFilter>,
    pub distinct: Option<bool>,
}

impl Criteria for BannerCriteria {
    fn apply_param(&mut self, field: &str, op: &str, value: &str) -> Result<bool, CriteriaError> {
        match field {
            "id" => self.id.get_or_insert_with(Default::default).apply(field, op, value)?,
            "bannerLink" => self
                .banner_link
                .get_or_insert_with(Default::default)
                .apply(field, op, value)?,
            "bannerStatus" => self
                .banner_status
                .get_or_insert_with(Default::default)
                .apply(field, op, value)?,
            "createdBy" => self
                .created_by
                .get_or_insert_with(Default::default)
                .apply(field, op, value)?,
            "createdTime" => self
                .created_time
                .get_or_insert_with(Default::default)
                .apply(field, op, value)?,
            "modifiedTime" => self
                .modified_time
                .get_or_insert_with(Default::default)
                .apply(field, op, value)?,
            "modifiedBy" => self
                .modified_by
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
            string(&self.banner_link, Column::BannerLink),
            self.banner_status
                .as_ref()
                .and_then(|f| f.to_condition(Column::BannerStatus)),
            string(&self.created_by, Column::CreatedBy),
            self.created_time
                .as_ref()
                .and_then(|f| f.to_condition(Column::CreatedTime)),
            self.modified_time
                .as_ref()
                .and_then(|f| f.to_condition(Column::ModifiedTime)),
            string(&self.modified_by, Column::ModifiedBy),
        ])
        .with_distinct(self.distinct.unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::banner;
    use sea_orm::{EntityTrait, QueryTrait};

    #[test]
    fn status_and_link_filters_are_combined() {
        let criteria = BannerCriteria::from_pairs([
            ("bannerStatus.equals", "ENABLED"),
            ("bannerLink.contains", "promo"),
        ])
        .unwrap();
        let sql = criteria
            .to_predicate(DbBackend::Sqlite)
            .apply(banner::Entity::find())
            .build(DbBackend::Sqlite)
            .to_string();
        assert!(sql.contains(r#""banner"."banner_status" = 'ENABLED'"#), "{sql}");
        assert!(sql.contains("instr("), "{sql}");
        assert!(sql.contains(" AND "), "{sql}");
    }
}
