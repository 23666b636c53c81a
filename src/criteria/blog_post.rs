use chrono::{DateTime, Utc};
use sea_orm::DbBackend;

use super::{Criteria, CriteriaError, EnumFilter, Predicate, RangeFilter, StringFilter, StringTarget};
use crate::entities::blog_post::Column;
use crate::entities::CurrentStatus;
use crate::text::fold;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogPostCriteria {
    pub id: Option<RangeFilter<i64>>,
    /// `contains` on this field ignores case and diacritics.
    pub blog_post_title_vi: Option<StringFilter>,
    pub blog_post_description_vi: Option<StringFilter>,
    pub blog_post_content_vi: Option<StringFilter>,
    pub blog_post_title_en: Option<StringFilter>,
    pub blog_post_description_en: Option<StringFilter>,
    pub blog_post_content_en: Option<StringFilter>,
    pub blog_post_status: Option<EnumFilter<CurrentStatus>>,
    pub blog_post_author: Option<StringFilter>,
    pub blog_post_slug: Option<StringFilter>,
    pub time_to_publish: Option<RangeFilter<DateTime<Utc>>>,
    pub thumbnail_link: Option<StringFilter>,
    pub created_time: Option<RangeFilter<DateTime<Utc>>>,
    pub modified_time: Option<RangeFilter<DateTime<Utc>>>,
    pub modified_by: Option<StringFilter>,
    pub created_by: Option<StringFilter>,
    pub number_of_views: Option<RangeFilter<i32>>,
    pub category_id: Option<RangeFilter<i64>>,
    pub distinct: Option<bool>,
}

impl BlogPostCriteria {
    fn string_slot(&mut self, field: &str) -> Option<&mut Option<StringFilter>> {
        let slot = match field {
            "blogPostTitleVi" => &mut self.blog_post_title_vi,
            "blogPostDescriptionVi" => &mut self.blog_post_description_vi,
            "blogPostContentVi" => &mut self.blog_post_content_vi,
            "blogPostTitleEn" => &mut self.blog_post_title_en,
            "blogPostDescriptionEn" => &mut self.blog_post_description_en,
            "blogPostContentEn" => &mut self.blog_post_content_en,
            "blogPostAuthor" => &mut self.blog_post_author,
            "blogPostSlug" => &mut self.blog_post_slug,
            "thumbnailLink" => &mut self.thumbnail_link,
            "modifiedBy" => &mut self.modified_by,
            "createdBy" => &mut self.created_by,
            _ => return None,
        };
        Some(slot)
    }

    fn time_slot(&mut self, field: &str) -> Option<&mut Option<RangeFilter<DateTime<Utc>>>> {
        let slot = match field {
            "timeToPublish" => &mut self.time_to_publish,
            "createdTime" => &mut self.created_time,
            "modifiedTime" => &mut self.modified_time,
            _ => return None,
        };
        Some(slot)
    }
}

impl Criteria for BlogPostCriteria {
    fn apply_param(&mut self, field: &str, op: &str, value: &str) -> Result<bool, CriteriaError> {
        if let Some(slot) = self.string_slot(field) {
            slot.get_or_insert_with(Default::default)
                .apply(field, op, value)?;
            return Ok(true);
        }
        if let Some(slot) = self.time_slot(field) {
            slot.get_or_insert_with(Default::default)
                .apply(field, op, value)?;
            return Ok(true);
        }
        match field {
            "id" => self.id.get_or_insert_with(Default::default).apply(field, op, value)?,
            "blogPostStatus" => self
                .blog_post_status
                .get_or_insert_with(Default::default)
                .apply(field, op, value)?,
            "numberOfViews" => self
                .number_of_views
                .get_or_insert_with(Default::default)
                .apply(field, op, value)?,
            "categoryId" => self
                .category_id
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
        let time = |filter: &Option<RangeFilter<DateTime<Utc>>>, column: Column| {
            filter.as_ref().and_then(|f| f.to_condition(column))
        };

        let title_vi = self.blog_post_title_vi.as_ref().and_then(|f| {
            f.to_condition(
                StringTarget::Folded {
                    column: Column::BlogPostTitleVi,
                    folded: Column::TitleViFolded,
                    transform: fold,
                },
                backend,
            )
        });

        Predicate::all_of([
            self.id.as_ref().and_then(|f| f.to_condition(Column::Id)),
            title_vi,
            string(&self.blog_post_description_vi, Column::BlogPostDescriptionVi),
            string(&self.blog_post_content_vi, Column::BlogPostContentVi),
            string(&self.blog_post_title_en, Column::BlogPostTitleEn),
            string(&self.blog_post_description_en, Column::BlogPostDescriptionEn),
            string(&self.blog_post_content_en, Column::BlogPostContentEn),
            self.blog_post_status
                .as_ref()
                .and_then(|f| f.to_condition(Column::BlogPostStatus)),
            string(&self.blog_post_author, Column::BlogPostAuthor),
            string(&self.blog_post_slug, Column::BlogPostSlug),
            time(&self.time_to_publish, Column::TimeToPublish),
            string(&self.thumbnail_link, Column::ThumbnailLink),
            time(&self.created_time, Column::CreatedTime),
            time(&self.modified_time, Column::ModifiedTime),
            string(&self.modified_by, Column::ModifiedBy),
            string(&self.created_by, Column::CreatedBy),
            self.number_of_views
                .as_ref()
                .and_then(|f| f.to_condition(Column::NumberOfViews)),
            // many-to-one: the foreign key already holds the related id
            self.category_id
                .as_ref()
                .and_then(|f| f.to_condition(Column::CategoryId)),
        ])
        .with_distinct(self.distinct.unwrap_or(false))
    }
}
