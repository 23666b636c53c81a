use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};

use super::CurrentStatus;
use crate::text::{fold, fold_html};

/// A bilingual post. The `*_folded` columns are derived on save and only
/// exist so accent-insensitive filters and search can run in SQL.
#[derive(Clone, Debug, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "blog_post")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub blog_post_title_vi: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub blog_post_description_vi: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub blog_post_content_vi: Option<String>,
    pub blog_post_title_en: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub blog_post_description_en: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub blog_post_content_en: Option<String>,
    pub blog_post_status: Option<CurrentStatus>,
    pub blog_post_author: Option<String>,
    pub blog_post_slug: Option<String>,
    pub time_to_publish: Option<DateTimeUtc>,
    pub thumbnail_link: Option<String>,
    pub created_time: Option<DateTimeUtc>,
    pub modified_time: Option<DateTimeUtc>,
    pub modified_by: Option<String>,
    pub created_by: Option<String>,
    pub number_of_views: Option<i32>,
    pub category_id: Option<i64>,
    #[serde(skip)]
    pub title_vi_folded: Option<String>,
    #[serde(skip)]
    pub title_en_folded: Option<String>,
    #[serde(skip)]
    #[sea_orm(column_type = "Text", nullable)]
    pub content_vi_folded: Option<String>,
    #[serde(skip)]
    #[sea_orm(column_type = "Text", nullable)]
    pub content_en_folded: Option<String>,
}

impl Model {
    /// Drops the long-form bodies; used for paged listings.
    pub fn redact_content(mut self) -> Self {
        self.blog_post_content_vi = None;
        self.blog_post_content_en = None;
        self
    }
}

impl PartialEq for Model {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Model {}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "Cascade"
    )]
    Category,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl crate::db::Sortable for Entity {
    fn sort_column(field: &str) -> Option<Column> {
        let column = match field {
            "id" => Column::Id,
            "blogPostTitleVi" => Column::BlogPostTitleVi,
            "blogPostTitleEn" => Column::BlogPostTitleEn,
            "blogPostStatus" => Column::BlogPostStatus,
            "blogPostAuthor" => Column::BlogPostAuthor,
            "blogPostSlug" => Column::BlogPostSlug,
            "timeToPublish" => Column::TimeToPublish,
            "createdTime" => Column::CreatedTime,
            "modifiedTime" => Column::ModifiedTime,
            "modifiedBy" => Column::ModifiedBy,
            "createdBy" => Column::CreatedBy,
            "numberOfViews" => Column::NumberOfViews,
            "category.id" | "categoryId" => Column::CategoryId,
            _ => return None,
        };
        Some(column)
    }

    fn id_column() -> Column {
        Column::Id
    }
}

fn refold<F>(source: &ActiveValue<Option<String>>, target: &mut ActiveValue<Option<String>>, f: F)
where
    F: Fn(&str) -> String,
{
    if let ActiveValue::Set(value) = source {
        *target = Set(value.as_deref().map(&f));
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C: ConnectionTrait>(self, _db: &C, _insert: bool) -> Result<Self, DbErr> {
        let mut active_model = self;
        if let ActiveValue::Set(title) = &active_model.blog_post_title_vi {
            active_model.title_vi_folded = Set(Some(fold(title)));
        }
        refold(
            &active_model.blog_post_title_en,
            &mut active_model.title_en_folded,
            fold,
        );
        refold(
            &active_model.blog_post_content_vi,
            &mut active_model.content_vi_folded,
            fold_html,
        );
        refold(
            &active_model.blog_post_content_en,
            &mut active_model.content_en_folded,
            fold_html,
        );
        Ok(active_model)
    }
}
