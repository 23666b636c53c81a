use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::CurrentStatus;

/// A node of the category tree. The child row holds the parent reference.
#[derive(Clone, Debug, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub category_name: String,
    pub category_slug: Option<String>,
    pub category_status: Option<CurrentStatus>,
    pub created_by: Option<String>,
    pub created_time: Option<DateTimeUtc>,
    pub parent_category_id: Option<i64>,
}

// Identity is the surrogate id only.
impl PartialEq for Model {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Model {}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::blog_post::Entity")]
    BlogPost,
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentCategoryId",
        to = "Column::Id",
        on_delete = "SetNull"
    )]
    ParentCategory,
}

impl Related<super::blog_post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BlogPost.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl crate::db::Sortable for Entity {
    fn sort_column(field: &str) -> Option<Column> {
        let column = match field {
            "id" => Column::Id,
            "categoryName" => Column::CategoryName,
            "categorySlug" => Column::CategorySlug,
            "categoryStatus" => Column::CategoryStatus,
            "createdBy" => Column::CreatedBy,
            "createdTime" => Column::CreatedTime,
            "parentCategory.id" | "parentCategoryId" => Column::ParentCategoryId,
            _ => return None,
        };
        Some(column)
    }

    fn id_column() -> Column {
        Column::Id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i64, name: &str) -> Model {
        Model {
            id,
            category_name: name.to_string(),
            category_slug: None,
            category_status: None,
            created_by: None,
            created_time: None,
            parent_category_id: None,
        }
    }

    #[test]
    fn equality_follows_id_only() {
        assert_eq!(category(1, "News"), category(1, "Renamed"));
        assert_ne!(category(1, "News"), category(2, "News"));
    }
}
