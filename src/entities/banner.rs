use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::CurrentStatus;

#[derive(Clone, Debug, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "banner")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub banner_link: String,
    pub banner_status: Option<CurrentStatus>,
    pub created_by: Option<String>,
    pub created_time: Option<DateTimeUtc>,
    pub modified_time: Option<DateTimeUtc>,
    pub modified_by: Option<String>,
}

impl PartialEq for Model {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Model {}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl crate::db::Sortable for Entity {
    fn sort_column(field: &str) -> Option<Column> {
        let column = match field {
            "id" => Column::Id,
            "bannerLink" => Column::BannerLink,
            "bannerStatus" => Column::BannerStatus,
            "createdBy" => Column::CreatedBy,
            "createdTime" => Column::CreatedTime,
            "modifiedTime" => Column::ModifiedTime,
            "modifiedBy" => Column::ModifiedBy,
            _ => return None,
        };
        Some(column)
    }

    fn id_column() -> Column {
        Column::Id
    }
}
