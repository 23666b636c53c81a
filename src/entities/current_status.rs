use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Publication state shared by posts, categories and banners.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
    strum::EnumString,
    strum::AsRefStr,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CurrentStatus {
    #[sea_orm(string_value = "ENABLED")]
    Enabled,
    #[sea_orm(string_value = "DISABLED")]
    Disabled,
    #[sea_orm(string_value = "DRAFT")]
    Draft,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn parses_wire_names() {
        assert_eq!(
            CurrentStatus::from_str("ENABLED").unwrap(),
            CurrentStatus::Enabled
        );
        assert_eq!(CurrentStatus::Disabled.as_ref(), "DISABLED");
        assert!(CurrentStatus::from_str("enabled").is_err());
    }

    #[test]
    fn serde_uses_upper_case() {
        let json = serde_json::to_string(&CurrentStatus::Draft).unwrap();
        assert_eq!(json, "\"DRAFT\"");
    }
}
