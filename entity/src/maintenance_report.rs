use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "maintenance_report")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    /// The document this report was submitted with, `None` while in draft
    pub document_id: Option<Uuid>,
    pub asset_id: Uuid,
    /// The admin who recorded the inspection
    pub checker_id: Option<Uuid>,

    pub antivirus_updated: bool,
    pub clear_temporary: bool,
    pub overall_condition: Condition,
    pub inspection_date: TimeDate,
    pub remarks: String,
    /// Reporting cycle, like `S1-2025`
    pub period: String,

    // snapshot of the holder at the time the report was recorded
    pub user_name: String,
    pub user_position: String,
    pub user_branch: String,
    pub user_department: String,
    pub user_sub_department: String,

    pub is_submitted: bool,
    pub is_approved: bool,
    pub submitted_by: Option<Uuid>,
    pub submitted_at: Option<TimeDateTimeWithTimeZone>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<TimeDateTimeWithTimeZone>,

    pub created_at: TimeDateTimeWithTimeZone,
    pub updated_at: TimeDateTimeWithTimeZone,
}

#[derive(
    Debug,
    Copy,
    Clone,
    Hash,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    strum::Display,
    strum::EnumString,
    strum::VariantArray,
    serde::Serialize,
    serde::Deserialize,
    utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "overall_condition")]
// When adding a new variant, also add this to the "overall_condition" enum.
pub enum Condition {
    #[sea_orm(string_value = "Normal")]
    #[serde(rename = "Normal")]
    #[strum(serialize = "Normal")]
    Normal,
    #[sea_orm(string_value = "Tidak Normal")]
    #[serde(rename = "Tidak Normal")]
    #[strum(serialize = "Tidak Normal")]
    NotNormal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::asset::Entity",
        from = "Column::AssetId",
        to = "super::asset::Column::Id"
    )]
    Asset,
    #[sea_orm(
        belongs_to = "super::maintenance_document::Entity",
        from = "Column::DocumentId",
        to = "super::maintenance_document::Column::Id"
    )]
    Document,
}

impl Related<super::asset::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Asset.def()
    }
}

impl Related<super::maintenance_document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Document.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn condition_names() {
        assert_eq!(Condition::NotNormal.to_string(), "Tidak Normal");
        assert_eq!("Normal".parse::<Condition>(), Ok(Condition::Normal));
        assert!("normal".parse::<Condition>().is_err());
    }
}
