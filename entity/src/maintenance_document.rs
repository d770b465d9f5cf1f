use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "maintenance_document")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub category: String,
    pub branch: String,
    pub department: String,
    pub sub_department: String,
    pub period: String,
    pub status: Status,

    pub submitted_by: Option<Uuid>,
    pub submitted_at: Option<TimeDateTimeWithTimeZone>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<TimeDateTimeWithTimeZone>,

    pub created_at: TimeDateTimeWithTimeZone,
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
    serde::Serialize,
    serde::Deserialize,
    utoipa::ToSchema,
)]
#[sea_orm(
    rs_type = "String",
    db_type = "Enum",
    enum_name = "maintenance_document_status"
)]
// When adding a new variant, also add this to the "maintenance_document_status" enum.
pub enum Status {
    #[sea_orm(string_value = "Submitted")]
    Submitted,
    #[sea_orm(string_value = "Approved")]
    Approved,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::maintenance_report::Entity")]
    Report,
}

impl Related<super::maintenance_report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Report.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn names() {
        assert_eq!(Status::Submitted.to_string(), "Submitted");
        assert_eq!("Approved".parse::<Status>(), Ok(Status::Approved));
    }
}
