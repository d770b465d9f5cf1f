use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "asset")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub inventory_number: String,
    pub serial_number: Option<String>,
    pub asset_name: String,
    /// The label printed on the device
    pub device_name: Option<String>,
    pub category: String,
    pub brand: Option<String>,
    pub type_model: Option<String>,
    pub status: String,

    /// The current holder
    pub employee_id: Option<Uuid>,

    pub created_at: TimeDateTimeWithTimeZone,
    pub updated_at: TimeDateTimeWithTimeZone,
    /// Set when the asset was removed from the inventory
    pub deleted_at: Option<TimeDateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id"
    )]
    Employee,
    #[sea_orm(has_many = "super::maintenance_report::Entity")]
    MaintenanceReport,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl Related<super::maintenance_report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MaintenanceReport.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
