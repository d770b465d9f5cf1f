use asetrack_entity::employee;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Employee {
    pub id: Uuid,
    /// The employee number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nik: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub position: String,
    pub branch: String,
    pub department: String,
    pub sub_department: String,
}

impl From<employee::Model> for Employee {
    fn from(value: employee::Model) -> Self {
        Self {
            id: value.id,
            nik: value.nik,
            name: value.name,
            email: value.email,
            position: value.position,
            branch: value.branch,
            department: value.department,
            sub_department: value.sub_department,
        }
    }
}

/// The mutable attributes of an employee.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EmployeeData {
    #[serde(default)]
    pub nik: Option<String>,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub sub_department: String,
}
