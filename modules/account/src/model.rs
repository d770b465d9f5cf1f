use asetrack_auth::{Resource, Role, authenticator::user::UserDetails};
use asetrack_entity::{admin, employee};
use serde::{Deserialize, Serialize};
use strum::VariantArray;
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

/// The currently logged in admin.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Profile {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    pub role: Role,
    /// The resources the admin may access
    #[schema(value_type = Vec<String>)]
    pub permissions: Vec<Resource>,
}

impl From<UserDetails> for Profile {
    fn from(value: UserDetails) -> Self {
        let permissions = Resource::VARIANTS
            .iter()
            .copied()
            .filter(|resource| value.role.can_access(*resource, &value.permissions))
            .collect();

        Self {
            id: value.id,
            username: value.username,
            display_name: value.display_name,
            position: value.position,
            role: value.role,
            permissions,
        }
    }
}

/// The grants of one role.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RolePermissions {
    pub role: Role,
    #[schema(value_type = Vec<String>)]
    pub granted: Vec<Resource>,
}

/// An admin account, as listed in the settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AdminSummary {
    pub id: Uuid,
    pub username: String,
    /// The stored role, which might not be a known one
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<Uuid>,
    /// The name of the linked employee
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: OffsetDateTime,
}

impl From<(admin::Model, Option<employee::Model>)> for AdminSummary {
    fn from((admin, employee): (admin::Model, Option<employee::Model>)) -> Self {
        Self {
            id: admin.id,
            username: admin.username,
            role: admin.role,
            employee_id: admin.employee_id,
            employee_name: employee.map(|employee| employee.name),
            created_at: admin.created_at,
        }
    }
}

/// What is needed to create or update an admin account.
#[derive(Clone, Debug)]
pub struct AdminAccount {
    pub username: String,
    /// Required when creating, keeps the current password when updating if missing
    pub password: Option<String>,
    pub role: Role,
    pub employee_id: Option<Uuid>,
}
