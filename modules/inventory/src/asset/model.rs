use crate::employee::model::Employee;
use asetrack_entity::{asset, employee};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AssetSummary {
    pub id: Uuid,
    pub inventory_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    pub asset_name: String,
    /// The label printed on the device
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_model: Option<String>,
    pub status: String,
    /// The employee currently holding the asset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holder: Option<Employee>,
}

impl AssetSummary {
    pub fn from_entity(asset: asset::Model, holder: Option<employee::Model>) -> Self {
        Self {
            id: asset.id,
            inventory_number: asset.inventory_number,
            serial_number: asset.serial_number,
            asset_name: asset.asset_name,
            device_name: asset.device_name,
            category: asset.category,
            brand: asset.brand,
            type_model: asset.type_model,
            status: asset.status,
            holder: holder.map(Employee::from),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NewAsset {
    pub inventory_number: String,
    #[serde(default)]
    pub serial_number: Option<String>,
    pub asset_name: String,
    #[serde(default)]
    pub device_name: Option<String>,
    pub category: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub type_model: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub employee_id: Option<Uuid>,
}

fn default_status() -> String {
    "Ready".into()
}

/// Hand an asset over to an employee, or take it back when `employee_id` is absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Assignment {
    #[serde(default)]
    pub employee_id: Option<Uuid>,
    /// A new device label, keeps the current one if absent
    #[serde(default)]
    pub device_name: Option<String>,
}
