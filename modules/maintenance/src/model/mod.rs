mod period;
mod state;

pub use period::*;
pub use state::*;

use asetrack_entity::{
    asset, maintenance_document,
    maintenance_report::{self, Condition},
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};
use time::{Date, OffsetDateTime};
use utoipa::ToSchema;
use uuid::Uuid;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// The group of rows without a sub-department.
pub const OTHER_GROUP: &str = "Other";

/// The kinds of assets maintenance is reported for.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Category {
    Laptop,
    Komputer,
}

impl Category {
    /// The path segment of the review page.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Laptop => "laptop",
            Self::Komputer => "komputer",
        }
    }

    pub fn review_path(&self) -> String {
        format!("/maintenance/{}", self.slug())
    }
}

/// A place in the organization. Empty parts are unknown, or match everything when filtering.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct Location {
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub sub_department: String,
}

impl Location {
    pub fn new(
        branch: impl Into<String>,
        department: impl Into<String>,
        sub_department: impl Into<String>,
    ) -> Self {
        Self {
            branch: branch.into(),
            department: department.into(),
            sub_department: sub_department.into(),
        }
    }

    /// Check if a location passes this location used as a filter.
    pub fn matches(&self, location: &Location) -> bool {
        fn part(filter: &str, value: &str) -> bool {
            filter.is_empty() || filter == value
        }

        part(&self.branch, &location.branch)
            && part(&self.department, &location.department)
            && part(&self.sub_department, &location.sub_department)
    }

    /// The name of the group rows at this location are listed under.
    pub fn group(&self) -> &str {
        if self.sub_department.is_empty() {
            OTHER_GROUP
        } else {
            &self.sub_department
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = [&self.branch, &self.department, &self.sub_department]
            .into_iter()
            .filter(|part| !part.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>();

        if parts.is_empty() {
            f.write_str("all locations")
        } else {
            f.write_str(&parts.join(" / "))
        }
    }
}

/// The holder of an asset, as captured by a report.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Snapshot {
    pub name: String,
    pub position: String,
    #[serde(flatten)]
    pub location: Location,
}

impl Snapshot {
    pub fn is_blank(&self) -> bool {
        self.name.is_empty()
    }
}

impl From<&maintenance_report::Model> for Snapshot {
    fn from(value: &maintenance_report::Model) -> Self {
        Self {
            name: value.user_name.clone(),
            position: value.user_position.clone(),
            location: Location::new(
                value.user_branch.clone(),
                value.user_department.clone(),
                value.user_sub_department.clone(),
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AssetHead {
    pub id: Uuid,
    pub inventory_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    pub asset_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_model: Option<String>,
    /// Set when the asset was removed from the inventory since
    #[serde(default)]
    pub deleted: bool,
}

impl From<asset::Model> for AssetHead {
    fn from(value: asset::Model) -> Self {
        Self {
            id: value.id,
            inventory_number: value.inventory_number,
            serial_number: value.serial_number,
            asset_name: value.asset_name,
            device_name: value.device_name,
            category: value.category,
            brand: value.brand,
            type_model: value.type_model,
            deleted: value.deleted_at.is_some(),
        }
    }
}

/// A maintenance report, as shown for review and in the history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReportDetails {
    pub id: Uuid,
    pub period: Period,
    pub antivirus_updated: bool,
    pub clear_temporary: bool,
    pub overall_condition: Condition,
    #[serde(with = "iso_date")]
    #[schema(value_type = String, format = Date)]
    pub inspection_date: Date,
    pub remarks: String,
    /// The admin who recorded the inspection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checker_id: Option<Uuid>,
    pub snapshot: Snapshot,
    #[serde(flatten)]
    pub state: ReportState,
}

impl TryFrom<&maintenance_report::Model> for ReportDetails {
    type Error = crate::Error;

    fn try_from(value: &maintenance_report::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id,
            period: value.period.parse()?,
            antivirus_updated: value.antivirus_updated,
            clear_temporary: value.clear_temporary,
            overall_condition: value.overall_condition,
            inspection_date: value.inspection_date,
            remarks: value.remarks.clone(),
            checker_id: value.checker_id,
            snapshot: value.into(),
            state: value.try_into()?,
        })
    }
}

/// The name an admin signs documents with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Signature {
    pub admin_id: Uuid,
    /// The linked employee's name, or the username
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub at: Option<OffsetDateTime>,
}

/// One asset on the review page, with its report if there is one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReviewRow {
    pub asset: AssetHead,
    /// The location the asset was filtered and grouped by
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportDetails>,
}

/// The review page of a category for one period.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReviewView {
    pub category: Category,
    pub period: Period,
    pub filter: Location,
    /// Rows by sub-department, in inventory number order
    pub groups: BTreeMap<String, Vec<ReviewRow>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitter: Option<Signature>,
    /// The years which can be selected
    pub years: Vec<i32>,
}

impl ReviewView {
    pub fn rows(&self) -> impl Iterator<Item = &ReviewRow> {
        self.groups.values().flatten()
    }

    /// Find the row of an asset.
    pub fn row(&self, asset_id: Uuid) -> Option<&ReviewRow> {
        self.rows().find(|row| row.asset.id == asset_id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DocumentSummary {
    pub id: Uuid,
    pub category: String,
    #[serde(flatten)]
    pub location: Location,
    pub period: Period,
    pub status: maintenance_document::Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_by: Option<Uuid>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub submitted_at: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<Uuid>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub approved_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl TryFrom<maintenance_document::Model> for DocumentSummary {
    type Error = crate::Error;

    fn try_from(value: maintenance_document::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id,
            category: value.category,
            location: Location::new(value.branch, value.department, value.sub_department),
            period: value.period.parse()?,
            status: value.status,
            submitted_by: value.submitted_by,
            submitted_at: value.submitted_at,
            approved_by: value.approved_by,
            approved_at: value.approved_at,
            created_at: value.created_at,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HistoryRow {
    pub asset: AssetHead,
    pub report: ReportDetails,
}

/// A submitted document, with the reports it froze.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HistoryDetail {
    pub document: DocumentSummary,
    /// Rows by snapshot sub-department, in inventory number order
    pub groups: BTreeMap<String, Vec<HistoryRow>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitter: Option<Signature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approver: Option<Signature>,
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "", "", true)]
    #[case("Jakarta", "", "", true)]
    #[case("Jakarta", "IT", "Infra", true)]
    #[case("Bandung", "", "", false)]
    #[case("", "", "Support", false)]
    fn location_filter(
        #[case] branch: &str,
        #[case] department: &str,
        #[case] sub_department: &str,
        #[case] expected: bool,
    ) {
        let filter = Location::new(branch, department, sub_department);
        assert_eq!(
            filter.matches(&Location::new("Jakarta", "IT", "Infra")),
            expected
        );
    }

    #[test]
    fn display() {
        assert_eq!(
            Location::new("Jakarta", "", "Infra").to_string(),
            "Jakarta / Infra"
        );
        assert_eq!(Location::default().to_string(), "all locations");
    }

    #[test]
    fn groups() {
        assert_eq!(Location::new("Jakarta", "IT", "Infra").group(), "Infra");
        assert_eq!(Location::new("Jakarta", "IT", "").group(), OTHER_GROUP);
        assert_eq!(Location::default().group(), OTHER_GROUP);
    }

    #[rstest]
    #[case("laptop", Category::Laptop)]
    #[case("Laptop", Category::Laptop)]
    #[case("komputer", Category::Komputer)]
    #[case("KOMPUTER", Category::Komputer)]
    fn category(#[case] input: &str, #[case] expected: Category) {
        assert_eq!(input.parse::<Category>(), Ok(expected));
    }

    #[test]
    fn category_names() {
        assert!("printer".parse::<Category>().is_err());
        assert_eq!(Category::Komputer.to_string(), "Komputer");
        assert_eq!(Category::Laptop.review_path(), "/maintenance/laptop");
    }
}
