use super::MaintenanceService;
use crate::{
    Error,
    model::{Location, Period, ReportDetails, Snapshot},
};
use asetrack_entity::{
    asset, employee,
    maintenance_report::{self, Condition},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, Set,
    sea_query::{Expr, OnConflict},
};
use time::{Date, OffsetDateTime};
use tracing::instrument;
use uuid::Uuid;

/// The inspection results of one asset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inspection {
    pub asset_id: Uuid,
    pub period: Period,
    pub antivirus_updated: bool,
    pub clear_temporary: bool,
    pub overall_condition: Condition,
    pub inspection_date: Date,
    pub remarks: String,
}

impl MaintenanceService {
    /// Record the inspection of an asset for a period.
    ///
    /// Creates the draft report of the asset for the period, capturing the current holder, or
    /// updates it if it exists. The captured holder of an existing report is only filled in when
    /// it is blank. Reports which were already submitted can't be changed.
    #[instrument(skip(self, inspection), fields(asset = %inspection.asset_id, period = %inspection.period), err(level=tracing::Level::INFO))]
    pub async fn store(
        &self,
        inspection: Inspection,
        checker: Option<Uuid>,
    ) -> Result<ReportDetails, Error> {
        let Some((_, holder)) = asset::Entity::find_by_id(inspection.asset_id)
            .filter(asset::Column::DeletedAt.is_null())
            .find_also_related(employee::Entity)
            .one(&self.db)
            .await?
        else {
            return Err(Error::NotFound(format!("asset '{}'", inspection.asset_id)));
        };

        let snapshot = holder.map(snapshot_of).unwrap_or_default();
        let period = inspection.period.to_string();
        let now = OffsetDateTime::now_utc();

        let existing = maintenance_report::Entity::find()
            .filter(maintenance_report::Column::AssetId.eq(inspection.asset_id))
            .filter(maintenance_report::Column::Period.eq(period.as_str()))
            .one(&self.db)
            .await?;

        let report = match existing {
            Some(existing) if existing.document_id.is_some() => {
                return Err(Error::Conflict("report already submitted".into()));
            }
            Some(existing) => {
                let backfill = Snapshot::from(&existing).is_blank();

                let mut model: maintenance_report::ActiveModel = existing.into();
                apply(&mut model, &inspection, checker);
                if backfill {
                    log::debug!("Backfilling blank holder of report for {period}");
                    set_snapshot(&mut model, snapshot);
                }
                model.updated_at = Set(now);

                model.update(&self.db).await?
            }
            None => {
                let mut model = maintenance_report::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    document_id: Set(None),
                    asset_id: Set(inspection.asset_id),
                    period: Set(period),
                    is_submitted: Set(false),
                    is_approved: Set(false),
                    submitted_by: Set(None),
                    submitted_at: Set(None),
                    approved_by: Set(None),
                    approved_at: Set(None),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                };
                apply(&mut model, &inspection, checker);
                set_snapshot(&mut model, snapshot);

                insert(model)
                    .exec_with_returning(&self.db)
                    .await
                    .map_err(frozen)?
            }
        };

        ReportDetails::try_from(&report)
    }
}

/// Insert a report, turning into an update of the inspection if a draft for the same asset
/// and period was created concurrently.
pub(super) fn insert(
    model: maintenance_report::ActiveModel,
) -> sea_orm::Insert<maintenance_report::ActiveModel> {
    use maintenance_report::Column;

    maintenance_report::Entity::insert(model).on_conflict(
        OnConflict::columns([Column::AssetId, Column::Period])
            .update_columns([
                Column::AntivirusUpdated,
                Column::ClearTemporary,
                Column::OverallCondition,
                Column::InspectionDate,
                Column::Remarks,
                Column::CheckerId,
                Column::UpdatedAt,
            ])
            .action_and_where(Expr::col((maintenance_report::Entity, Column::DocumentId)).is_null())
            .to_owned(),
    )
}

/// Map the outcome of an [`insert`] which didn't touch a row, because the report of the
/// asset got submitted in between.
pub(super) fn frozen(err: DbErr) -> Error {
    match err {
        DbErr::RecordNotInserted | DbErr::RecordNotFound(_) => {
            Error::Conflict("report already submitted".into())
        }
        err => err.into(),
    }
}

fn apply(
    model: &mut maintenance_report::ActiveModel,
    inspection: &Inspection,
    checker: Option<Uuid>,
) {
    model.antivirus_updated = Set(inspection.antivirus_updated);
    model.clear_temporary = Set(inspection.clear_temporary);
    model.overall_condition = Set(inspection.overall_condition);
    model.inspection_date = Set(inspection.inspection_date);
    model.remarks = Set(inspection.remarks.clone());
    model.checker_id = Set(checker);
}

fn set_snapshot(model: &mut maintenance_report::ActiveModel, snapshot: Snapshot) {
    model.user_name = Set(snapshot.name);
    model.user_position = Set(snapshot.position);
    model.user_branch = Set(snapshot.location.branch);
    model.user_department = Set(snapshot.location.department);
    model.user_sub_department = Set(snapshot.location.sub_department);
}

fn snapshot_of(employee: employee::Model) -> Snapshot {
    Snapshot {
        name: employee.name,
        position: employee.position,
        location: Location::new(
            employee.branch,
            employee.department,
            employee.sub_department,
        ),
    }
}
