use super::{MaintenanceService, signature};
use crate::{
    Error,
    model::{AssetHead, Category, Location, Period, ReportDetails, ReviewRow, ReviewView},
};
use asetrack_entity::{asset, employee, maintenance_document, maintenance_report};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait,
};
use std::collections::{BTreeMap, HashMap};
use time::OffsetDateTime;
use tracing::instrument;

/// The first year reports can be selected for.
const FIRST_YEAR: i32 = 2024;

impl MaintenanceService {
    /// Build the review page of a category for a period.
    ///
    /// Lists every asset of the category with its report, if it has one which is not yet
    /// archived by an approval. Assets are located by the captured holder once their report
    /// was submitted, and by their current holder otherwise.
    #[instrument(skip(self), err(level=tracing::Level::INFO))]
    pub async fn review(
        &self,
        category: Category,
        period: Period,
        filter: Location,
    ) -> Result<ReviewView, Error> {
        let assets = asset::Entity::find()
            .filter(asset::Column::Category.eq(category.as_ref()))
            .filter(asset::Column::DeletedAt.is_null())
            .order_by_asc(asset::Column::InventoryNumber)
            .find_also_related(employee::Entity)
            .all(&self.db)
            .await?;

        let reports = maintenance_report::Entity::find()
            .join(
                JoinType::LeftJoin,
                maintenance_report::Relation::Document.def(),
            )
            .filter(maintenance_report::Column::Period.eq(period.to_string()))
            .filter(
                Condition::any()
                    .add(maintenance_report::Column::DocumentId.is_null())
                    .add(
                        maintenance_document::Column::Status
                            .eq(maintenance_document::Status::Submitted),
                    ),
            )
            .order_by_asc(maintenance_report::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let by_asset: HashMap<_, _> = reports.iter().map(|r| (r.asset_id, r)).collect();

        let mut groups = BTreeMap::<String, Vec<ReviewRow>>::new();
        for (asset, holder) in assets {
            // a report of another year doesn't count for this one
            let report = by_asset
                .get(&asset.id)
                .copied()
                .filter(|report| report.inspection_date.year() == period.year);

            let location = match report {
                Some(report) if report.is_submitted && !report.user_branch.is_empty() => {
                    Location::new(
                        report.user_branch.clone(),
                        report.user_department.clone(),
                        report.user_sub_department.clone(),
                    )
                }
                _ => holder
                    .map(|holder| {
                        Location::new(holder.branch, holder.department, holder.sub_department)
                    })
                    .unwrap_or_default(),
            };

            if !filter.matches(&location) {
                continue;
            }

            let report = report.map(ReportDetails::try_from).transpose()?;

            groups
                .entry(location.group().to_string())
                .or_default()
                .push(ReviewRow {
                    asset: AssetHead::from(asset),
                    location,
                    report,
                });
        }

        let submitter = match reports.iter().find(|report| {
            report.is_submitted
                && filter.matches(&Location::new(
                    report.user_branch.clone(),
                    report.user_department.clone(),
                    report.user_sub_department.clone(),
                ))
        }) {
            Some(report) => signature(report.submitted_by, report.submitted_at, &self.db).await?,
            None => None,
        };

        Ok(ReviewView {
            category,
            period,
            filter,
            groups,
            submitter,
            years: (FIRST_YEAR..=OffsetDateTime::now_utc().year() + 1).collect(),
        })
    }
}
