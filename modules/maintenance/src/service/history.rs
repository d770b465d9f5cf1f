use super::{MaintenanceService, signature};
use crate::{
    Error,
    model::{AssetHead, DocumentSummary, HistoryDetail, HistoryRow, ReportDetails, Snapshot},
};
use asetrack_common::model::{Paginated, PaginatedResults};
use asetrack_entity::{
    asset,
    maintenance_document::{self, Status},
    maintenance_report,
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use std::collections::BTreeMap;
use tracing::instrument;
use uuid::Uuid;

impl MaintenanceService {
    /// List all documents, newest first.
    #[instrument(skip(self), err(level=tracing::Level::INFO))]
    pub async fn history(
        &self,
        paginated: Paginated,
    ) -> Result<PaginatedResults<DocumentSummary>, Error> {
        let paginator = maintenance_document::Entity::find()
            .order_by_desc(maintenance_document::Column::CreatedAt)
            .order_by_asc(maintenance_document::Column::Id)
            .paginate(&self.db, paginated.page_size.get());

        let results = paginator
            .fetch_page(paginated.page)
            .await?
            .into_iter()
            .map(DocumentSummary::try_from)
            .collect::<Result<_, _>>()?;

        Ok(PaginatedResults::new(paginated, results, &paginator).await?)
    }

    /// The documents awaiting approval, most recently submitted first.
    #[instrument(skip(self), err(level=tracing::Level::INFO))]
    pub async fn pending(&self) -> Result<Vec<DocumentSummary>, Error> {
        maintenance_document::Entity::find()
            .filter(maintenance_document::Column::Status.eq(Status::Submitted))
            .order_by_desc(maintenance_document::Column::SubmittedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(DocumentSummary::try_from)
            .collect()
    }

    /// Get a document with the reports it holds, as they were submitted.
    ///
    /// Assets removed from the inventory since are still listed.
    #[instrument(skip(self), err(level=tracing::Level::INFO))]
    pub async fn history_detail(&self, id: Uuid) -> Result<Option<HistoryDetail>, Error> {
        let Some(document) = maintenance_document::Entity::find_by_id(id)
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let reports = maintenance_report::Entity::find()
            .filter(maintenance_report::Column::DocumentId.eq(id))
            .find_also_related(asset::Entity)
            .order_by_asc(asset::Column::InventoryNumber)
            .all(&self.db)
            .await?;

        let mut groups = BTreeMap::<String, Vec<HistoryRow>>::new();
        for (report, asset) in reports {
            let Some(asset) = asset else {
                log::warn!("Report {} references a missing asset", report.id);
                continue;
            };

            let group = Snapshot::from(&report).location.group().to_string();
            groups.entry(group).or_default().push(HistoryRow {
                asset: AssetHead::from(asset),
                report: ReportDetails::try_from(&report)?,
            });
        }

        let submitter = signature(document.submitted_by, document.submitted_at, &self.db).await?;
        let approver = signature(document.approved_by, document.approved_at, &self.db).await?;

        Ok(Some(HistoryDetail {
            document: document.try_into()?,
            groups,
            submitter,
            approver,
        }))
    }
}
