use super::MaintenanceService;
use crate::{
    Error,
    model::{Category, DocumentSummary, Location, Period},
};
use asetrack_entity::{
    asset,
    maintenance_document::{self, Status},
    maintenance_report,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
    TransactionTrait,
    sea_query::{Expr, Query},
};
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

/// What a document is submitted, and approved, for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupingKey {
    pub category: Category,
    pub location: Location,
    pub period: Period,
}

impl MaintenanceService {
    /// Submit the draft reports of a location and period, freezing them into a new document.
    ///
    /// Empty parts of the location match every report. Fails with a conflict while a document
    /// for the same key awaits approval, and with not found if there is no draft to submit.
    #[instrument(skip(self), err(level=tracing::Level::INFO))]
    pub async fn submit(
        &self,
        key: &GroupingKey,
        actor: Option<Uuid>,
    ) -> Result<DocumentSummary, Error> {
        let tx = self.db.begin().await?;

        if find_submitted(key, &tx).await?.is_some() {
            return Err(Error::Conflict(format!(
                "a submission for {} is already awaiting approval",
                key.period
            )));
        }

        let now = OffsetDateTime::now_utc();
        let document = maintenance_document::ActiveModel {
            id: Set(Uuid::new_v4()),
            category: Set(key.category.to_string()),
            branch: Set(key.location.branch.clone()),
            department: Set(key.location.department.clone()),
            sub_department: Set(key.location.sub_department.clone()),
            period: Set(key.period.to_string()),
            status: Set(Status::Submitted),
            submitted_by: Set(actor),
            submitted_at: Set(Some(now)),
            approved_by: Set(None),
            approved_at: Set(None),
            created_at: Set(now),
        }
        .insert(&tx)
        .await?;

        let mut update = maintenance_report::Entity::update_many()
            .col_expr(
                maintenance_report::Column::DocumentId,
                Expr::value(document.id),
            )
            .col_expr(maintenance_report::Column::IsSubmitted, Expr::value(true))
            .col_expr(maintenance_report::Column::SubmittedBy, Expr::value(actor))
            .col_expr(maintenance_report::Column::SubmittedAt, Expr::value(now))
            .filter(maintenance_report::Column::Period.eq(key.period.to_string()))
            .filter(maintenance_report::Column::DocumentId.is_null())
            .filter(
                maintenance_report::Column::AssetId.in_subquery(
                    Query::select()
                        .column(asset::Column::Id)
                        .from(asset::Entity)
                        .and_where(asset::Column::Category.eq(key.category.as_ref()))
                        .to_owned(),
                ),
            );

        for (column, value) in [
            (maintenance_report::Column::UserBranch, &key.location.branch),
            (
                maintenance_report::Column::UserDepartment,
                &key.location.department,
            ),
            (
                maintenance_report::Column::UserSubDepartment,
                &key.location.sub_department,
            ),
        ] {
            if !value.is_empty() {
                update = update.filter(column.eq(value.as_str()));
            }
        }

        let result = update.exec(&tx).await?;
        if result.rows_affected == 0 {
            // dropping the transaction discards the document
            return Err(Error::NotFound(format!(
                "draft reports for {} at {}",
                key.period, key.location
            )));
        }

        tx.commit().await?;

        log::info!(
            "Submitted {} reports for {} into document {}",
            result.rows_affected,
            key.period,
            document.id
        );

        document.try_into()
    }

    /// Approve the document awaiting approval for a key, and all reports it holds.
    ///
    /// Nothing is changed if there is no such document.
    #[instrument(skip(self), err(level=tracing::Level::INFO))]
    pub async fn approve(
        &self,
        key: &GroupingKey,
        actor: Option<Uuid>,
    ) -> Result<DocumentSummary, Error> {
        let tx = self.db.begin().await?;

        let Some(document) = find_submitted(key, &tx).await? else {
            return Err(Error::NotFound("submission document".into()));
        };

        let now = OffsetDateTime::now_utc();
        let mut model: maintenance_document::ActiveModel = document.into();
        model.status = Set(Status::Approved);
        model.approved_by = Set(actor);
        model.approved_at = Set(Some(now));
        let document = model.update(&tx).await?;

        let result = maintenance_report::Entity::update_many()
            .col_expr(maintenance_report::Column::IsApproved, Expr::value(true))
            .col_expr(maintenance_report::Column::ApprovedBy, Expr::value(actor))
            .col_expr(maintenance_report::Column::ApprovedAt, Expr::value(now))
            .filter(maintenance_report::Column::DocumentId.eq(document.id))
            .exec(&tx)
            .await?;

        tx.commit().await?;

        log::info!(
            "Approved document {} with {} reports",
            document.id,
            result.rows_affected
        );

        document.try_into()
    }
}

async fn find_submitted<C: ConnectionTrait>(
    key: &GroupingKey,
    connection: &C,
) -> Result<Option<maintenance_document::Model>, Error> {
    use maintenance_document::Column;

    Ok(maintenance_document::Entity::find()
        .filter(Column::Category.eq(key.category.to_string()))
        .filter(Column::Branch.eq(key.location.branch.as_str()))
        .filter(Column::Department.eq(key.location.department.as_str()))
        .filter(Column::SubDepartment.eq(key.location.sub_department.as_str()))
        .filter(Column::Period.eq(key.period.to_string()))
        .filter(Column::Status.eq(Status::Submitted))
        .one(connection)
        .await?)
}
