use super::model::{AssetSummary, Assignment, NewAsset};
use crate::Error;
use asetrack_common::{
    db::Database,
    model::{Paginated, PaginatedResults},
};
use asetrack_entity::{asset, employee};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, sea_query::Expr,
};
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct AssetService {
    db: Database,
}

impl AssetService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// List the assets still in the inventory, ordered by inventory number.
    #[instrument(skip(self), err(level=tracing::Level::INFO))]
    pub async fn list(
        &self,
        category: Option<&str>,
        q: Option<&str>,
        paginated: Paginated,
    ) -> Result<PaginatedResults<AssetSummary>, Error> {
        let mut select = asset::Entity::find()
            .filter(asset::Column::DeletedAt.is_null())
            .order_by_asc(asset::Column::InventoryNumber);

        if let Some(category) = category.filter(|c| !c.is_empty()) {
            select = select.filter(asset::Column::Category.eq(category));
        }
        if let Some(q) = q.filter(|q| !q.is_empty()) {
            select = select.filter(
                Condition::any()
                    .add(asset::Column::InventoryNumber.contains(q))
                    .add(asset::Column::AssetName.contains(q))
                    .add(asset::Column::SerialNumber.contains(q))
                    .add(asset::Column::DeviceName.contains(q)),
            );
        }

        let paginator = select
            .find_also_related(employee::Entity)
            .paginate(&self.db, paginated.page_size.get());
        let results = paginator
            .fetch_page(paginated.page)
            .await?
            .into_iter()
            .map(|(asset, holder)| AssetSummary::from_entity(asset, holder))
            .collect();

        Ok(PaginatedResults::new(paginated, results, &paginator).await?)
    }

    #[instrument(skip(self), err(level=tracing::Level::INFO))]
    pub async fn get(&self, id: Uuid) -> Result<Option<AssetSummary>, Error> {
        Ok(find_active(id, &self.db)
            .await?
            .map(|(asset, holder)| AssetSummary::from_entity(asset, holder)))
    }

    #[instrument(skip(self, data), fields(inventory_number = %data.inventory_number), err(level=tracing::Level::INFO))]
    pub async fn create(&self, data: NewAsset) -> Result<AssetSummary, Error> {
        if data.inventory_number.trim().is_empty() {
            return Err(Error::BadRequest("the inventory number must not be empty".into()));
        }
        if data.category.trim().is_empty() {
            return Err(Error::BadRequest("the category must not be empty".into()));
        }

        let holder = match data.employee_id {
            Some(id) => Some(find_employee(id, &self.db).await?),
            None => None,
        };

        let now = OffsetDateTime::now_utc();
        let model = asset::ActiveModel {
            id: Set(Uuid::new_v4()),
            inventory_number: Set(data.inventory_number),
            serial_number: Set(data.serial_number),
            asset_name: Set(data.asset_name),
            device_name: Set(data.device_name),
            category: Set(data.category),
            brand: Set(data.brand),
            type_model: Set(data.type_model),
            status: Set(data.status),
            employee_id: Set(data.employee_id),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(&self.db)
        .await?;

        log::info!(
            "Registered asset {} ({})",
            model.inventory_number,
            model.category
        );

        Ok(AssetSummary::from_entity(model, holder))
    }

    /// Change the holder of an asset.
    ///
    /// Reports which already captured the previous holder keep it.
    #[instrument(skip(self), err(level=tracing::Level::INFO))]
    pub async fn assign(&self, id: Uuid, assignment: Assignment) -> Result<AssetSummary, Error> {
        let Some((existing, _)) = find_active(id, &self.db).await? else {
            return Err(Error::NotFound(format!("asset '{id}'")));
        };

        let holder = match assignment.employee_id {
            Some(id) => Some(find_employee(id, &self.db).await?),
            None => None,
        };

        let mut model: asset::ActiveModel = existing.into();
        model.employee_id = Set(assignment.employee_id);
        if let Some(device_name) = assignment.device_name {
            model.device_name = Set(Some(device_name));
        }
        model.updated_at = Set(OffsetDateTime::now_utc());

        let model = model.update(&self.db).await?;

        Ok(AssetSummary::from_entity(model, holder))
    }

    /// Remove an asset from the inventory, returning `false` if there was no such asset.
    ///
    /// The row stays, so that maintenance history still resolves it.
    #[instrument(skip(self), err(level=tracing::Level::INFO))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, Error> {
        let result = asset::Entity::update_many()
            .col_expr(
                asset::Column::DeletedAt,
                Expr::value(OffsetDateTime::now_utc()),
            )
            .filter(asset::Column::Id.eq(id))
            .filter(asset::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

async fn find_active<C: ConnectionTrait>(
    id: Uuid,
    connection: &C,
) -> Result<Option<(asset::Model, Option<employee::Model>)>, Error> {
    Ok(asset::Entity::find_by_id(id)
        .filter(asset::Column::DeletedAt.is_null())
        .find_also_related(employee::Entity)
        .one(connection)
        .await?)
}

async fn find_employee<C: ConnectionTrait>(
    id: Uuid,
    connection: &C,
) -> Result<employee::Model, Error> {
    employee::Entity::find_by_id(id)
        .one(connection)
        .await?
        .ok_or_else(|| Error::NotFound(format!("employee '{id}'")))
}
