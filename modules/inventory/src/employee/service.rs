use super::model::{Employee, EmployeeData};
use crate::Error;
use asetrack_common::{
    db::Database,
    model::{Paginated, PaginatedResults},
};
use asetrack_entity::employee;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct EmployeeService {
    db: Database,
}

impl EmployeeService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// List employees ordered by name, optionally only those whose name or number contains `q`.
    #[instrument(skip(self), err(level=tracing::Level::INFO))]
    pub async fn list(
        &self,
        q: Option<&str>,
        paginated: Paginated,
    ) -> Result<PaginatedResults<Employee>, Error> {
        let mut select = employee::Entity::find().order_by_asc(employee::Column::Name);
        if let Some(q) = q.filter(|q| !q.is_empty()) {
            select = select.filter(
                Condition::any()
                    .add(employee::Column::Name.contains(q))
                    .add(employee::Column::Nik.contains(q)),
            );
        }

        let paginator = select.paginate(&self.db, paginated.page_size.get());
        let results = paginator
            .fetch_page(paginated.page)
            .await?
            .into_iter()
            .map(Employee::from)
            .collect();

        Ok(PaginatedResults::new(paginated, results, &paginator).await?)
    }

    #[instrument(skip(self), err(level=tracing::Level::INFO))]
    pub async fn get(&self, id: Uuid) -> Result<Option<Employee>, Error> {
        Ok(employee::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Employee::from))
    }

    #[instrument(skip(self, data), err(level=tracing::Level::INFO))]
    pub async fn create(&self, data: EmployeeData) -> Result<Employee, Error> {
        validate(&data)?;

        let now = OffsetDateTime::now_utc();
        let model = employee::ActiveModel {
            id: Set(Uuid::new_v4()),
            nik: Set(data.nik),
            name: Set(data.name),
            email: Set(data.email),
            position: Set(data.position),
            branch: Set(data.branch),
            department: Set(data.department),
            sub_department: Set(data.sub_department),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        log::info!("Created employee {} ({})", model.name, model.id);

        Ok(model.into())
    }

    /// Replace the attributes of an employee.
    ///
    /// Reports which already captured the previous placement keep it.
    #[instrument(skip(self, data), err(level=tracing::Level::INFO))]
    pub async fn update(&self, id: Uuid, data: EmployeeData) -> Result<Employee, Error> {
        validate(&data)?;

        let Some(existing) = employee::Entity::find_by_id(id).one(&self.db).await? else {
            return Err(Error::NotFound(format!("employee '{id}'")));
        };

        let mut model: employee::ActiveModel = existing.into();
        model.nik = Set(data.nik);
        model.name = Set(data.name);
        model.email = Set(data.email);
        model.position = Set(data.position);
        model.branch = Set(data.branch);
        model.department = Set(data.department);
        model.sub_department = Set(data.sub_department);
        model.updated_at = Set(OffsetDateTime::now_utc());

        Ok(model.update(&self.db).await?.into())
    }

    /// Delete an employee, returning `false` if it did not exist.
    #[instrument(skip(self), err(level=tracing::Level::INFO))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, Error> {
        let result = employee::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}

fn validate(data: &EmployeeData) -> Result<(), Error> {
    if data.name.trim().is_empty() {
        return Err(Error::BadRequest("the name must not be empty".into()));
    }
    Ok(())
}
