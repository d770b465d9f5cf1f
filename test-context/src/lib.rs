#![allow(clippy::expect_used)]

pub mod app;
pub mod auth;
pub mod call;

use asetrack_common::{config, db};
use asetrack_entity::{admin, asset, employee};
use postgresql_embedded::PostgreSQL;
use sea_orm::{ActiveModelTrait, Set};
use std::env;
use test_context::AsyncTestContext;
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

/// A database for a test, either an embedded instance or an external one.
#[allow(dead_code)]
pub struct AsetrackContext {
    pub db: db::Database,
    postgresql: Option<PostgreSQL>,
}

impl AsetrackContext {
    async fn new(db: db::Database, postgresql: impl Into<Option<PostgreSQL>>) -> Self {
        Self {
            db,
            postgresql: postgresql.into(),
        }
    }

    /// Insert an employee placed in the given organizational unit.
    pub async fn employee(
        &self,
        name: &str,
        branch: &str,
        department: &str,
        sub_department: &str,
    ) -> Result<employee::Model, anyhow::Error> {
        let now = OffsetDateTime::now_utc();
        Ok(employee::ActiveModel {
            id: Set(Uuid::new_v4()),
            nik: Set(None),
            name: Set(name.to_string()),
            email: Set(None),
            position: Set("Staff".to_string()),
            branch: Set(branch.to_string()),
            department: Set(department.to_string()),
            sub_department: Set(sub_department.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?)
    }

    /// Insert an asset of a category, optionally held by an employee.
    pub async fn asset(
        &self,
        inventory_number: &str,
        category: &str,
        employee_id: Option<Uuid>,
    ) -> Result<asset::Model, anyhow::Error> {
        let now = OffsetDateTime::now_utc();
        Ok(asset::ActiveModel {
            id: Set(Uuid::new_v4()),
            inventory_number: Set(inventory_number.to_string()),
            serial_number: Set(None),
            asset_name: Set(format!("{category} {inventory_number}")),
            device_name: Set(None),
            category: Set(category.to_string()),
            brand: Set(None),
            type_model: Set(None),
            status: Set("Ready".to_string()),
            employee_id: Set(employee_id),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(&self.db)
        .await?)
    }

    /// Insert an admin account. The password hash is not usable for logging in.
    pub async fn admin(
        &self,
        username: &str,
        role: &str,
        employee_id: Option<Uuid>,
    ) -> Result<admin::Model, anyhow::Error> {
        Ok(admin::ActiveModel {
            id: Set(Uuid::new_v4()),
            employee_id: Set(employee_id),
            username: Set(username.to_string()),
            password: Set("-".to_string()),
            role: Set(role.to_string()),
            created_at: Set(OffsetDateTime::now_utc()),
        }
        .insert(&self.db)
        .await?)
    }
}

impl AsyncTestContext for AsetrackContext {
    #[instrument]
    async fn setup() -> AsetrackContext {
        if env::var("EXTERNAL_TEST_DB").is_ok() {
            log::warn!("Using external database from 'DB_*' env vars");
            let config = config::Database::from_env().expect("DB config from env");

            let db = if env::var("EXTERNAL_TEST_DB_BOOTSTRAP").is_ok() {
                db::Database::bootstrap(&config).await
            } else {
                db::Database::new(&config).await
            }
            .expect("Configuring the database");

            return AsetrackContext::new(db, None).await;
        }

        let (db, postgresql) = db::embedded::create()
            .await
            .expect("Create an embedded database");

        AsetrackContext::new(db, postgresql).await
    }
}

impl std::fmt::Debug for AsetrackContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsetrackContext")
            .field("db", &self.db.name())
            .field("embedded", &self.postgresql.is_some())
            .finish()
    }
}
