use asetrack_common::db::Database;
use asetrack_infrastructure::health::{Check, checks::Local};
use std::time::Duration;

pub mod api;

/// A common database check
pub fn spawn_db_check(db: Database) -> anyhow::Result<impl Check> {
    Local::spawn_periodic("no database connection", Duration::from_secs(1), {
        move || {
            let db = db.clone();
            async move {
                tokio::time::timeout(Duration::from_secs(5), async move { db.ping().await.is_ok() })
                    .await
                    .unwrap_or(false)
            }
        }
    })
}
