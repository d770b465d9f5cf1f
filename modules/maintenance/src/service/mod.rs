pub mod document;
pub mod history;
pub mod report;
pub mod review;


use crate::{Error, model::Signature};
use asetrack_common::db::Database;
use asetrack_entity::{admin, employee};
use sea_orm::{ConnectionTrait, EntityTrait};
use time::OffsetDateTime;
use uuid::Uuid;

/// The maintenance workflow: recording reports, submitting and approving them, and
/// looking at the results.
#[derive(Clone, Debug)]
pub struct MaintenanceService {
    db: Database,
}

impl MaintenanceService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

/// Resolve the signature of an admin, preferring the linked employee's name and position.
async fn signature<C: ConnectionTrait>(
    admin_id: Option<Uuid>,
    at: Option<OffsetDateTime>,
    connection: &C,
) -> Result<Option<Signature>, Error> {
    let Some(admin_id) = admin_id else {
        return Ok(None);
    };

    let Some((admin, employee)) = admin::Entity::find_by_id(admin_id)
        .find_also_related(employee::Entity)
        .one(connection)
        .await?
    else {
        log::debug!("Signing admin {admin_id} no longer exists");
        return Ok(None);
    };

    let (name, position) = match employee {
        Some(employee) => (
            employee.name,
            Some(employee.position).filter(|p| !p.is_empty()),
        ),
        None => (admin.username, None),
    };

    Ok(Some(Signature {
        admin_id,
        name,
        position,
        at,
    }))
}
