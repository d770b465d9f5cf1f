use asetrack_common::db::Database;
use utoipa_actix_web::service_config::ServiceConfig;

/// mount the "inventory" module
pub fn configure(svc: &mut ServiceConfig, db: Database) {
    crate::asset::endpoints::configure(svc, db.clone());
    crate::employee::endpoints::configure(svc, db);
}
