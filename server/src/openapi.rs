use crate::profile::api::{Config, configure};
use actix_web::App;
use asetrack_common::db;
use asetrack_module_account::config::SessionConfig;
use utoipa::openapi::{Info, License, OpenApi};
use utoipa_actix_web::AppExt;

pub fn default_openapi_info() -> Info {
    let mut info = Info::new("asetrack", env!("CARGO_PKG_VERSION"));
    info.description = Some("IT asset inventory and maintenance reporting".into());
    info.license = {
        let mut license = License::new("Apache License, Version 2.0");
        license.identifier = Some("Apache-2.0".into());
        Some(license)
    };
    info
}

/// Collect the API description of all endpoints.
pub async fn create_openapi() -> anyhow::Result<OpenApi> {
    let (db, postgresql) = db::embedded::create().await?;

    let (_, mut openapi) = App::new()
        .into_utoipa_app()
        .configure(|svc| {
            configure(
                svc,
                Config {
                    db,
                    session: SessionConfig::default(),
                },
            )
        })
        .split_for_parts();

    openapi.info = default_openapi_info();

    drop(postgresql);

    Ok(openapi)
}
