use crate::{openapi::default_openapi_info, profile::spawn_db_check};
use asetrack_auth::authorizer::Authorizer;
use asetrack_common::{
    config::{CreationMode, Database},
    db,
};
use asetrack_infrastructure::{
    Infrastructure, InfrastructureConfig, InitContext,
    app::http::{HttpServerBuilder, HttpServerConfig},
};
use asetrack_module_account::{authenticator::SessionAuthenticator, config::SessionConfig};
use std::{process::ExitCode, sync::Arc};
use utoipa_actix_web::service_config::ServiceConfig;

/// Run the API server
#[derive(clap::Args, Debug)]
pub struct Run {
    /// How to prepare the database schema on startup
    #[arg(long, env, value_enum, default_value_t = CreationMode::Default)]
    pub creation: CreationMode,

    // flattened commands must go last
    //
    /// Database configuration
    #[command(flatten)]
    pub database: Database,

    #[command(flatten)]
    pub session: SessionConfig,

    #[command(flatten)]
    pub infra: InfrastructureConfig,

    #[command(flatten)]
    pub http: HttpServerConfig,
}

const SERVICE_ID: &str = "asetrack";

struct InitData {
    db: db::Database,
    session: SessionConfig,
    http: HttpServerConfig,
}

/// What the endpoints are configured with.
#[derive(Clone)]
pub(crate) struct Config {
    pub(crate) db: db::Database,
    pub(crate) session: SessionConfig,
}

impl Run {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        // logging is only active once the infrastructure run method has been called
        Infrastructure::from(self.infra.clone())
            .run(
                SERVICE_ID,
                |context| async move { InitData::new(context, self).await },
                |context| async move { context.init_data.run().await },
            )
            .await?;

        Ok(ExitCode::SUCCESS)
    }
}

impl InitData {
    async fn new(context: InitContext, run: Run) -> anyhow::Result<Self> {
        let db = db::Database::with_mode(&run.database, run.creation).await?;
        log::info!("Connected to database '{}' ({})", db.name(), run.creation);

        let check = spawn_db_check(db.clone())?;
        context.health.readiness.register("database", check).await;

        Ok(InitData {
            db,
            session: run.session,
            http: run.http,
        })
    }

    async fn run(self) -> anyhow::Result<()> {
        let authenticator = Arc::new(SessionAuthenticator::new(
            self.db.clone(),
            self.session.cookie_name.clone(),
        ));

        let config = Config {
            db: self.db,
            session: self.session,
        };

        HttpServerBuilder::try_from(self.http)?
            .authenticator(authenticator)
            .authorizer(Authorizer::new(true))
            .openapi_info(default_openapi_info())
            .configure(move |svc| configure(svc, config.clone()))
            .run()
            .await
    }
}

pub(crate) fn configure(svc: &mut ServiceConfig, config: Config) {
    let Config { db, session } = config;

    svc.service(utoipa_actix_web::scope("/api").configure(|svc| {
        asetrack_module_inventory::configure(svc, db.clone());
    }));

    asetrack_module_account::configure(svc, db.clone(), session);
    asetrack_module_maintenance::configure(svc, db);
}
