use crate::db::Database;
use anyhow::Context;
use postgresql_embedded::{PostgreSQL, Settings, VersionReq};
use tracing::{Instrument, info_span};

const PASSWORD: &str = "asetrack";

fn default_settings() -> anyhow::Result<Settings> {
    let version = VersionReq::parse("=17.2.0").context("valid psql version")?;
    Ok(Settings {
        version,
        username: "postgres".to_string(),
        password: PASSWORD.to_string(),
        temporary: true,
        ..Default::default()
    })
}

/// Start a temporary, embedded PostgreSQL instance and bootstrap a fresh schema in it.
///
/// The returned [`PostgreSQL`] handle must be kept alive for as long as the database is used.
pub async fn create() -> anyhow::Result<(Database, PostgreSQL)> {
    let postgresql = async {
        let mut postgresql = PostgreSQL::new(default_settings()?);
        postgresql
            .setup()
            .await
            .context("Setting up the embedded database")?;
        postgresql
            .start()
            .await
            .context("Starting the embedded database")?;
        Ok::<_, anyhow::Error>(postgresql)
    }
    .instrument(info_span!("start database"))
    .await?;

    let config = crate::config::Database {
        url: None,
        username: "postgres".into(),
        password: PASSWORD.into(),
        host: "localhost".into(),
        name: "test".into(),
        port: postgresql.settings().port,
        ..crate::config::Database::from_env()?
    };
    let db = Database::bootstrap(&config)
        .await
        .context("Bootstrapping the embedded database")?;

    Ok((db, postgresql))
}
