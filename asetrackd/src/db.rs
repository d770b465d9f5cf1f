use asetrack_common::{
    config::{CreationMode, Database},
    db,
};
use asetrack_infrastructure::tracing::{Tracing, init_tracing};
use std::process::ExitCode;

/// Manage the database
#[derive(clap::Args, Debug)]
pub struct Run {
    #[command(subcommand)]
    pub(crate) command: Command,
    #[command(flatten)]
    pub(crate) database: Database,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Drop and re-create the database
    Create,
    /// Apply pending migrations
    Migrate,
    /// Drop all tables and migrate from scratch
    Refresh,
    /// Apply pending migrations, then add the default permissions and admin accounts
    Seed,
}

impl Run {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        init_tracing("asetrackd-db", Tracing::Disabled);

        use Command::*;
        match self.command {
            Create => self.config(CreationMode::Bootstrap).await,
            Migrate => self.config(CreationMode::Default).await,
            Refresh => self.config(CreationMode::RefreshSchema).await,
            Seed => {
                let db = db::Database::with_mode(&self.database, CreationMode::Default).await?;
                asetrack_module_account::seed::seed(&db).await?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }

    async fn config(self, mode: CreationMode) -> anyhow::Result<ExitCode> {
        db::Database::with_mode(&self.database, mode).await?;
        Ok(ExitCode::SUCCESS)
    }
}
