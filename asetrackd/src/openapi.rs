use anyhow::{Context, bail};
use asetrack_server::openapi::create_openapi;
use std::{fs, path::PathBuf, process::ExitCode};

/// Work with the API description
#[derive(clap::Args, Debug)]
pub struct Run {
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    Export(Export),
}

impl Run {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Export(export) => export.run().await,
        }
    }
}

/// Write the OpenAPI document to a file, as JSON
#[derive(clap::Args, Debug)]
pub struct Export {
    /// The file the document should be exported to
    #[arg(long, env)]
    pub file: PathBuf,
}

impl Export {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        if self.file.file_name().is_none_or(|name| name.is_empty()) {
            bail!("Invalid file name: {}", self.file.display());
        }

        let api = create_openapi().await?;
        let doc = serde_json::to_string_pretty(&api)?;

        fs::write(&self.file, doc)
            .with_context(|| format!("Writing {}", self.file.display()))?;

        Ok(ExitCode::SUCCESS)
    }
}
