use clap::Parser;
use std::process::{ExitCode, Termination};

mod db;
mod openapi;

#[allow(clippy::large_enum_variant)]
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Run the API server
    Api(asetrack_server::profile::api::Run),
    /// Manage the database
    Db(db::Run),
    /// Work with the API description
    Openapi(openapi::Run),
}

#[derive(clap::Parser, Debug)]
#[command(
    author,
    version = env!("CARGO_PKG_VERSION"),
    about = "asetrackd",
    long_about = None
)]
pub struct Asetrackd {
    #[command(subcommand)]
    pub(crate) command: Command,
}

impl Asetrackd {
    async fn run(self) -> ExitCode {
        match self.run_command().await {
            Ok(code) => code,
            Err(err) => {
                log::error!("Error: {err}");
                for (n, err) in err.chain().skip(1).enumerate() {
                    if n == 0 {
                        log::error!("Caused by:");
                    }
                    log::error!("\t{err}");
                }

                ExitCode::FAILURE
            }
        }
    }

    async fn run_command(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Api(run) => run.run().await,
            Command::Db(run) => run.run().await,
            Command::Openapi(run) => run.run().await,
        }
    }
}

#[actix_web::main]
async fn main() -> impl Termination {
    Asetrackd::parse().run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Asetrackd::command().debug_assert();
    }
}
