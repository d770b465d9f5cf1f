use std::env;
use std::fmt::{Display, Formatter};

#[derive(clap::Args, Debug, Clone)]
#[command(next_help_heading = "Database")]
#[group(id = "database")]
pub struct Database {
    /// Full database URL, overrides the individual connection settings
    #[arg(id = "db-url", long, env = "DB_URL")]
    pub url: Option<String>,
    #[arg(id = "db-user", long, env = "DB_USER", default_value = "asetrack")]
    pub username: String,
    #[arg(
        id = "db-password",
        long,
        env = "DB_PASSWORD",
        default_value = "asetrack"
    )]
    pub password: String,
    #[arg(id = "db-host", long, env = "DB_HOST", default_value = "localhost")]
    pub host: String,
    #[arg(id = "db-port", long, env = "DB_PORT", default_value_t = 5432)]
    pub port: u16,
    #[arg(id = "db-name", long, env = "DB_NAME", default_value = "asetrack")]
    pub name: String,
    #[arg(id = "db-max-conn", long, env = "DB_MAX_CONN", default_value_t = 75)]
    pub max_conn: u32,
    #[arg(id = "db-min-conn", long, env = "DB_MIN_CONN", default_value_t = 5)]
    pub min_conn: u32,
    /// Connect timeout, in seconds
    #[arg(
        id = "db-connect-timeout",
        long,
        env = "DB_CONNECT_TIMEOUT",
        default_value_t = 8
    )]
    pub connect_timeout: u64,
    /// Acquire timeout, in seconds
    #[arg(
        id = "db-acquire-timeout",
        long,
        env = "DB_ACQUIRE_TIMEOUT",
        default_value_t = 30
    )]
    pub acquire_timeout: u64,
    /// Maximum lifetime of a connection, in seconds
    #[arg(
        id = "db-max-lifetime",
        long,
        env = "DB_MAX_LIFETIME",
        default_value_t = 8 * 60 * 60
    )]
    pub max_lifetime: u64,
    /// Idle timeout of a connection, in seconds
    #[arg(
        id = "db-idle-timeout",
        long,
        env = "DB_IDLE_TIMEOUT",
        default_value_t = 10 * 60
    )]
    pub idle_timeout: u64,
}

impl Database {
    /// Build the configuration from `DB_*` environment variables, falling back to the
    /// same defaults as the command line arguments.
    pub fn from_env() -> Result<Database, anyhow::Error> {
        fn var(name: &str, default: &str) -> String {
            env::var(name).unwrap_or_else(|_| default.to_string())
        }

        Ok(Database {
            url: env::var("DB_URL").ok(),
            username: var("DB_USER", "asetrack"),
            password: var("DB_PASSWORD", "asetrack"),
            host: var("DB_HOST", "localhost"),
            port: var("DB_PORT", "5432").parse()?,
            name: var("DB_NAME", "asetrack"),
            max_conn: var("DB_MAX_CONN", "75").parse()?,
            min_conn: var("DB_MIN_CONN", "5").parse()?,
            connect_timeout: var("DB_CONNECT_TIMEOUT", "8").parse()?,
            acquire_timeout: var("DB_ACQUIRE_TIMEOUT", "30").parse()?,
            max_lifetime: var("DB_MAX_LIFETIME", "28800").parse()?,
            idle_timeout: var("DB_IDLE_TIMEOUT", "600").parse()?,
        })
    }

    pub fn to_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!(
                "postgres://{}:{}@{}:{}/{}",
                self.username, self.password, self.host, self.port, self.name
            ),
        }
    }
}

/// How the database schema gets prepared when a process starts.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CreationMode {
    /// Apply pending migrations
    #[default]
    Default,
    /// Drop and re-create the database, then migrate
    Bootstrap,
    /// Drop all tables and migrate from scratch
    RefreshSchema,
}

impl Display for CreationMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Bootstrap => write!(f, "bootstrap"),
            Self::RefreshSchema => write!(f, "refresh-schema"),
        }
    }
}
