use std::time::Duration;

#[derive(clap::Args, Debug, Clone)]
#[command(next_help_heading = "Session")]
#[group(id = "session")]
pub struct SessionConfig {
    /// The name of the session cookie
    #[arg(
        id = "session-cookie-name",
        long,
        env = "SESSION_COOKIE_NAME",
        default_value = "asetrack_session"
    )]
    pub cookie_name: String,
    /// How long a session stays valid after logging in
    #[arg(
        id = "session-ttl",
        long,
        env = "SESSION_TTL",
        default_value = "7d"
    )]
    pub ttl: humantime::Duration,
    /// Only send the session cookie over HTTPS
    #[arg(
        id = "session-secure-cookie",
        long,
        env = "SESSION_SECURE_COOKIE",
        default_value_t = false
    )]
    pub secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "asetrack_session".into(),
            ttl: Duration::from_secs(7 * 24 * 60 * 60).into(),
            secure: false,
        }
    }
}
