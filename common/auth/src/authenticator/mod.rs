pub mod user;

use user::UserDetails;

#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("failed to resolve session: {0}")]
    Backend(String),
}

/// Resolves a session token, taken from the session cookie, into the details of its owner.
#[async_trait::async_trait]
pub trait Authenticator: Send + Sync {
    /// The name of the cookie carrying the session token
    fn cookie_name(&self) -> &str;

    /// Resolve the token, `None` if there is no valid session for it.
    async fn authenticate(&self, token: &str) -> Result<Option<UserDetails>, AuthenticationError>;
}
