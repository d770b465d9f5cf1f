use crate::service::AccountService;
use asetrack_auth::authenticator::{AuthenticationError, Authenticator, user::UserDetails};
use asetrack_common::db::Database;

/// Authenticates requests by the session cookie handed out on login.
pub struct SessionAuthenticator {
    service: AccountService,
    cookie_name: String,
}

impl SessionAuthenticator {
    pub fn new(db: Database, cookie_name: impl Into<String>) -> Self {
        Self {
            service: AccountService::new(db),
            cookie_name: cookie_name.into(),
        }
    }
}

#[async_trait::async_trait]
impl Authenticator for SessionAuthenticator {
    fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    async fn authenticate(&self, token: &str) -> Result<Option<UserDetails>, AuthenticationError> {
        self.service
            .authenticate(token)
            .await
            .map_err(|err| AuthenticationError::Backend(err.to_string()))
    }
}
