mod require;

pub use require::*;

use crate::{Resource, authenticator::user::UserInformation};
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use asetrack_common::error::ErrorInformation;

#[derive(Debug, thiserror::Error)]
pub enum AuthorizationError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("access to '{0}' denied")]
    Failed(Resource),
}

impl ResponseError for AuthorizationError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Failed(_) => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Self::Unauthenticated => HttpResponse::Unauthorized()
                .json(ErrorInformation::new("Unauthenticated", self)),
            Self::Failed(_) => {
                HttpResponse::Forbidden().json(ErrorInformation::new("Forbidden", self))
            }
        }
    }
}

/// Decides if a principal may access a resource.
#[derive(Clone, Debug)]
pub struct Authorizer {
    enabled: bool,
}

impl Authorizer {
    /// Create a new authorizer. A disabled authorizer permits every request.
    pub fn new(enabled: bool) -> Self {
        if !enabled {
            log::warn!("Authorization disabled, all requests will be permitted");
        }
        Self { enabled }
    }

    pub fn require(
        &self,
        user: &UserInformation,
        resource: Resource,
    ) -> Result<(), AuthorizationError> {
        if !self.enabled {
            return Ok(());
        }

        match user {
            UserInformation::Anonymous => Err(AuthorizationError::Unauthenticated),
            user if user.can_access(resource) => Ok(()),
            _ => Err(AuthorizationError::Failed(resource)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{PermissionMap, Role, authenticator::user::UserDetails};
    use uuid::Uuid;

    fn user(role: Role, permissions: PermissionMap) -> UserInformation {
        UserInformation::Authenticated(UserDetails {
            id: Uuid::new_v4(),
            username: "someone".into(),
            display_name: "Someone".into(),
            position: None,
            role,
            permissions,
        })
    }

    #[test]
    fn anonymous_is_unauthenticated() {
        let result = Authorizer::new(true).require(&UserInformation::Anonymous, Resource::Dashboard);
        assert!(matches!(result, Err(AuthorizationError::Unauthenticated)));
    }

    #[test]
    fn missing_grant_is_forbidden() {
        let user = user(Role::Support, Role::Support.default_permissions());
        let result = Authorizer::new(true).require(&user, Resource::Maintenance);
        assert!(matches!(
            result,
            Err(AuthorizationError::Failed(Resource::Maintenance))
        ));
        assert_eq!(
            result.map_err(|err| err.status_code()),
            Err(StatusCode::FORBIDDEN)
        );
    }

    #[test]
    fn granted() {
        let user = user(Role::StafIt, PermissionMap::new([Resource::Maintenance]));
        assert!(Authorizer::new(true).require(&user, Resource::Maintenance).is_ok());
    }

    #[test]
    fn disabled_permits_everything() {
        assert!(
            Authorizer::new(false)
                .require(&UserInformation::Anonymous, Resource::Setting)
                .is_ok()
        );
    }
}
