use crate::{PermissionMap, Resource, Role};
use uuid::Uuid;

/// The details of an authenticated administrator.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UserDetails {
    /// The admin id
    pub id: Uuid,
    pub username: String,
    /// The name to show, the linked employee's name if there is one
    pub display_name: String,
    pub position: Option<String>,
    pub role: Role,
    /// The grants of the role, as loaded with the session
    pub permissions: PermissionMap,
}

/// The principal of a request, stored in the request extensions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum UserInformation {
    Authenticated(UserDetails),
    #[default]
    Anonymous,
}

impl UserInformation {
    pub fn id(&self) -> Option<Uuid> {
        match self {
            Self::Authenticated(details) => Some(details.id),
            Self::Anonymous => None,
        }
    }

    pub fn details(&self) -> Option<&UserDetails> {
        match self {
            Self::Authenticated(details) => Some(details),
            Self::Anonymous => None,
        }
    }

    pub fn can_access(&self, resource: Resource) -> bool {
        match self {
            Self::Authenticated(details) => details.role.can_access(resource, &details.permissions),
            Self::Anonymous => false,
        }
    }
}

impl actix_web::FromRequest for UserInformation {
    type Error = actix_web::Error;
    type Future = core::future::Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_http::Payload,
    ) -> Self::Future {
        use actix_http::HttpMessage;

        core::future::ready(Ok(req
            .extensions()
            .get::<UserInformation>()
            .cloned()
            .unwrap_or_default()))
    }
}

impl actix_web::FromRequest for UserDetails {
    type Error = crate::authorizer::AuthorizationError;
    type Future = core::future::Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_http::Payload,
    ) -> Self::Future {
        use actix_http::HttpMessage;

        core::future::ready(
            match req.extensions().get::<UserInformation>() {
                Some(UserInformation::Authenticated(details)) => Ok(details.clone()),
                _ => Err(crate::authorizer::AuthorizationError::Unauthenticated),
            },
        )
    }
}
