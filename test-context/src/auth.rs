use actix_http::{HttpMessage, Request};
use asetrack_auth::{
    Role,
    authenticator::user::{UserDetails, UserInformation},
};
use uuid::Uuid;

/// Convenient way of adding (authenticated) user information to the request.
pub trait TestAuthentication: Sized {
    /// Make the request an authenticated request with the provided user details
    fn test_auth_details(self, details: UserDetails) -> Self;

    /// Make the request an authenticated request of an admin with the role's default grants
    fn test_auth(self, id: Uuid, role: Role) -> Self {
        self.test_auth_details(UserDetails {
            id,
            username: format!("test-{role}"),
            display_name: format!("Test {role}"),
            position: None,
            role,
            permissions: role.default_permissions(),
        })
    }
}

impl TestAuthentication for Request {
    fn test_auth_details(self, details: UserDetails) -> Self {
        test_auth(self, details)
    }
}

/// Add data making the request authenticated.
pub fn test_auth(request: Request, details: UserDetails) -> Request {
    request
        .extensions_mut()
        .insert(UserInformation::Authenticated(details));
    request
}
