pub mod http;

use actix_web::{
    App, Error, HttpMessage,
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::{Compress, Condition, Logger, Next, from_fn},
    web,
};
use asetrack_auth::{
    authenticator::{Authenticator, user::UserInformation},
    authorizer::Authorizer,
};
use std::sync::Arc;

pub struct AppOptions {
    pub authenticator: Option<Arc<dyn Authenticator>>,
    pub authorizer: Authorizer,
    /// Log each request
    pub logger: bool,
}

/// Resolve the session cookie into the [`UserInformation`] of the request.
///
/// Requests without a valid session continue as [`UserInformation::Anonymous`], rejecting
/// them is up to the endpoints.
pub async fn authenticate(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let authenticator = req.app_data::<web::Data<dyn Authenticator>>().cloned();

    let mut user = UserInformation::Anonymous;
    if let Some(authenticator) = authenticator {
        if let Some(cookie) = req.cookie(authenticator.cookie_name()) {
            match authenticator.authenticate(cookie.value()).await {
                Ok(Some(details)) => user = UserInformation::Authenticated(details),
                Ok(None) => log::debug!("no session for presented cookie"),
                Err(err) => {
                    log::warn!("failed to authenticate request: {err}");
                    return Err(actix_web::error::ErrorInternalServerError(err));
                }
            }
        }
    }

    req.extensions_mut().insert(user);
    next.call(req).await
}

/// Build a new HTTP app in a consistent way.
///
/// The order of execution is last added becomes first to be executed. Middleware for services
/// will be executed after the middleware here.
pub fn new_app(
    options: AppOptions,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let mut app = App::new();
    if let Some(authenticator) = options.authenticator {
        app = app.app_data(web::Data::from(authenticator));
    }

    app
        // Resolve the principal, might fail and return early
        .wrap(from_fn(authenticate))
        // Handle authorization
        .app_data(web::Data::new(options.authorizer))
        // Compress everything
        .wrap(Compress::default())
        // First log the request, so that we know what happens (can't fail)
        .wrap(Condition::new(options.logger, Logger::default()))
}
