use actix_web::{
    App,
    dev::{ServiceFactory, ServiceRequest},
    web,
};
use asetrack_auth::authorizer::Authorizer;
use utoipa_actix_web::UtoipaApp;

pub trait TestApp: Sized {
    /// Add an enabled authorizer, requests must carry test authentication
    fn add_test_authorizer(self) -> Self;
}

impl<T> TestApp for UtoipaApp<T>
where
    T: ServiceFactory<ServiceRequest, Config = (), Error = actix_web::Error, InitError = ()>,
{
    fn add_test_authorizer(self) -> Self {
        self.map(|app| app.add_test_authorizer())
    }
}

impl<T> TestApp for App<T>
where
    T: ServiceFactory<ServiceRequest, Config = (), Error = actix_web::Error, InitError = ()>,
{
    fn add_test_authorizer(self) -> Self {
        self.app_data(web::Data::new(Authorizer::new(true)))
    }
}
