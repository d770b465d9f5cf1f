use crate::{
    Error,
    config::SessionConfig,
    model::{AdminAccount, AdminSummary, Profile, RolePermissions},
    service::AccountService,
};
use actix_web::{
    HttpRequest, HttpResponse, Responder,
    cookie::{Cookie, SameSite, time::Duration},
    get,
    http::header,
    post, web,
};
use asetrack_auth::{
    PermissionMap, Resource, Role, Setting,
    authenticator::user::{UserDetails, UserInformation},
    authorizer::Require,
};
use asetrack_common::{db::Database, location::with_query};
use std::collections::HashMap;
use strum::VariantArray;
use uuid::Uuid;

/// mount the "account" module
pub fn configure(
    svc: &mut utoipa_actix_web::service_config::ServiceConfig,
    db: Database,
    config: SessionConfig,
) {
    svc.app_data(web::Data::new(AccountService::new(db)))
        .app_data(web::Data::new(config))
        .service(login)
        .service(logout)
        .service(profile)
        .service(change_password)
        .service(list_roles)
        .service(update_role)
        .service(list_admins)
        .service(store_admin)
        .service(update_admin)
        .service(delete_admin)
        .service(get_admin);
}

const ADMINS_PATH: &str = "/setting/user";

fn see_other(location: impl Into<String>) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location.into()))
        .finish()
}

#[derive(Clone, serde::Deserialize, utoipa::ToSchema)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[utoipa::path(
    tag = "account",
    operation_id = "login",
    request_body(content = Credentials, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Logged in, or back to the login page with an error"),
    ),
)]
#[post("/login")]
/// Log in with username and password
pub async fn login(
    service: web::Data<AccountService>,
    config: web::Data<SessionConfig>,
    web::Form(credentials): web::Form<Credentials>,
) -> Result<impl Responder, Error> {
    let Some(token) = service
        .login(&credentials.username, &credentials.password, *config.ttl)
        .await?
    else {
        return Ok(see_other(with_query(
            "/login",
            &[("error", "Wrong username or password")],
        )));
    };

    let max_age = i64::try_from(config.ttl.as_secs()).unwrap_or(i64::MAX);
    let cookie = Cookie::build(config.cookie_name.clone(), token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure)
        .max_age(Duration::seconds(max_age))
        .finish();

    let mut response = see_other("/");
    response.add_cookie(&cookie).map_err(anyhow::Error::from)?;
    Ok(response)
}

#[utoipa::path(
    tag = "account",
    operation_id = "logout",
    responses(
        (status = 303, description = "Logged out, redirecting to the login page"),
    ),
)]
#[get("/logout")]
/// Log out, closing the current session
pub async fn logout(
    req: HttpRequest,
    service: web::Data<AccountService>,
    config: web::Data<SessionConfig>,
) -> Result<impl Responder, Error> {
    if let Some(cookie) = req.cookie(&config.cookie_name) {
        service.logout(cookie.value()).await?;
    }

    let mut removal = Cookie::build(config.cookie_name.clone(), "")
        .path("/")
        .finish();
    removal.make_removal();

    let mut response = see_other("/login");
    response.add_cookie(&removal).map_err(anyhow::Error::from)?;
    Ok(response)
}

#[utoipa::path(
    tag = "account",
    operation_id = "getProfile",
    responses(
        (status = 200, description = "The logged in admin", body = Profile),
        (status = 401, description = "Not logged in"),
    ),
)]
#[get("/profile")]
/// Get the profile of the logged in admin
pub async fn profile(user: UserDetails) -> impl Responder {
    HttpResponse::Ok().json(Profile::from(user))
}

#[derive(Clone, serde::Deserialize, utoipa::ToSchema)]
pub struct PasswordChange {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[utoipa::path(
    tag = "account",
    operation_id = "changePassword",
    request_body(content = PasswordChange, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Back to the profile, with a message or an error"),
        (status = 401, description = "Not logged in"),
    ),
)]
#[post("/profile/password")]
/// Change the password of the logged in admin
pub async fn change_password(
    service: web::Data<AccountService>,
    user: UserDetails,
    web::Form(change): web::Form<PasswordChange>,
) -> Result<impl Responder, Error> {
    if change.new_password != change.confirm_password {
        return Ok(see_other(with_query(
            "/profile",
            &[("error", "The new passwords do not match")],
        )));
    }

    match service
        .change_password(user.id, &change.old_password, &change.new_password)
        .await
    {
        Ok(()) => Ok(see_other(with_query(
            "/profile",
            &[("msg", "Password updated")],
        ))),
        Err(Error::BadRequest(message)) => {
            Ok(see_other(with_query("/profile", &[("error", message)])))
        }
        Err(err) => Err(err),
    }
}

#[utoipa::path(
    tag = "setting",
    operation_id = "listRolePermissions",
    responses(
        (status = 200, description = "The permission matrix", body = Vec<RolePermissions>),
    ),
)]
#[get("/setting/role")]
/// List the grants of every role
pub async fn list_roles(
    service: web::Data<AccountService>,
    _: Require<Setting>,
) -> Result<impl Responder, Error> {
    Ok(HttpResponse::Ok().json(service.permissions().await?))
}

#[utoipa::path(
    tag = "setting",
    operation_id = "updateRolePermissions",
    request_body(
        content = HashMap<String, String>,
        content_type = "application/x-www-form-urlencoded",
        description = "The `role`, and `perm_<resource>=on` for every granted resource",
    ),
    responses(
        (status = 303, description = "Back to the permission matrix"),
    ),
)]
#[post("/setting/role")]
/// Update the grants of a role
pub async fn update_role(
    service: web::Data<AccountService>,
    web::Form(form): web::Form<HashMap<String, String>>,
    _: Require<Setting>,
) -> Result<impl Responder, Error> {
    let Some(role) = form.get("role").and_then(|role| role.parse::<Role>().ok()) else {
        return Ok(see_other(with_query(
            "/setting/role",
            &[("error", "Unknown role")],
        )));
    };

    let granted: PermissionMap = Resource::VARIANTS
        .iter()
        .copied()
        .filter(|resource| {
            form.get(&format!("perm_{resource}"))
                .is_some_and(|value| value == "on")
        })
        .collect();

    service.set_permissions(role, granted).await?;

    Ok(see_other(with_query(
        "/setting/role",
        &[("msg", format!("Permissions of {role} updated"))],
    )))
}

#[utoipa::path(
    tag = "setting",
    operation_id = "listAdmins",
    responses(
        (status = 200, description = "All admin accounts", body = Vec<AdminSummary>),
    ),
)]
#[get("/setting/user")]
/// List the admin accounts
pub async fn list_admins(
    service: web::Data<AccountService>,
    _: Require<Setting>,
) -> Result<impl Responder, Error> {
    Ok(HttpResponse::Ok().json(service.admins().await?))
}

#[utoipa::path(
    tag = "setting",
    operation_id = "getAdmin",
    params(
        ("id", Path, description = "The id of the admin"),
    ),
    responses(
        (status = 200, description = "The admin account", body = AdminSummary),
        (status = 404, description = "No such admin"),
    ),
)]
#[get("/setting/user/{id}")]
/// Get an admin account
pub async fn get_admin(
    service: web::Data<AccountService>,
    id: web::Path<Uuid>,
    _: Require<Setting>,
) -> Result<impl Responder, Error> {
    let id = id.into_inner();
    match service.admin(id).await? {
        Some(admin) => Ok(HttpResponse::Ok().json(admin)),
        None => Err(Error::NotFound(format!("admin '{id}'"))),
    }
}

/// The form creating, or updating, an admin account.
#[derive(Clone, serde::Deserialize, utoipa::ToSchema)]
pub struct AdminForm {
    pub username: String,
    /// Keeps the current password when updating if empty
    #[serde(default)]
    pub password: String,
    pub role: String,
    /// The employee operating the account, if any
    #[serde(default)]
    pub user_id: String,
}

impl TryFrom<AdminForm> for AdminAccount {
    type Error = Error;

    fn try_from(form: AdminForm) -> Result<Self, Self::Error> {
        let role = form
            .role
            .parse::<Role>()
            .map_err(|_| Error::BadRequest(format!("unknown role '{}'", form.role)))?;

        let employee_id = match form.user_id.trim() {
            "" => None,
            id => Some(
                Uuid::parse_str(id)
                    .map_err(|_| Error::BadRequest(format!("invalid employee id '{id}'")))?,
            ),
        };

        Ok(Self {
            username: form.username,
            password: Some(form.password).filter(|password| !password.is_empty()),
            role,
            employee_id,
        })
    }
}

/// Redirect to the admin list, reporting the outcome.
fn back_to_admins(outcome: Result<&str, Error>) -> Result<HttpResponse, Error> {
    match outcome {
        Ok(message) => Ok(see_other(with_query(ADMINS_PATH, &[("msg", message)]))),
        Err(err @ (Error::BadRequest(_) | Error::Conflict(_))) => Ok(see_other(with_query(
            ADMINS_PATH,
            &[("error", err.to_string())],
        ))),
        Err(err) => Err(err),
    }
}

#[utoipa::path(
    tag = "setting",
    operation_id = "createAdmin",
    request_body(content = AdminForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Back to the admin list, with a message or an error"),
    ),
)]
#[post("/setting/user/store")]
/// Create an admin account
pub async fn store_admin(
    service: web::Data<AccountService>,
    web::Form(form): web::Form<AdminForm>,
    _: Require<Setting>,
) -> Result<impl Responder, Error> {
    let result = match AdminAccount::try_from(form) {
        Ok(account) => service.create_admin(account).await.map(|_| "User created"),
        Err(err) => Err(err),
    };

    back_to_admins(result)
}

#[utoipa::path(
    tag = "setting",
    operation_id = "updateAdmin",
    params(
        ("id", Path, description = "The id of the admin"),
    ),
    request_body(content = AdminForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Back to the admin list, with a message or an error"),
        (status = 404, description = "No such admin"),
    ),
)]
#[post("/setting/user/update/{id}")]
/// Update an admin account
pub async fn update_admin(
    service: web::Data<AccountService>,
    id: web::Path<Uuid>,
    web::Form(form): web::Form<AdminForm>,
    _: Require<Setting>,
) -> Result<impl Responder, Error> {
    let result = match AdminAccount::try_from(form) {
        Ok(account) => service
            .update_admin(id.into_inner(), account)
            .await
            .map(|()| "User updated"),
        Err(err) => Err(err),
    };

    back_to_admins(result)
}

#[utoipa::path(
    tag = "setting",
    operation_id = "deleteAdmin",
    params(
        ("id", Path, description = "The id of the admin"),
    ),
    responses(
        (status = 303, description = "Back to the admin list, with a message or an error"),
        (status = 404, description = "No such admin"),
    ),
)]
#[post("/setting/user/delete/{id}")]
/// Delete an admin account
pub async fn delete_admin(
    service: web::Data<AccountService>,
    id: web::Path<Uuid>,
    user: UserInformation,
    _: Require<Setting>,
) -> Result<impl Responder, Error> {
    let result = service
        .delete_admin(id.into_inner(), user.id())
        .await
        .map(|()| "User deleted");

    back_to_admins(result)
}
