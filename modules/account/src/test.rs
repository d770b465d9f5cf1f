use crate::{
    Error,
    authenticator::SessionAuthenticator,
    config::SessionConfig,
    model::{AdminAccount, AdminSummary, Profile},
    seed,
    service::AccountService,
};
use actix_http::StatusCode;
use actix_web::{
    cookie::Cookie,
    http::header,
    test::{self as actix, TestRequest},
};
use asetrack_auth::{PermissionMap, Resource, Role, authorizer::Authorizer};
use asetrack_entity::{admin, session};
use asetrack_infrastructure::app::{AppOptions, new_app};
use asetrack_test_context::AsetrackContext;
use sea_orm::{EntityTrait, Set};
use std::{sync::Arc, time::Duration};
use test_context::test_context;
use test_log::test;
use time::OffsetDateTime;
use utoipa_actix_web::AppExt;
use uuid::Uuid;

const TTL: Duration = Duration::from_secs(60);

#[test_context(AsetrackContext)]
#[test(tokio::test)]
async fn seed_is_repeatable(ctx: &AsetrackContext) -> anyhow::Result<()> {
    seed::seed(&ctx.db).await?;

    // changed grants must survive seeding again
    let service = AccountService::new(ctx.db.clone());
    service
        .set_permissions(Role::Support, PermissionMap::new([Resource::Maintenance]))
        .await?;

    seed::seed(&ctx.db).await?;

    let matrix = service.permissions().await?;
    assert_eq!(matrix.len(), 4);
    let support = matrix
        .iter()
        .find(|entry| entry.role == Role::Support)
        .expect("must have support");
    assert_eq!(support.granted, vec![Resource::Maintenance]);

    let staf_it = matrix
        .iter()
        .find(|entry| entry.role == Role::StafIt)
        .expect("must have staf IT");
    assert_eq!(
        staf_it.granted,
        vec![
            Resource::Dashboard,
            Resource::AssetManagement,
            Resource::Maintenance
        ]
    );

    Ok(())
}

#[test_context(AsetrackContext)]
#[test(tokio::test)]
async fn login_and_resolve(ctx: &AsetrackContext) -> anyhow::Result<()> {
    seed::seed(&ctx.db).await?;
    let service = AccountService::new(ctx.db.clone());

    assert!(service.login("useradmin", "wrong", TTL).await?.is_none());
    assert!(service.login("nobody", "admin123", TTL).await?.is_none());

    let token = service
        .login("useraset", "aset123", TTL)
        .await?
        .expect("must log in");

    let details = service
        .authenticate(&token)
        .await?
        .expect("must resolve session");
    assert_eq!(details.username, "useraset");
    assert_eq!(details.display_name, "useraset");
    assert_eq!(details.role, Role::AssetManager);
    assert_eq!(details.permissions, Role::AssetManager.default_permissions());

    assert!(service.authenticate("not-a-token").await?.is_none());

    service.logout(&token).await?;
    assert!(service.authenticate(&token).await?.is_none());

    Ok(())
}

#[test_context(AsetrackContext)]
#[test(tokio::test)]
async fn expired_session(ctx: &AsetrackContext) -> anyhow::Result<()> {
    seed::seed(&ctx.db).await?;
    let service = AccountService::new(ctx.db.clone());

    let token = service
        .login("useradmin", "admin123", Duration::ZERO)
        .await?
        .expect("must log in");
    assert!(service.authenticate(&token).await?.is_none());

    // expired sessions are cleaned up when logging in again
    service.login("useradmin", "admin123", TTL).await?;
    let sessions = session::Entity::find().all(&ctx.db).await?;
    assert_eq!(sessions.len(), 1);
    assert!(sessions[0].expires_at > OffsetDateTime::now_utc());

    Ok(())
}

#[test_context(AsetrackContext)]
#[test(tokio::test)]
async fn display_name_from_employee(ctx: &AsetrackContext) -> anyhow::Result<()> {
    seed::seed(&ctx.db).await?;
    let employee = ctx.employee("Dewi Lestari", "Jakarta", "IT", "Infra").await?;
    let account = ctx.admin("dewi", "staf_it", Some(employee.id)).await?;

    let service = AccountService::new(ctx.db.clone());
    let password = crate::password::hash("rahasia")?;
    admin::Entity::update(admin::ActiveModel {
        id: Set(account.id),
        password: Set(password),
        ..Default::default()
    })
    .exec(&ctx.db)
    .await?;

    let token = service
        .login("dewi", "rahasia", TTL)
        .await?
        .expect("must log in");
    let details = service
        .authenticate(&token)
        .await?
        .expect("must resolve session");
    assert_eq!(details.display_name, "Dewi Lestari");
    assert_eq!(details.position.as_deref(), Some("Staff"));

    Ok(())
}

#[test_context(AsetrackContext)]
#[test(tokio::test)]
async fn change_password(ctx: &AsetrackContext) -> anyhow::Result<()> {
    seed::seed(&ctx.db).await?;
    let service = AccountService::new(ctx.db.clone());
    let token = service
        .login("useraset", "aset123", TTL)
        .await?
        .expect("must log in");
    let id = service
        .authenticate(&token)
        .await?
        .expect("must resolve session")
        .id;

    let result = service.change_password(id, "wrong", "baru123").await;
    assert!(matches!(result, Err(Error::BadRequest(_))), "{result:?}");

    service.change_password(id, "aset123", "baru123").await?;
    assert!(service.login("useraset", "aset123", TTL).await?.is_none());
    assert!(service.login("useraset", "baru123", TTL).await?.is_some());

    Ok(())
}

#[test_context(AsetrackContext)]
#[test(actix_web::test)]
async fn cookie_flow(ctx: &AsetrackContext) -> anyhow::Result<()> {
    seed::seed(&ctx.db).await?;

    let config = SessionConfig::default();
    let db = ctx.db.clone();
    let app = actix::init_service(
        new_app(AppOptions {
            authenticator: Some(Arc::new(SessionAuthenticator::new(
                ctx.db.clone(),
                config.cookie_name.clone(),
            ))),
            authorizer: Authorizer::new(true),
            logger: false,
        })
        .into_utoipa_app()
        .configure(|svc| crate::configure(svc, db, config))
        .into_app(),
    )
    .await;

    // wrong password, back to the login page

    let req = TestRequest::post()
        .uri("/login")
        .set_form([("username", "useraset"), ("password", "nope")])
        .to_request();
    let resp = actix::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let location = resp.headers().get(header::LOCATION).expect("must redirect");
    assert!(location.to_str()?.starts_with("/login?error="));
    assert!(resp.response().cookies().next().is_none());

    // log in

    let req = TestRequest::post()
        .uri("/login")
        .set_form([("username", "useraset"), ("password", "aset123")])
        .to_request();
    let resp = actix::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).expect("must redirect"), "/");

    let cookie = resp
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "asetrack_session")
        .expect("must set the session cookie")
        .into_owned();
    assert_eq!(cookie.http_only(), Some(true));
    let cookie = Cookie::new(cookie.name().to_string(), cookie.value().to_string());

    // use the session

    let req = TestRequest::get()
        .uri("/profile")
        .cookie(cookie.clone())
        .to_request();
    let profile: Profile = actix::call_and_read_body_json(&app, req).await;
    assert_eq!(profile.username, "useraset");
    assert_eq!(profile.role, Role::AssetManager);
    assert!(profile.permissions.contains(&Resource::Maintenance));
    assert!(!profile.permissions.contains(&Resource::Setting));

    let req = TestRequest::get()
        .uri("/setting/role")
        .cookie(cookie.clone())
        .to_request();
    let resp = actix::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // log out

    let req = TestRequest::get()
        .uri("/logout")
        .cookie(cookie.clone())
        .to_request();
    let resp = actix::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let req = TestRequest::get().uri("/profile").cookie(cookie).to_request();
    let resp = actix::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[test_context(AsetrackContext)]
#[test(actix_web::test)]
async fn update_role_form(ctx: &AsetrackContext) -> anyhow::Result<()> {
    use asetrack_test_context::{
        auth::TestAuthentication,
        call::{CallService, caller},
    };

    seed::seed(&ctx.db).await?;
    let db = ctx.db.clone();
    let app = caller(|svc| crate::configure(svc, db, SessionConfig::default())).await?;
    let admin = Uuid::new_v4();

    let req = TestRequest::post()
        .uri("/setting/role")
        .set_form([
            ("role", "support"),
            ("perm_dashboard", "on"),
            ("perm_maintenance", "on"),
        ])
        .to_request()
        .test_auth(admin, Role::SuperAdmin);
    let resp = app.call_service(req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let granted = AccountService::new(ctx.db.clone())
        .permissions()
        .await?
        .into_iter()
        .find(|entry| entry.role == Role::Support)
        .expect("must have support")
        .granted;
    assert_eq!(granted, vec![Resource::Dashboard, Resource::Maintenance]);

    let req = TestRequest::post()
        .uri("/setting/role")
        .set_form([("role", "support")])
        .to_request()
        .test_auth(admin, Role::AssetManager);
    assert_eq!(
        app.call_service(req).await.status(),
        StatusCode::FORBIDDEN
    );

    Ok(())
}

#[test_context(AsetrackContext)]
#[test(tokio::test)]
async fn admin_accounts(ctx: &AsetrackContext) -> anyhow::Result<()> {
    seed::seed(&ctx.db).await?;
    let service = AccountService::new(ctx.db.clone());
    let employee = ctx.employee("Dewi Lestari", "Jakarta", "IT", "Infra").await?;

    let account = |username: &str, password: Option<&str>| AdminAccount {
        username: username.to_string(),
        password: password.map(str::to_string),
        role: Role::StafIt,
        employee_id: Some(employee.id),
    };

    let id = service
        .create_admin(account(" dewi ", Some("rahasia")))
        .await?;
    let created = service.admin(id).await?.expect("admin must exist");
    assert_eq!(created.username, "dewi");
    assert_eq!(created.role, "staf_it");
    assert_eq!(created.employee_name.as_deref(), Some("Dewi Lestari"));
    assert!(service.login("dewi", "rahasia", TTL).await?.is_some());

    let usernames: Vec<_> = service
        .admins()
        .await?
        .into_iter()
        .map(|admin| admin.username)
        .collect();
    assert_eq!(usernames, ["dewi", "useradmin", "useraset"]);

    // taken usernames, missing passwords and unknown employees are refused
    let result = service.create_admin(account("useraset", Some("x"))).await;
    assert!(matches!(result, Err(Error::Conflict(_))), "{result:?}");
    let result = service.create_admin(account("budi", None)).await;
    assert!(matches!(result, Err(Error::BadRequest(_))), "{result:?}");
    let result = service
        .create_admin(AdminAccount {
            employee_id: Some(Uuid::new_v4()),
            ..account("budi", Some("x"))
        })
        .await;
    assert!(matches!(result, Err(Error::BadRequest(_))), "{result:?}");

    // updating without a password keeps the current one
    service
        .update_admin(
            id,
            AdminAccount {
                role: Role::AssetManager,
                employee_id: None,
                ..account("dewi.l", None)
            },
        )
        .await?;
    let updated = service.admin(id).await?.expect("admin must exist");
    assert_eq!(updated.username, "dewi.l");
    assert_eq!(updated.role, "asset_manager");
    assert_eq!(updated.employee_id, None);
    assert!(service.login("dewi.l", "rahasia", TTL).await?.is_some());

    let result = service.update_admin(id, account("useradmin", None)).await;
    assert!(matches!(result, Err(Error::Conflict(_))), "{result:?}");
    // keeping the own username is fine
    service.update_admin(id, account("dewi.l", Some("baru"))).await?;
    assert!(service.login("dewi.l", "baru", TTL).await?.is_some());

    let result = service.update_admin(Uuid::new_v4(), account("x", None)).await;
    assert!(matches!(result, Err(Error::NotFound(_))), "{result:?}");

    // deleting closes the sessions of the account
    let token = service
        .login("dewi.l", "baru", TTL)
        .await?
        .expect("must log in");
    let result = service.delete_admin(id, Some(id)).await;
    assert!(matches!(result, Err(Error::BadRequest(_))), "{result:?}");
    service.delete_admin(id, None).await?;
    assert!(service.admin(id).await?.is_none());
    assert!(service.authenticate(&token).await?.is_none());

    let result = service.delete_admin(id, None).await;
    assert!(matches!(result, Err(Error::NotFound(_))), "{result:?}");

    Ok(())
}

#[test_context(AsetrackContext)]
#[test(actix_web::test)]
async fn admin_forms(ctx: &AsetrackContext) -> anyhow::Result<()> {
    use asetrack_test_context::{
        auth::TestAuthentication,
        call::{CallService, caller},
    };

    seed::seed(&ctx.db).await?;
    let db = ctx.db.clone();
    let app = caller(|svc| crate::configure(svc, db, SessionConfig::default())).await?;
    let me = Uuid::new_v4();

    let location = |resp: &actix_web::dev::ServiceResponse| {
        resp.headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    let req = TestRequest::post()
        .uri("/setting/user/store")
        .set_form([
            ("username", "rina"),
            ("password", "rahasia"),
            ("role", "support"),
            ("user_id", ""),
        ])
        .to_request()
        .test_auth(me, Role::SuperAdmin);
    let resp = app.call_service(req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&resp).as_deref(),
        Some("/setting/user?msg=User+created")
    );

    let req = TestRequest::get()
        .uri("/setting/user")
        .to_request()
        .test_auth(me, Role::SuperAdmin);
    let admins: Vec<AdminSummary> = app.call_and_read_body_json(req).await;
    let rina = admins
        .iter()
        .find(|admin| admin.username == "rina")
        .expect("must be listed");
    assert_eq!(rina.role, "support");

    let req = TestRequest::get()
        .uri(&format!("/setting/user/{}", rina.id))
        .to_request()
        .test_auth(me, Role::SuperAdmin);
    let fetched: AdminSummary = app.call_and_read_body_json(req).await;
    assert_eq!(&fetched, rina);

    // a taken username goes back to the list
    let req = TestRequest::post()
        .uri(&format!("/setting/user/update/{}", rina.id))
        .set_form([("username", "useraset"), ("role", "support")])
        .to_request()
        .test_auth(me, Role::SuperAdmin);
    let resp = app.call_service(req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(
        location(&resp).is_some_and(|l| l.starts_with("/setting/user?error=")),
        "{:?}",
        location(&resp)
    );

    let req = TestRequest::post()
        .uri(&format!("/setting/user/update/{}", rina.id))
        .set_form([("username", "rina"), ("role", "boss")])
        .to_request()
        .test_auth(me, Role::SuperAdmin);
    let resp = app.call_service(req).await;
    assert!(location(&resp).is_some_and(|l| l.starts_with("/setting/user?error=")));

    let req = TestRequest::post()
        .uri(&format!("/setting/user/update/{}", Uuid::new_v4()))
        .set_form([("username", "rina"), ("role", "support")])
        .to_request()
        .test_auth(me, Role::SuperAdmin);
    assert_eq!(app.call_service(req).await.status(), StatusCode::NOT_FOUND);

    // only for those allowed to change the settings
    let req = TestRequest::post()
        .uri(&format!("/setting/user/delete/{}", rina.id))
        .to_request()
        .test_auth(me, Role::AssetManager);
    assert_eq!(app.call_service(req).await.status(), StatusCode::FORBIDDEN);

    let req = TestRequest::post()
        .uri(&format!("/setting/user/delete/{}", rina.id))
        .to_request()
        .test_auth(me, Role::SuperAdmin);
    let resp = app.call_service(req).await;
    assert_eq!(
        location(&resp).as_deref(),
        Some("/setting/user?msg=User+deleted")
    );
    assert!(admin::Entity::find_by_id(rina.id).one(&ctx.db).await?.is_none());

    Ok(())
}
