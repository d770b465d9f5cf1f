use super::{model::EmployeeData, service::EmployeeService};
use crate::{Error, asset::service::AssetService};
use actix_http::StatusCode;
use actix_web::test::TestRequest;
use asetrack_auth::Role;
use asetrack_common::model::Paginated;
use asetrack_test_context::{
    AsetrackContext,
    auth::TestAuthentication,
    call::{CallService, caller},
};
use serde_json::json;
use test_context::test_context;
use test_log::test;
use uuid::Uuid;

fn data(name: &str) -> EmployeeData {
    EmployeeData {
        nik: None,
        name: name.into(),
        email: None,
        position: "Staff".into(),
        branch: "Jakarta".into(),
        department: "IT".into(),
        sub_department: "Infra".into(),
    }
}

#[test_context(AsetrackContext)]
#[test(tokio::test)]
async fn crud(ctx: &AsetrackContext) -> anyhow::Result<()> {
    let service = EmployeeService::new(ctx.db.clone());

    let created = service
        .create(EmployeeData {
            nik: Some("1001".into()),
            ..data("Andi")
        })
        .await?;
    service.create(data("Bayu")).await?;

    let found = service.list(Some("1001"), Paginated::default()).await?;
    assert_eq!(found.results, vec![created.clone()]);

    let updated = service
        .update(
            created.id,
            EmployeeData {
                branch: "Surabaya".into(),
                ..data("Andi")
            },
        )
        .await?;
    assert_eq!(updated.branch, "Surabaya");
    assert_eq!(updated.nik, None);

    let result = service.update(Uuid::new_v4(), data("Nobody")).await;
    assert!(matches!(result, Err(Error::NotFound(_))), "{result:?}");

    let result = service.create(data("  ")).await;
    assert!(matches!(result, Err(Error::BadRequest(_))), "{result:?}");

    assert!(service.delete(created.id).await?);
    assert!(service.get(created.id).await?.is_none());
    assert!(!service.delete(created.id).await?);

    Ok(())
}

#[test_context(AsetrackContext)]
#[test(tokio::test)]
async fn delete_releases_assets(ctx: &AsetrackContext) -> anyhow::Result<()> {
    let service = EmployeeService::new(ctx.db.clone());
    let holder = ctx.employee("Rina", "Jakarta", "HR", "Payroll").await?;
    let asset = ctx.asset("INV-001", "Laptop", Some(holder.id)).await?;

    assert!(service.delete(holder.id).await?);

    let asset = AssetService::new(ctx.db.clone())
        .get(asset.id)
        .await?
        .expect("asset must remain");
    assert!(asset.holder.is_none());

    Ok(())
}

#[test_context(AsetrackContext)]
#[test(actix_web::test)]
async fn administration_required(ctx: &AsetrackContext) -> anyhow::Result<()> {
    let db = ctx.db.clone();
    let app = caller(|svc| {
        svc.service(utoipa_actix_web::scope("/api").configure(|svc| crate::configure(svc, db)));
    })
    .await?;

    let req = TestRequest::post()
        .uri("/api/v1/employee")
        .set_json(json!({"name": "Dewi", "branch": "Medan"}))
        .to_request()
        .test_auth(Uuid::new_v4(), Role::AssetManager);
    assert_eq!(app.call_service(req).await.status(), StatusCode::FORBIDDEN);

    let req = TestRequest::post()
        .uri("/api/v1/employee")
        .set_json(json!({"name": "Dewi", "branch": "Medan"}))
        .to_request()
        .test_auth(Uuid::new_v4(), Role::SuperAdmin);
    assert_eq!(app.call_service(req).await.status(), StatusCode::CREATED);

    Ok(())
}
