use crate::model::{DocumentSummary, HistoryDetail, ReportState, ReviewView};
use actix_http::StatusCode;
use actix_web::{dev::ServiceResponse, http::header, test::TestRequest};
use asetrack_auth::Role;
use asetrack_common::model::PaginatedResults;
use asetrack_entity::{maintenance_document::Status, maintenance_report};
use asetrack_test_context::{
    AsetrackContext,
    auth::TestAuthentication,
    call::{CallService, caller},
};
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;
use test_context::test_context;
use test_log::test;
use uuid::Uuid;

fn location(resp: &ServiceResponse) -> Option<&str> {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

#[test_context(AsetrackContext)]
#[test(actix_web::test)]
async fn review_page(ctx: &AsetrackContext) -> anyhow::Result<()> {
    let db = ctx.db.clone();
    let app = caller(|svc| crate::configure(svc, db)).await?;
    let holder = ctx.employee("Budi", "Jakarta", "IT", "Infra").await?;
    let asset = ctx.asset("LT-001", "Laptop", Some(holder.id)).await?;

    let req = TestRequest::get()
        .uri("/maintenance/laptop?year=2025&semester=S2&branch=Jakarta")
        .to_request()
        .test_auth(Uuid::new_v4(), Role::StafIt);
    let view: ReviewView = app.call_and_read_body_json(req).await;
    assert_eq!(view.period.to_string(), "S2-2025");
    assert_eq!(view.filter.branch, "Jakarta");
    assert!(view.row(asset.id).is_some());

    // without a selection, the current period is shown
    let req = TestRequest::get()
        .uri("/maintenance/Komputer")
        .to_request()
        .test_auth(Uuid::new_v4(), Role::StafIt);
    let view: ReviewView = app.call_and_read_body_json(req).await;
    assert_eq!(view.period, crate::model::Period::current());
    assert_eq!(view.rows().count(), 0);

    let req = TestRequest::get()
        .uri("/maintenance/printer")
        .to_request()
        .test_auth(Uuid::new_v4(), Role::StafIt);
    assert_eq!(app.call_service(req).await.status(), StatusCode::NOT_FOUND);

    let req = TestRequest::get()
        .uri("/maintenance/laptop?year=twenty")
        .to_request()
        .test_auth(Uuid::new_v4(), Role::StafIt);
    assert_eq!(
        app.call_service(req).await.status(),
        StatusCode::BAD_REQUEST
    );

    Ok(())
}

#[test_context(AsetrackContext)]
#[test(actix_web::test)]
async fn permissions(ctx: &AsetrackContext) -> anyhow::Result<()> {
    let db = ctx.db.clone();
    let app = caller(|svc| crate::configure(svc, db)).await?;

    let req = TestRequest::get()
        .uri("/maintenance/laptop")
        .to_request()
        .test_auth(Uuid::new_v4(), Role::Support);
    assert_eq!(app.call_service(req).await.status(), StatusCode::FORBIDDEN);

    let req = TestRequest::get().uri("/maintenance/history").to_request();
    assert_eq!(
        app.call_service(req).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let req = TestRequest::post()
        .uri("/maintenance/submit")
        .set_form(json!({"category": "Laptop", "branch": "Jakarta"}))
        .to_request()
        .test_auth(Uuid::new_v4(), Role::Support);
    assert_eq!(app.call_service(req).await.status(), StatusCode::FORBIDDEN);

    Ok(())
}

#[test_context(AsetrackContext)]
#[test(actix_web::test)]
async fn store_form(ctx: &AsetrackContext) -> anyhow::Result<()> {
    let db = ctx.db.clone();
    let app = caller(|svc| crate::configure(svc, db)).await?;
    let holder = ctx.employee("Budi", "Jakarta", "IT", "Infra").await?;
    let asset = ctx.asset("LT-001", "Laptop", Some(holder.id)).await?;
    let checker = Uuid::new_v4();

    let req = TestRequest::post()
        .uri("/maintenance/laptop/store")
        .set_form(json!({
            "asset_id": asset.id.to_string(),
            "antivirus_updated": "true",
            "overall_condition": "Tidak Normal",
            "inspection_date": "2025-03-15",
            "remarks": " fan noise ",
            "year": "2025",
            "semester": "S1",
            "branch": "Jakarta",
            "department": "",
        }))
        .to_request()
        .test_auth(checker, Role::StafIt);
    let resp = app.call_service(req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&resp),
        Some("/maintenance/laptop?year=2025&semester=S1&branch=Jakarta&msg=Maintenance+report+saved")
    );

    let report = maintenance_report::Entity::find()
        .one(&ctx.db)
        .await?
        .expect("report must be stored");
    assert_eq!(report.period, "S1-2025");
    assert!(report.antivirus_updated);
    assert!(!report.clear_temporary);
    assert_eq!(report.overall_condition, maintenance_report::Condition::NotNormal);
    assert_eq!(report.remarks, "fan noise");
    assert_eq!(report.checker_id, Some(checker));
    assert_eq!(report.user_name, "Budi");

    // invalid input goes back to the page
    let req = TestRequest::post()
        .uri("/maintenance/laptop/store")
        .set_form(json!({
            "asset_id": asset.id.to_string(),
            "overall_condition": "Normal",
            "inspection_date": "15/03/2025",
        }))
        .to_request()
        .test_auth(checker, Role::StafIt);
    let resp = app.call_service(req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(
        location(&resp).is_some_and(|l| l.starts_with("/maintenance/laptop?error=")),
        "{:?}",
        location(&resp)
    );

    let req = TestRequest::post()
        .uri("/maintenance/laptop/store")
        .set_form(json!({
            "asset_id": Uuid::new_v4().to_string(),
            "overall_condition": "Normal",
            "inspection_date": "2025-03-15",
        }))
        .to_request()
        .test_auth(checker, Role::StafIt);
    assert_eq!(app.call_service(req).await.status(), StatusCode::NOT_FOUND);

    assert_eq!(maintenance_report::Entity::find().count(&ctx.db).await?, 1);

    Ok(())
}

#[test_context(AsetrackContext)]
#[test(actix_web::test)]
async fn submit_and_approve(ctx: &AsetrackContext) -> anyhow::Result<()> {
    let db = ctx.db.clone();
    let app = caller(|svc| crate::configure(svc, db)).await?;
    let holder = ctx.employee("Budi", "Jakarta", "IT", "Infra").await?;
    let asset = ctx.asset("LT-001", "Laptop", Some(holder.id)).await?;
    let staff = Uuid::new_v4();
    let manager = Uuid::new_v4();

    let req = TestRequest::post()
        .uri("/maintenance/laptop/store")
        .set_form(json!({
            "asset_id": asset.id.to_string(),
            "overall_condition": "Normal",
            "inspection_date": "2025-03-15",
        }))
        .to_request()
        .test_auth(staff, Role::StafIt);
    assert_eq!(app.call_service(req).await.status(), StatusCode::SEE_OTHER);

    let form = json!({
        "category": "Laptop",
        "year": "2025",
        "semester": "S1",
        "branch": "Jakarta",
    });

    // nothing to approve yet
    let req = TestRequest::post()
        .uri("/maintenance/approve")
        .set_form(&form)
        .to_request()
        .test_auth(manager, Role::AssetManager);
    assert_eq!(app.call_service(req).await.status(), StatusCode::NOT_FOUND);

    let req = TestRequest::post()
        .uri("/maintenance/submit")
        .set_form(&form)
        .to_request()
        .test_auth(staff, Role::StafIt);
    let resp = app.call_service(req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&resp),
        Some("/maintenance/laptop?year=2025&semester=S1&branch=Jakarta&msg=Reports+submitted+for+approval")
    );

    // a second submission is refused, but only reported on the page
    let req = TestRequest::post()
        .uri("/maintenance/submit")
        .set_form(&form)
        .to_request()
        .test_auth(staff, Role::StafIt);
    let resp = app.call_service(req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(location(&resp).is_some_and(|l| l.contains("&error=")));

    let req = TestRequest::get()
        .uri("/maintenance/pending")
        .to_request()
        .test_auth(manager, Role::AssetManager);
    let pending: Vec<DocumentSummary> = app.call_and_read_body_json(req).await;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].submitted_by, Some(staff));

    let req = TestRequest::post()
        .uri("/maintenance/approve")
        .set_form(&form)
        .to_request()
        .test_auth(manager, Role::AssetManager);
    let resp = app.call_service(req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&resp),
        Some("/maintenance/laptop?year=2025&semester=S1&branch=Jakarta&msg=Reports+approved")
    );

    let req = TestRequest::get()
        .uri("/maintenance/history")
        .to_request()
        .test_auth(manager, Role::AssetManager);
    let history: PaginatedResults<DocumentSummary> = app.call_and_read_body_json(req).await;
    assert_eq!(history.number_of_items, 1);
    let document = &history.results[0];
    assert_eq!(document.status, Status::Approved);
    assert_eq!(document.approved_by, Some(manager));

    let req = TestRequest::get()
        .uri(&format!("/maintenance/history/{}", document.id))
        .to_request()
        .test_auth(manager, Role::AssetManager);
    let detail: HistoryDetail = app.call_and_read_body_json(req).await;
    let row = &detail.groups["Infra"][0];
    assert_eq!(row.asset.id, asset.id);
    assert!(matches!(row.report.state, ReportState::Approved { .. }));

    let req = TestRequest::get()
        .uri(&format!("/maintenance/history/{}", Uuid::new_v4()))
        .to_request()
        .test_auth(manager, Role::AssetManager);
    assert_eq!(app.call_service(req).await.status(), StatusCode::NOT_FOUND);

    let req = TestRequest::post()
        .uri("/maintenance/submit")
        .set_form(json!({"category": "printer"}))
        .to_request()
        .test_auth(staff, Role::StafIt);
    assert_eq!(
        app.call_service(req).await.status(),
        StatusCode::BAD_REQUEST
    );

    Ok(())
}
