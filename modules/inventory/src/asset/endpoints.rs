use super::{
    model::{AssetSummary, Assignment, NewAsset},
    service::AssetService,
};
use crate::Error;
use actix_web::{HttpResponse, Responder, delete, get, post, web};
use asetrack_auth::{AssetManagement, Inventori, authorizer::Require};
use asetrack_common::{
    db::Database,
    model::{Paginated, PaginatedResults},
};
use utoipa::IntoParams;
use uuid::Uuid;

pub fn configure(svc: &mut utoipa_actix_web::service_config::ServiceConfig, db: Database) {
    svc.app_data(web::Data::new(AssetService::new(db)))
        .service(all)
        .service(get)
        .service(create)
        .service(assign)
        .service(delete);
}

#[derive(Clone, Debug, Default, serde::Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AssetQuery {
    /// Only assets of this category
    #[serde(default)]
    pub category: Option<String>,
    /// Only assets whose number, name, serial or label contains this text
    #[serde(default)]
    pub q: Option<String>,
}

#[utoipa::path(
    tag = "asset",
    operation_id = "listAssets",
    params(AssetQuery, Paginated),
    responses(
        (status = 200, description = "Matching assets", body = PaginatedResults<AssetSummary>),
    ),
)]
#[get("/v1/asset")]
/// List assets
pub async fn all(
    service: web::Data<AssetService>,
    web::Query(query): web::Query<AssetQuery>,
    web::Query(paginated): web::Query<Paginated>,
    _: Require<Inventori>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(
        service
            .list(query.category.as_deref(), query.q.as_deref(), paginated)
            .await?,
    ))
}

#[utoipa::path(
    tag = "asset",
    operation_id = "getAsset",
    params(
        ("id", Path, description = "The id of the asset"),
    ),
    responses(
        (status = 200, description = "The asset", body = AssetSummary),
        (status = 404, description = "No such asset, or it was deleted"),
    ),
)]
#[get("/v1/asset/{id}")]
/// Get an asset
pub async fn get(
    service: web::Data<AssetService>,
    id: web::Path<Uuid>,
    _: Require<Inventori>,
) -> actix_web::Result<impl Responder> {
    match service.get(id.into_inner()).await? {
        Some(asset) => Ok(HttpResponse::Ok().json(asset)),
        None => Ok(HttpResponse::NotFound().finish()),
    }
}

#[utoipa::path(
    tag = "asset",
    operation_id = "createAsset",
    request_body = NewAsset,
    responses(
        (status = 201, description = "The registered asset", body = AssetSummary),
        (status = 400, description = "The asset data was invalid"),
        (status = 404, description = "The holder does not exist"),
        (status = 409, description = "The inventory number is already taken"),
    ),
)]
#[post("/v1/asset")]
/// Register an asset
pub async fn create(
    service: web::Data<AssetService>,
    web::Json(data): web::Json<NewAsset>,
    _: Require<Inventori>,
) -> Result<impl Responder, Error> {
    Ok(HttpResponse::Created().json(service.create(data).await?))
}

#[utoipa::path(
    tag = "asset",
    operation_id = "assignAsset",
    request_body = Assignment,
    params(
        ("id", Path, description = "The id of the asset"),
    ),
    responses(
        (status = 200, description = "The reassigned asset", body = AssetSummary),
        (status = 404, description = "No such asset or employee"),
    ),
)]
#[post("/v1/asset/{id}/assign")]
/// Change the holder of an asset
pub async fn assign(
    service: web::Data<AssetService>,
    id: web::Path<Uuid>,
    web::Json(assignment): web::Json<Assignment>,
    _: Require<AssetManagement>,
) -> Result<impl Responder, Error> {
    Ok(HttpResponse::Ok().json(service.assign(id.into_inner(), assignment).await?))
}

#[utoipa::path(
    tag = "asset",
    operation_id = "deleteAsset",
    params(
        ("id", Path, description = "The id of the asset"),
    ),
    responses(
        (status = 204, description = "The asset was removed from the inventory"),
        (status = 404, description = "No such asset, or it was already deleted"),
    ),
)]
#[delete("/v1/asset/{id}")]
/// Remove an asset from the inventory
pub async fn delete(
    service: web::Data<AssetService>,
    id: web::Path<Uuid>,
    _: Require<Inventori>,
) -> Result<impl Responder, Error> {
    match service.delete(id.into_inner()).await? {
        true => Ok(HttpResponse::NoContent().finish()),
        false => Ok(HttpResponse::NotFound().finish()),
    }
}
