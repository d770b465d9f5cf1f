use super::{
    model::{Employee, EmployeeData},
    service::EmployeeService,
};
use crate::Error;
use actix_web::{HttpResponse, Responder, delete, get, post, put, web};
use asetrack_auth::{Administration, authorizer::Require};
use asetrack_common::{
    db::Database,
    model::{Paginated, PaginatedResults},
};
use utoipa::IntoParams;
use uuid::Uuid;

pub fn configure(svc: &mut utoipa_actix_web::service_config::ServiceConfig, db: Database) {
    svc.app_data(web::Data::new(EmployeeService::new(db)))
        .service(all)
        .service(get)
        .service(create)
        .service(update)
        .service(delete);
}

#[derive(Clone, Debug, Default, serde::Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EmployeeQuery {
    /// Only employees whose name or number contains this text
    #[serde(default)]
    pub q: Option<String>,
}

#[utoipa::path(
    tag = "employee",
    operation_id = "listEmployees",
    params(EmployeeQuery, Paginated),
    responses(
        (status = 200, description = "Matching employees", body = PaginatedResults<Employee>),
    ),
)]
#[get("/v1/employee")]
/// List employees
pub async fn all(
    service: web::Data<EmployeeService>,
    web::Query(query): web::Query<EmployeeQuery>,
    web::Query(paginated): web::Query<Paginated>,
    _: Require<Administration>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(service.list(query.q.as_deref(), paginated).await?))
}

#[utoipa::path(
    tag = "employee",
    operation_id = "getEmployee",
    params(
        ("id", Path, description = "The id of the employee"),
    ),
    responses(
        (status = 200, description = "The employee", body = Employee),
        (status = 404, description = "No such employee"),
    ),
)]
#[get("/v1/employee/{id}")]
/// Get an employee
pub async fn get(
    service: web::Data<EmployeeService>,
    id: web::Path<Uuid>,
    _: Require<Administration>,
) -> actix_web::Result<impl Responder> {
    match service.get(id.into_inner()).await? {
        Some(employee) => Ok(HttpResponse::Ok().json(employee)),
        None => Ok(HttpResponse::NotFound().finish()),
    }
}

#[utoipa::path(
    tag = "employee",
    operation_id = "createEmployee",
    request_body = EmployeeData,
    responses(
        (status = 201, description = "The created employee", body = Employee),
        (status = 400, description = "The employee data was invalid"),
        (status = 409, description = "The employee number is already taken"),
    ),
)]
#[post("/v1/employee")]
/// Create an employee
pub async fn create(
    service: web::Data<EmployeeService>,
    web::Json(data): web::Json<EmployeeData>,
    _: Require<Administration>,
) -> Result<impl Responder, Error> {
    Ok(HttpResponse::Created().json(service.create(data).await?))
}

#[utoipa::path(
    tag = "employee",
    operation_id = "updateEmployee",
    request_body = EmployeeData,
    params(
        ("id", Path, description = "The id of the employee"),
    ),
    responses(
        (status = 200, description = "The updated employee", body = Employee),
        (status = 400, description = "The employee data was invalid"),
        (status = 404, description = "No such employee"),
    ),
)]
#[put("/v1/employee/{id}")]
/// Update an employee
pub async fn update(
    service: web::Data<EmployeeService>,
    id: web::Path<Uuid>,
    web::Json(data): web::Json<EmployeeData>,
    _: Require<Administration>,
) -> Result<impl Responder, Error> {
    Ok(HttpResponse::Ok().json(service.update(id.into_inner(), data).await?))
}

#[utoipa::path(
    tag = "employee",
    operation_id = "deleteEmployee",
    params(
        ("id", Path, description = "The id of the employee"),
    ),
    responses(
        (status = 204, description = "The employee was deleted"),
        (status = 404, description = "No such employee"),
    ),
)]
#[delete("/v1/employee/{id}")]
/// Delete an employee, assets they hold become unassigned
pub async fn delete(
    service: web::Data<EmployeeService>,
    id: web::Path<Uuid>,
    _: Require<Administration>,
) -> Result<impl Responder, Error> {
    match service.delete(id.into_inner()).await? {
        true => Ok(HttpResponse::NoContent().finish()),
        false => Ok(HttpResponse::NotFound().finish()),
    }
}
