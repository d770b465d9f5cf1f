#[cfg(test)]
mod test;

use crate::{
    Error,
    model::{Category, DocumentSummary, HistoryDetail, Location, Period, ReviewView},
    service::{MaintenanceService, document::GroupingKey, report::Inspection},
};
use actix_web::{HttpResponse, Responder, get, http::header, post, web};
use asetrack_auth::{
    Maintenance, authenticator::user::UserInformation, authorizer::Require,
};
use asetrack_common::{
    db::Database,
    location::with_query,
    model::{Paginated, PaginatedResults},
};
use asetrack_entity::maintenance_report::Condition;
use serde::Deserialize;
use time::{Date, macros::format_description};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// mount the "maintenance" module
pub fn configure(svc: &mut utoipa_actix_web::service_config::ServiceConfig, db: Database) {
    // fixed paths go first, they would be taken for a category otherwise
    svc.app_data(web::Data::new(MaintenanceService::new(db)))
        .service(history)
        .service(history_detail)
        .service(pending)
        .service(submit)
        .service(approve)
        .service(review)
        .service(store);
}

/// What is selected on the review page.
///
/// All parts are kept as entered, so that they can be handed back when redirecting.
#[derive(Clone, Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Selection {
    /// Defaults to the current year
    #[serde(default)]
    pub year: String,
    /// `S1` or `S2`, defaults to the current semester
    #[serde(default)]
    pub semester: String,
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub sub_department: String,
}

impl Selection {
    pub fn period(&self) -> Result<Period, Error> {
        let current = Period::current();
        if self.year.is_empty() && self.semester.is_empty() {
            return Ok(current);
        }

        let semester = match self.semester.as_str() {
            "" => current.semester.to_string(),
            semester => semester.to_string(),
        };
        let year = match self.year.as_str() {
            "" => current.year.to_string(),
            year => year.to_string(),
        };

        Ok(format!("{semester}-{year}").parse::<Period>()?)
    }

    pub fn location(&self) -> Location {
        Location::new(
            self.branch.trim(),
            self.department.trim(),
            self.sub_department.trim(),
        )
    }

    /// Redirect back to the review page of a category, passing on a message.
    fn back(&self, category: Category, outcome: Result<&str, String>) -> HttpResponse {
        let mut query: Vec<(&str, &str)> = [
            ("year", &self.year),
            ("semester", &self.semester),
            ("branch", &self.branch),
            ("department", &self.department),
            ("sub_department", &self.sub_department),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, value)| (name, value.as_str()))
        .collect();

        match &outcome {
            Ok(message) => query.push(("msg", *message)),
            Err(message) => query.push(("error", message.as_str())),
        }

        HttpResponse::SeeOther()
            .insert_header((
                header::LOCATION,
                with_query(&category.review_path(), &query),
            ))
            .finish()
    }
}

fn category(slug: &str) -> Result<Category, Error> {
    slug.parse()
        .map_err(|_| Error::NotFound(format!("category '{slug}'")))
}

#[utoipa::path(
    tag = "maintenance",
    operation_id = "reviewMaintenance",
    params(
        ("category", Path, description = "The category slug, `laptop` or `komputer`"),
        Selection,
    ),
    responses(
        (status = 200, description = "The assets of the category with their reports", body = ReviewView),
        (status = 400, description = "The period was invalid"),
        (status = 404, description = "Unknown category"),
    ),
)]
#[get("/maintenance/{category}")]
/// Review the maintenance of a category for a period
pub async fn review(
    service: web::Data<MaintenanceService>,
    slug: web::Path<String>,
    web::Query(selection): web::Query<Selection>,
    _: Require<Maintenance>,
) -> Result<impl Responder, Error> {
    let category = category(&slug)?;
    let period = selection.period()?;

    Ok(HttpResponse::Ok().json(
        service
            .review(category, period, selection.location())
            .await?,
    ))
}

/// The form of an inspection, as posted from the review page.
#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct InspectionForm {
    pub asset_id: String,
    /// Derived from the inspection date if missing
    #[serde(default)]
    pub period: String,
    /// `true` if checked
    #[serde(default)]
    pub antivirus_updated: String,
    /// `true` if checked
    #[serde(default)]
    pub clear_temporary: String,
    pub overall_condition: String,
    /// As `YYYY-MM-DD`
    pub inspection_date: String,
    #[serde(default)]
    pub remarks: String,
    #[serde(flatten)]
    pub selection: Selection,
}

impl TryFrom<&InspectionForm> for Inspection {
    type Error = Error;

    fn try_from(form: &InspectionForm) -> Result<Self, Self::Error> {
        let asset_id = Uuid::parse_str(form.asset_id.trim())
            .map_err(|_| Error::BadRequest(format!("invalid asset id '{}'", form.asset_id)))?;

        let inspection_date = Date::parse(
            form.inspection_date.trim(),
            format_description!("[year]-[month]-[day]"),
        )
        .map_err(|_| {
            Error::BadRequest(format!(
                "invalid inspection date '{}', expected YYYY-MM-DD",
                form.inspection_date
            ))
        })?;

        let overall_condition = form
            .overall_condition
            .parse::<Condition>()
            .map_err(|_| {
                Error::BadRequest(format!(
                    "invalid condition '{}'",
                    form.overall_condition
                ))
            })?;

        let period = match form.period.trim() {
            "" => Period::of(inspection_date),
            period => period.parse::<Period>()?,
        };

        Ok(Self {
            asset_id,
            period,
            antivirus_updated: form.antivirus_updated == "true",
            clear_temporary: form.clear_temporary == "true",
            overall_condition,
            inspection_date,
            remarks: form.remarks.trim().to_string(),
        })
    }
}

#[utoipa::path(
    tag = "maintenance",
    operation_id = "storeMaintenanceReport",
    params(
        ("category", Path, description = "The category slug, `laptop` or `komputer`"),
    ),
    request_body(content = InspectionForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Back to the review page, with a message or an error"),
        (status = 404, description = "Unknown category or asset"),
    ),
)]
#[post("/maintenance/{category}/store")]
/// Record the inspection of an asset
pub async fn store(
    service: web::Data<MaintenanceService>,
    slug: web::Path<String>,
    user: UserInformation,
    web::Form(form): web::Form<InspectionForm>,
    _: Require<Maintenance>,
) -> Result<impl Responder, Error> {
    let category = category(&slug)?;

    let result = match Inspection::try_from(&form) {
        Ok(inspection) => service.store(inspection, user.id()).await.map(|_| ()),
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => Ok(form
            .selection
            .back(category, Ok("Maintenance report saved"))),
        Err(err @ (Error::BadRequest(_) | Error::Conflict(_))) => {
            Ok(form.selection.back(category, Err(err.to_string())))
        }
        Err(err) => Err(err),
    }
}

/// The form submitting, or approving, the reports of a review page.
#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct DocumentForm {
    pub category: String,
    /// Taken from `semester` and `year` if missing
    #[serde(default)]
    pub period: String,
    #[serde(flatten)]
    pub selection: Selection,
}

impl DocumentForm {
    fn category(&self) -> Result<Category, Error> {
        self.category
            .parse()
            .map_err(|_| Error::BadRequest(format!("unknown category '{}'", self.category)))
    }

    fn key(&self, category: Category) -> Result<GroupingKey, Error> {
        let period = match self.period.trim() {
            "" => self.selection.period()?,
            period => period.parse::<Period>()?,
        };

        Ok(GroupingKey {
            category,
            location: self.selection.location(),
            period,
        })
    }
}

#[utoipa::path(
    tag = "maintenance",
    operation_id = "submitMaintenanceReports",
    request_body(content = DocumentForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Back to the review page, with a message or an error"),
        (status = 400, description = "Unknown category"),
    ),
)]
#[post("/maintenance/submit")]
/// Submit the draft reports of a location for approval
pub async fn submit(
    service: web::Data<MaintenanceService>,
    user: UserInformation,
    web::Form(form): web::Form<DocumentForm>,
    _: Require<Maintenance>,
) -> Result<impl Responder, Error> {
    let category = form.category()?;

    let result = match form.key(category) {
        Ok(key) => service.submit(&key, user.id()).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(_) => Ok(form
            .selection
            .back(category, Ok("Reports submitted for approval"))),
        Err(err @ (Error::BadRequest(_) | Error::Conflict(_) | Error::NotFound(_))) => {
            Ok(form.selection.back(category, Err(err.to_string())))
        }
        Err(err) => Err(err),
    }
}

#[utoipa::path(
    tag = "maintenance",
    operation_id = "approveMaintenanceReports",
    request_body(content = DocumentForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Back to the review page, with a message or an error"),
        (status = 400, description = "Unknown category"),
        (status = 404, description = "Nothing is awaiting approval for the selection"),
    ),
)]
#[post("/maintenance/approve")]
/// Approve the submitted reports of a location
pub async fn approve(
    service: web::Data<MaintenanceService>,
    user: UserInformation,
    web::Form(form): web::Form<DocumentForm>,
    _: Require<Maintenance>,
) -> Result<impl Responder, Error> {
    let category = form.category()?;

    let result = match form.key(category) {
        Ok(key) => service.approve(&key, user.id()).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(_) => Ok(form.selection.back(category, Ok("Reports approved"))),
        Err(err @ Error::BadRequest(_)) => {
            Ok(form.selection.back(category, Err(err.to_string())))
        }
        Err(err) => Err(err),
    }
}

#[utoipa::path(
    tag = "maintenance",
    operation_id = "listMaintenanceDocuments",
    params(Paginated),
    responses(
        (status = 200, description = "All documents, newest first", body = PaginatedResults<DocumentSummary>),
    ),
)]
#[get("/maintenance/history")]
/// List the submitted documents
pub async fn history(
    service: web::Data<MaintenanceService>,
    web::Query(paginated): web::Query<Paginated>,
    _: Require<Maintenance>,
) -> Result<impl Responder, Error> {
    Ok(HttpResponse::Ok().json(service.history(paginated).await?))
}

#[utoipa::path(
    tag = "maintenance",
    operation_id = "getMaintenanceDocument",
    params(
        ("id", Path, description = "The id of the document"),
    ),
    responses(
        (status = 200, description = "The document with its reports", body = HistoryDetail),
        (status = 404, description = "No such document"),
    ),
)]
#[get("/maintenance/history/{id}")]
/// Get a document with the reports it holds
pub async fn history_detail(
    service: web::Data<MaintenanceService>,
    id: web::Path<Uuid>,
    _: Require<Maintenance>,
) -> Result<impl Responder, Error> {
    let id = id.into_inner();
    match service.history_detail(id).await? {
        Some(detail) => Ok(HttpResponse::Ok().json(detail)),
        None => Err(Error::NotFound(format!("document '{id}'"))),
    }
}

#[utoipa::path(
    tag = "maintenance",
    operation_id = "listPendingMaintenanceDocuments",
    responses(
        (status = 200, description = "The documents awaiting approval", body = Vec<DocumentSummary>),
    ),
)]
#[get("/maintenance/pending")]
/// List the documents awaiting approval
pub async fn pending(
    service: web::Data<MaintenanceService>,
    _: Require<Maintenance>,
) -> Result<impl Responder, Error> {
    Ok(HttpResponse::Ok().json(service.pending().await?))
}
