use crate::model::{InvalidState, PeriodError};
use actix_web::{HttpResponse, ResponseError, body::BoxBody};
use asetrack_common::{db::DatabaseErrors, error::ErrorInformation};
use sea_orm::DbErr;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("invalid request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    State(#[from] InvalidState),
    #[error(transparent)]
    Database(DbErr),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

impl From<DbErr> for Error {
    fn from(value: DbErr) -> Self {
        if value.is_duplicate() {
            Self::Conflict("a conflicting entry already exists".into())
        } else {
            Self::Database(value)
        }
    }
}

impl From<PeriodError> for Error {
    fn from(value: PeriodError) -> Self {
        Self::BadRequest(value.to_string())
    }
}

impl ResponseError for Error {
    fn error_response(&self) -> HttpResponse<BoxBody> {
        match self {
            Self::NotFound(_) => {
                HttpResponse::NotFound().json(ErrorInformation::new("NotFound", self))
            }
            Self::Conflict(_) => {
                HttpResponse::Conflict().json(ErrorInformation::new("Conflict", self))
            }
            Self::BadRequest(_) => {
                HttpResponse::BadRequest().json(ErrorInformation::new("BadRequest", self))
            }
            Self::State(err) => HttpResponse::InternalServerError()
                .json(ErrorInformation::new("InconsistentState", err)),
            Self::Database(err) => HttpResponse::InternalServerError()
                .json(ErrorInformation::new("Database error", err)),
            Self::Any(err) => HttpResponse::InternalServerError()
                .json(ErrorInformation::new("System unknown", err)),
        }
    }
}
