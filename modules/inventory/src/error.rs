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
    Database(DbErr),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

impl From<DbErr> for Error {
    fn from(value: DbErr) -> Self {
        if value.is_duplicate() {
            Self::Conflict("an entry with the same key already exists".into())
        } else {
            Self::Database(value)
        }
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
            Self::Database(err) => HttpResponse::InternalServerError()
                .json(ErrorInformation::new("Database error", err)),
            Self::Any(err) => HttpResponse::InternalServerError()
                .json(ErrorInformation::new("System unknown", err)),
        }
    }
}
