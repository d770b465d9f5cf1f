use actix_web::{HttpResponse, ResponseError, body::BoxBody};
use asetrack_common::error::ErrorInformation;
use sea_orm::DbErr;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0} not found")]
    NotFound(String),
    #[error("invalid request: {0}")]
    BadRequest(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Password(#[from] crate::password::PasswordError),
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

impl ResponseError for Error {
    fn error_response(&self) -> HttpResponse<BoxBody> {
        match self {
            Self::NotFound(_) => {
                HttpResponse::NotFound().json(ErrorInformation::new("NotFound", self))
            }
            Self::BadRequest(_) => {
                HttpResponse::BadRequest().json(ErrorInformation::new("BadRequest", self))
            }
            Self::Conflict(_) => {
                HttpResponse::Conflict().json(ErrorInformation::new("Conflict", self))
            }
            Self::Password(err) => HttpResponse::InternalServerError()
                .json(ErrorInformation::new("Password", err)),
            Self::Database(err) => HttpResponse::InternalServerError()
                .json(ErrorInformation::new("Database error", err)),
            Self::Any(err) => HttpResponse::InternalServerError()
                .json(ErrorInformation::new("System unknown", err)),
        }
    }
}
