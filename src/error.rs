use actix_web::{body, http::{header::ContentType, StatusCode}, HttpResponse};
use chrono::NaiveDate;
use thiserror::Error;

/// A rejected form submission. Nothing is mutated when one of these is returned.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("name is required")]
    EmptyName,
    #[error("position is required")]
    EmptyPosition,
    #[error("salary must be greater than zero")]
    NonPositiveSalary,
    #[error("location is required")]
    MissingLocation,
    #[error("location `{0}` does not exist")]
    UnknownLocation(String),
    #[error("location name is required")]
    EmptyLocationName,
    #[error("advance amount must be greater than zero")]
    NonPositiveAdvance,
    #[error("advance date is required")]
    MissingAdvanceDate,
    #[error("{0} is the weekly rest day")]
    RestDay(NaiveDate),
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("document is not valid JSON: {0}")]
    Syntax(serde_json::Error),
    #[error("document is not a sequence of employees")]
    NotASequence,
    #[error("document contains a malformed employee: {0}")]
    Malformed(serde_json::Error),
}

#[derive(Debug, Error, PartialEq)]
pub enum CalendarError {
    #[error("{year}-{month} is not a valid month")]
    InvalidMonth { year: i32, month: u32 },
}

/// Everything a request against the ledger can be refused with
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Calendar(#[from] CalendarError),
    #[error("export failed")]
    Export(#[from] serde_json::Error),
    #[error("wrong location secret")]
    LocationGate,
    #[error("not found")]
    NotFound,
}

impl actix_web::error::ResponseError for LedgerError {
    fn error_response(&self) -> HttpResponse<body::BoxBody> {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::plaintext())
            .body(self.to_string())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            LedgerError::Validation(_)
            | LedgerError::Import(_)
            | LedgerError::Calendar(_) => StatusCode::BAD_REQUEST,
            LedgerError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
            LedgerError::LocationGate => StatusCode::FORBIDDEN,
            LedgerError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}
