use actix_web::{get, http::header::{ContentDisposition, ContentType, DispositionParam, DispositionType}, post, web, HttpResponse, Responder};
use tracing::info;

use crate::{auth::Operator, consts::IMPORT_LIMIT_BYTES, error::LedgerError, session::Session};

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .app_data(web::PayloadConfig::new(IMPORT_LIMIT_BYTES))
        .service(export)
        .service(import);
}

/// The employee roster as a downloadable document
#[get("/export")]
async fn export(session: web::Data<Session>, _operator: Operator) -> Result<impl Responder, LedgerError> {
    let document = session.export_employees().await?;

    let disposition = ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![
            DispositionParam::Filename(format!("attendance_data_{}.json", session.today().format("%Y-%m-%d"))),
        ],
    };

    Ok(
        HttpResponse::Ok()
            .insert_header(ContentType::json())
            .insert_header(disposition)
            .body(document)
    )
}

/// Replaces every employee with the posted document
#[post("/import")]
async fn import(session: web::Data<Session>, _operator: Operator, document: String) -> Result<impl Responder, LedgerError> {
    let count = session.import_employees(&document).await?;
    info!(count, "roster imported");

    Ok(web::Json(count))
}
