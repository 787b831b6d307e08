use actix_web::{get, post, web, Responder};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{AuthError, Authority, Credentials, Operator};

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(login)
        .service(whoami);
}

#[derive(Debug, Serialize, Deserialize)]
struct Login {
    email: String,
    password: String,
}

#[post("/login")]
async fn login(
    credentials: web::Data<Credentials>,
    authority: web::Data<Authority>,
    payload: web::Json<Login>,
) -> Result<String, AuthError> {
    let operator = credentials.verify(&payload.email, &payload.password)?;
    info!(email = %operator.email, "operator logged in");

    authority.issue_for(&operator)
}

#[get("")]
async fn whoami(operator: Operator) -> impl Responder {
    web::Json(operator)
}
