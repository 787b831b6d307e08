use actix_web::{body, dev, http::{self, header::ContentType, StatusCode}, web, FromRequest, HttpRequest, HttpResponse};
use chrono::{DateTime, Duration, Utc};
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::warn;

use crate::consts::SESSION_LIFETIME_HOURS;

/// Poor man's authentication
///
/// A single fixed operator account, nothing more
pub struct Authority {
    jwt_key: (EncodingKey, DecodingKey),
}

impl Authority {
    pub fn new(jwt_key: &[u8]) -> Self {
        Self {
            jwt_key: (EncodingKey::from_secret(jwt_key), DecodingKey::from_secret(jwt_key))
        }
    }

    /// Issue a token for the operator, expiring a day after login
    pub fn issue_for(&self, operator: &Operator) -> Result<String, AuthError> {
        let claims = Claims {
            exp: (operator.login_time + Duration::hours(SESSION_LIFETIME_HOURS)).timestamp(),
            data: operator,
        };

        Ok(encode(&Header::default(), &claims, &self.jwt_key.0)?)
    }

    pub fn authorize(&self, token: impl AsRef<str>) -> Result<Operator, AuthError> {
        let payload = decode::<Claims<Operator>>(token.as_ref(), &self.jwt_key.1, &Validation::default())?;

        Ok(payload.claims.data)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims<T> {
    exp: i64,
    data: T,
}

/// Whoever is logged in to the tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operator {
    pub email: String,
    pub name: String,
    pub login_time: DateTime<Utc>,
}

fn digest(secret: &str, salt: &str) -> Vec<u8> {
    Sha256::digest(format!("{secret}:{salt}")).to_vec()
}

/// The fixed credential pair. Only a digest of the password is kept.
pub struct Credentials {
    email: String,
    name: String,
    password: Vec<u8>,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: &str) -> Self {
        let email = email.into();
        let name = email.split_once('@').map_or(email.as_str(), |(name, _)| name).to_owned();

        Self {
            password: digest(password, &email),
            email,
            name,
        }
    }

    /// The operator for a successful login
    pub fn verify(&self, email: &str, password: &str) -> Result<Operator, AuthError> {
        let email = email.trim();

        if !email.eq_ignore_ascii_case(&self.email) || digest(password, &self.email) != self.password {
            warn!(email, "login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(Operator {
            email: self.email.clone(),
            name: self.name.clone(),
            login_time: Utc::now(),
        })
    }
}

/// Friction in front of location creation, not an access control
pub struct LocationGate {
    secret: Vec<u8>,
}

impl LocationGate {
    pub fn new(secret: &str) -> Self {
        Self { secret: digest(secret, "location") }
    }

    pub fn check(&self, secret: &str) -> bool {
        let passed = digest(secret, "location") == self.secret;
        if !passed {
            warn!("location gate rejected");
        }
        passed
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authority error")]
    AuthorityError(#[from] jsonwebtoken::errors::Error),
    #[error("invalid credentials")]
    InvalidCredentials,
}

impl actix_web::error::ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse<body::BoxBody> {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::plaintext())
            .body(self.to_string())
    }

    fn status_code(&self) -> http::StatusCode {
        match self {
            AuthError::AuthorityError(_) | AuthError::InvalidCredentials => StatusCode::FORBIDDEN,
        }
    }
}

impl FromRequest for Operator {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            // Example: JWT sometoken
            //              ^ grabs this value
            let Some(Ok(Some((_, token)))) = req.headers()
                .get("Authorization")
                .map(|v|
                    v.to_str()
                        .map(|str| str.split_once(" "))
                )
            else {
                return Err(actix_web::error::ErrorUnauthorized("unauthorized"))
            };

            let Some(authority) = req.app_data::<web::Data<Authority>>() else {
                return Err(actix_web::error::ErrorInternalServerError("authority is not configured"))
            };

            Ok(authority.authorize(token)?)
        })
    }
}
