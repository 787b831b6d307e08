use actix_web::{dev, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::{calendar::MonthRef, error::LedgerError};

/// Reads the month from the `{year}/{month}` path segments
impl FromRequest for MonthRef {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let (Some(year), Some(month)) = (req.match_info().get("year"), req.match_info().get("month")) else {
                return Err(actix_web::error::ErrorInternalServerError("month extractor used outside a `{year}/{month}` path"))
            };

            let (Ok(year), Ok(month)) = (year.parse::<i32>(), month.parse::<u32>()) else {
                return Err(actix_web::error::ErrorBadRequest("invalid `year` or `month`"))
            };

            Ok(MonthRef::new(year, month).map_err(LedgerError::from)?)
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{get, http::StatusCode, test, web, App, Responder};

    use super::*;

    #[actix_web::test]
    async fn test_month_extractor() {
        #[get("/{year}/{month}")]
        async fn test_handler(month: MonthRef) -> impl Responder {
            month.to_string()
        }

        let app = test::init_service(App::new().service(test_handler)).await;

        let req = test::TestRequest::default().uri("/2025/9").to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, web::Bytes::from_static(b"2025-09"));

        let req = test::TestRequest::default().uri("/2025/13").to_request();
        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::default().uri("/2025/sep").to_request();
        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
