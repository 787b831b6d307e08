use actix_web::{get, post, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::{
    auth::{LocationGate, Operator},
    error::LedgerError,
    session::Session,
};

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(list_locations)
        .service(create_location);
}

#[derive(Debug, Serialize, Deserialize)]
struct CreateLocation {
    name: String,
    secret: String,
}

#[get("")]
async fn list_locations(session: web::Data<Session>, _operator: Operator) -> impl Responder {
    web::Json(session.read(|roster| roster.locations().to_vec()).await)
}

/// Behind the shared location secret on top of the login
#[post("")]
async fn create_location(
    session: web::Data<Session>,
    gate: web::Data<LocationGate>,
    _operator: Operator,
    payload: web::Json<CreateLocation>,
) -> Result<impl Responder, LedgerError> {
    if !gate.check(&payload.secret) {
        return Err(LedgerError::LocationGate);
    }

    let id = session.add_location(&payload.name).await?;

    Ok(HttpResponse::Created().json(web::Json(id)))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::{Method, StatusCode}, test, App};

    use crate::{ids::LocationId, pages::testing, roster::{Location, Roster}};

    use super::*;

    #[actix_web::test]
    async fn test_create_location() {
        let app = test::init_service(
            App::new()
                .app_data(testing::session(Roster::default()))
                .app_data(testing::authority())
                .app_data(testing::gate())
                .service(web::scope("/locations").configure(config))
        ).await;

        {
            let forbidden_req = test::TestRequest::default()
                .uri("/locations")
                .method(Method::POST)
                .insert_header(testing::bearer())
                .set_json(CreateLocation { name: "Cairo".to_owned(), secret: "guess".to_owned() })
                .to_request();

            let response = test::call_service(&app, forbidden_req).await;
            assert_eq!(response.status(), StatusCode::FORBIDDEN);
        }

        {
            let blank_req = test::TestRequest::default()
                .uri("/locations")
                .method(Method::POST)
                .insert_header(testing::bearer())
                .set_json(CreateLocation { name: " ".to_owned(), secret: "open sesame".to_owned() })
                .to_request();

            let response = test::call_service(&app, blank_req).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }

        let id = {
            let req = test::TestRequest::default()
                .uri("/locations")
                .method(Method::POST)
                .insert_header(testing::bearer())
                .set_json(CreateLocation { name: "Cairo".to_owned(), secret: "open sesame".to_owned() })
                .to_request();

            let response = test::call_service(&app, req).await;
            assert_eq!(response.status(), StatusCode::CREATED);
            test::read_body_json::<LocationId, _>(response).await
        };

        let req = test::TestRequest::default()
            .uri("/locations")
            .insert_header(testing::bearer())
            .to_request();

        let locations: Vec<Location> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].id, id);
        assert_eq!(locations[0].name, "Cairo");
    }
}
