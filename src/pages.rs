use actix_web::web;

mod auth;
mod calendar;
mod employees;
mod extractor;
mod locations;
mod reports;
mod transfer;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(web::scope("/auth")
            .configure(auth::config))
        .service(web::scope("/calendar")
            .configure(calendar::config))
        .service(web::scope("/employees")
            .configure(employees::config))
        .service(web::scope("/reports")
            .configure(reports::config))
        .service(web::scope("/locations")
            .configure(locations::config))
        .service(web::scope("/transfer")
            .configure(transfer::config));
}
