use std::fs::OpenOptions;

use actix_web::{web, App, HttpServer};
use attendance_ledger::{
    auth::{Authority, Credentials, LocationGate},
    config,
    pages,
    session::Session,
    store::DocumentStore,
    timers,
};
use migration::{Migrator, MigratorTrait as _};
use sea_orm::Database;
use tracing::{info, warn, Level};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{filter, fmt, layer::SubscriberExt, EnvFilter, Layer, Registry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenvy::dotenv();

    let log_file = OpenOptions::new()
        .append(true)
        .create(true)
        .open("trace.log")?;

    let subscriber = Registry::default()
        .with(
            fmt::layer()
                .with_ansi(true)
                .with_line_number(true)
                .with_filter(EnvFilter::from_default_env())
        )
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(log_file)
                .with_filter(filter::LevelFilter::from_level(Level::TRACE))
        );

    tracing::subscriber::set_global_default(subscriber).expect("Unable to install tracing subscriber");

    let config::Config {
        host_address,
        database_opt,
        jwt_key,
        admin_email,
        admin_password,
        location_secret,
        autosave_interval,
    } = config::load();

    let database = Database::connect(database_opt).await.expect("Unable to connect to database");
    Migrator::up(&database, None).await.expect("Unable to run migrations");

    let session = web::Data::new(
        Session::load(DocumentStore::new(database)).await.expect("Unable to restore the roster")
    );
    let authority = web::Data::new(Authority::new(jwt_key.as_bytes()));
    let credentials = web::Data::new(Credentials::new(admin_email, &admin_password));
    let gate = web::Data::new(LocationGate::new(&location_secret));

    let autosave = timers::spawn_autosave(session.clone(), autosave_interval);
    let midnight = timers::spawn_midnight_refresh(session.clone());

    let server_session = session.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(server_session.clone())
            .app_data(authority.clone())
            .app_data(credentials.clone())
            .app_data(gate.clone())
            .wrap(TracingLogger::default())
            .configure(pages::config)
    });

    let server = server.bind(host_address)?;
    for address in server.addrs() {
        info!(%address, "listening");
    }

    server.run().await?;

    autosave.shutdown().await;
    midnight.shutdown().await;

    if let Err(error) = session.save_all().await {
        warn!(%error, "final save failed");
    }

    Ok(())
}
