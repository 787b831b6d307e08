use std::{env, net::{SocketAddr, ToSocketAddrs as _}, time::Duration};

use sea_orm::ConnectOptions;
use tracing::info;

use crate::consts::DEFAULT_AUTOSAVE_SECS;

pub struct Config {
    pub host_address: SocketAddr,

    pub database_opt: ConnectOptions,

    pub jwt_key: String,

    pub admin_email: String,
    pub admin_password: String,

    pub location_secret: String,

    pub autosave_interval: Duration,
}

pub fn load() -> Config {
    Config {
        host_address: load_host_address(),
        database_opt: load_database_opt().into(),
        jwt_key: load_jwt_key(),
        admin_email: load_required("ADMIN_EMAIL"),
        admin_password: load_required("ADMIN_PASSWORD"),
        location_secret: load_required("LOCATION_SECRET"),
        autosave_interval: load_autosave_interval(),
    }
}

fn load_host_address() -> SocketAddr {
    info!("Loading environment `HOST_ADDRESS`");

    let var = env::var("HOST_ADDRESS").unwrap_or_else(|_| "127.0.0.1:0".to_string());

    var.to_socket_addrs()
        .expect("`HOST_ADDRESS` is not in a valid format").nth(0)
        .expect("unable to resolve host from `HOST_ADDRESS`")
}

fn load_database_opt() -> impl Into<ConnectOptions> {
    info!("Loading environment `DATABASE_URL`");

    env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://attendance.db?mode=rwc".to_string())
}

fn load_jwt_key() -> String {
    load_required("JWT_SECRET")
}

fn load_required(name: &str) -> String {
    info!("Loading environment `{name}`");

    env::var(name).unwrap_or_else(|_| panic!("Environment `{name}` is required to be set"))
}

fn load_autosave_interval() -> Duration {
    info!("Loading environment `AUTOSAVE_INTERVAL_SECS`");

    let secs = env::var("AUTOSAVE_INTERVAL_SECS")
        .map(|var| var.parse::<u64>().expect("`AUTOSAVE_INTERVAL_SECS` is not a number of seconds"))
        .unwrap_or(DEFAULT_AUTOSAVE_SECS);

    Duration::from_secs(secs)
}
