#[macro_use]
extern crate rocket;

mod api;
mod dates;
mod db;
mod env;
mod error;
mod models;
mod query;
mod recorder;
mod telemetry;
#[cfg(test)]
mod test;
mod validation;

use api::{
    api_create_user, api_get_logs, api_get_users, api_log_exercise, bad_request, health,
    internal_error, not_found, unprocessable,
};
use env::load_environment;
use error::AppError;
use rocket::{Build, Rocket};
use telemetry::TelemetryFairing;
use telemetry::init_tracing;
use thiserror::Error;

use sqlx::SqlitePool;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
    #[error("{0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("{0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("Application error: {0}")]
    App(#[from] AppError),
}

#[launch]
async fn rocket() -> _ {
    init_tracing();

    if let Err(e) = load_environment() {
        warn!("Failed to load environment files: {}", e);
    }

    let pool = prepare_database()
        .await
        .expect("Failed to prepare SQLite database");

    init_rocket(pool).await
}

async fn prepare_database() -> Result<SqlitePool, Error> {
    let database_url = std::env::var("DATABASE_URL").unwrap_or_default();

    let pool = SqlitePool::connect(&database_url).await?;

    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Migrations completed successfully");

    Ok(pool)
}

pub async fn init_rocket(pool: SqlitePool) -> Rocket<Build> {
    info!("Starting exercise tracker");

    rocket::build()
        .manage(pool)
        .mount(
            "/api",
            routes![
                api_create_user,
                api_get_users,
                api_log_exercise,
                api_get_logs,
                health,
            ],
        )
        .register(
            "/api",
            catchers![bad_request, not_found, unprocessable, internal_error],
        )
        .attach(TelemetryFairing)
}
