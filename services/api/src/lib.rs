#[cfg(feature = "mysql")]
#[macro_use]
extern crate diesel;

mod cli;
mod grade;
mod infra;
#[cfg(feature = "mysql")]
mod mysql;
mod pages;
mod routes;
mod server;
mod views;

use food_grader::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
