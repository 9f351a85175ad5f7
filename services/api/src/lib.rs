mod cli;
mod demo;
mod infra;
mod routes;
mod server;
mod validate;

use puppyhub::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
