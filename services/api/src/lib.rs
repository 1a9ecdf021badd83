mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use trainer_review::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
