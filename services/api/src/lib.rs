mod cli;
mod error;
mod evaluate;
mod infra;
mod routes;
mod server;

pub use error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
