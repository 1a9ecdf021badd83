use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::trainers::applicants::ReviewServiceError;
use crate::workflows::trainers::import::ApplicantImportError;

/// Failure surfaced by the binary: startup, CSV commands and serving.
///
/// HTTP handlers map [`ReviewServiceError`] to status codes themselves, so
/// this type only needs to render for the terminal.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("server error: {0}")]
    Server(#[from] axum::Error),
    #[error("could not read applicant export: {0}")]
    Import(#[from] ApplicantImportError),
    #[error("review error: {0}")]
    Review(#[from] ReviewServiceError),
}
