use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryApplicantStore, InMemoryAuthProvider, InMemoryCvStorage};
use crate::routes::with_applicant_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use trainer_review::config::AppConfig;
use trainer_review::error::AppError;
use trainer_review::telemetry;
use trainer_review::workflows::trainers::applicants::ApplicantReviewService;
use trainer_review::workflows::trainers::import::ApplicantCsvImporter;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = match args.seed_csv.take() {
        Some(path) => {
            let records = ApplicantCsvImporter::from_path(&path)?;
            info!(count = records.len(), path = %path.display(), "seeded applicant store");
            InMemoryApplicantStore::seeded(records)
        }
        None => InMemoryApplicantStore::default(),
    };

    let auth = match (args.admin_email.take(), args.admin_password.take()) {
        (Some(email), Some(password)) => InMemoryAuthProvider::with_operator(email, password),
        _ => InMemoryAuthProvider::default(),
    };
    if !auth.has_operator() {
        warn!("no operator configured; sign-in will be refused");
    }

    let review_service = Arc::new(ApplicantReviewService::new(
        Arc::new(store),
        Arc::new(auth),
        Arc::new(InMemoryCvStorage::default()),
        config.review.clone(),
    ));

    let app = with_applicant_routes(review_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        fetch_limit = config.review.fetch_limit,
        "trainer review service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
