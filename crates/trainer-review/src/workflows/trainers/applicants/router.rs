use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApplicantId, ApplicantStatus};
use super::repository::{ApplicantStore, AuthProvider, BackendError, CvStorage};
use super::service::{ApplicantReviewService, ReviewServiceError};
use crate::workflows::trainers::search::ApplicantFilter;

type SharedService<S, A, C> = Arc<ApplicantReviewService<S, A, C>>;

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Query string accepted by the applicant listing.
#[derive(Debug, Default, Deserialize)]
pub struct ApplicantListQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub specialization: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: ApplicantStatus,
}

#[derive(Debug, Deserialize)]
pub struct CvLinkQuery {
    #[serde(default)]
    pub path: String,
}

/// Router builder exposing session, listing, status and CV endpoints.
pub fn applicant_router<S, A, C>(service: SharedService<S, A, C>) -> Router
where
    S: ApplicantStore + 'static,
    A: AuthProvider + 'static,
    C: CvStorage + 'static,
{
    Router::new()
        .route(
            "/api/v1/session",
            post(sign_in_handler::<S, A, C>).delete(sign_out_handler::<S, A, C>),
        )
        .route("/api/v1/applicants", get(list_handler::<S, A, C>))
        .route(
            "/api/v1/applicants/refresh",
            post(refresh_handler::<S, A, C>),
        )
        .route("/api/v1/applicants/cv", get(cv_link_handler::<S, A, C>))
        .route(
            "/api/v1/applicants/:applicant_id",
            get(details_handler::<S, A, C>),
        )
        .route(
            "/api/v1/applicants/:applicant_id/status",
            put(status_handler::<S, A, C>),
        )
        .with_state(service)
}

pub(crate) async fn sign_in_handler<S, A, C>(
    State(service): State<SharedService<S, A, C>>,
    Json(request): Json<SignInRequest>,
) -> Response
where
    S: ApplicantStore + 'static,
    A: AuthProvider + 'static,
    C: CvStorage + 'static,
{
    match service.sign_in(&request.email, &request.password) {
        Ok(session) => (StatusCode::CREATED, Json(session)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn sign_out_handler<S, A, C>(
    State(service): State<SharedService<S, A, C>>,
    headers: HeaderMap,
) -> Response
where
    S: ApplicantStore + 'static,
    A: AuthProvider + 'static,
    C: CvStorage + 'static,
{
    let result = bearer_token(&headers).and_then(|token| service.sign_out(token));
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_handler<S, A, C>(
    State(service): State<SharedService<S, A, C>>,
    headers: HeaderMap,
    Query(query): Query<ApplicantListQuery>,
) -> Response
where
    S: ApplicantStore + 'static,
    A: AuthProvider + 'static,
    C: CvStorage + 'static,
{
    if let Err(err) = authorize(&service, &headers) {
        return error_response(err);
    }

    let status = match query.status.trim() {
        "" => None,
        raw => match ApplicantStatus::parse(raw) {
            Some(status) => Some(status),
            None => {
                let payload = json!({ "error": format!("unknown status '{raw}'") });
                return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
            }
        },
    };

    if let Err(err) = service.ensure_loaded() {
        return error_response(err);
    }

    let filter =
        ApplicantFilter::from_inputs(&query.q, &query.specialization, &query.city, status);
    (StatusCode::OK, Json(service.search(&filter))).into_response()
}

pub(crate) async fn refresh_handler<S, A, C>(
    State(service): State<SharedService<S, A, C>>,
    headers: HeaderMap,
) -> Response
where
    S: ApplicantStore + 'static,
    A: AuthProvider + 'static,
    C: CvStorage + 'static,
{
    let result = authorize(&service, &headers).and_then(|_| service.refresh());
    match result {
        Ok(count) => (StatusCode::OK, Json(json!({ "count": count }))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn details_handler<S, A, C>(
    State(service): State<SharedService<S, A, C>>,
    headers: HeaderMap,
    Path(applicant_id): Path<String>,
) -> Response
where
    S: ApplicantStore + 'static,
    A: AuthProvider + 'static,
    C: CvStorage + 'static,
{
    let id = ApplicantId(applicant_id);
    let result = authorize(&service, &headers).and_then(|_| service.details(&id));
    match result {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn status_handler<S, A, C>(
    State(service): State<SharedService<S, A, C>>,
    headers: HeaderMap,
    Path(applicant_id): Path<String>,
    Json(request): Json<StatusUpdateRequest>,
) -> Response
where
    S: ApplicantStore + 'static,
    A: AuthProvider + 'static,
    C: CvStorage + 'static,
{
    let id = ApplicantId(applicant_id);
    let result =
        authorize(&service, &headers).and_then(|_| service.update_status(&id, request.status));
    match result {
        Ok(Some(view)) => (StatusCode::OK, Json(view)).into_response(),
        Ok(None) => {
            let payload = json!({
                "id": id.0,
                "status": request.status.label(),
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn cv_link_handler<S, A, C>(
    State(service): State<SharedService<S, A, C>>,
    headers: HeaderMap,
    Query(query): Query<CvLinkQuery>,
) -> Response
where
    S: ApplicantStore + 'static,
    A: AuthProvider + 'static,
    C: CvStorage + 'static,
{
    let result =
        authorize(&service, &headers).and_then(|_| service.cv_link(&query.path, Utc::now()));
    match result {
        Ok(url) => (StatusCode::OK, Json(json!({ "url": url }))).into_response(),
        Err(err) => error_response(err),
    }
}

fn authorize<S, A, C>(
    service: &ApplicantReviewService<S, A, C>,
    headers: &HeaderMap,
) -> Result<(), ReviewServiceError>
where
    S: ApplicantStore + 'static,
    A: AuthProvider + 'static,
    C: CvStorage + 'static,
{
    let token = bearer_token(headers)?;
    service.authorize(token).map(|_| ())
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, ReviewServiceError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(ReviewServiceError::Unauthenticated)
}

fn error_response(err: ReviewServiceError) -> Response {
    let status = match &err {
        ReviewServiceError::MissingCredentials | ReviewServiceError::MissingCvPath => {
            StatusCode::BAD_REQUEST
        }
        ReviewServiceError::Unauthenticated
        | ReviewServiceError::Backend(BackendError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
        ReviewServiceError::NotAuthorized => StatusCode::FORBIDDEN,
        ReviewServiceError::NotCached(_)
        | ReviewServiceError::SignedUrlUnavailable
        | ReviewServiceError::Backend(BackendError::NotFound) => StatusCode::NOT_FOUND,
        ReviewServiceError::Stale => StatusCode::CONFLICT,
        ReviewServiceError::Backend(BackendError::Unavailable(_)) => StatusCode::BAD_GATEWAY,
    };

    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}
