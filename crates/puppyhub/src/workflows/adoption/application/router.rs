use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde_json::json;

use super::domain::{FormError, Step};
use super::fields::ApplicationPatch;
use super::persistence::StoragePort;
use super::service::ApplicationFormService;
use super::submission::{SubmissionEndpoint, SubmitError};

/// Router builder exposing the application form over JSON.
pub fn application_router<S, E>(service: Arc<ApplicationFormService<S, E>>) -> Router
where
    S: StoragePort + 'static,
    E: SubmissionEndpoint + 'static,
{
    Router::new()
        .route(
            "/api/v1/application",
            get(snapshot_handler::<S, E>)
                .patch(update_handler::<S, E>)
                .delete(reset_handler::<S, E>),
        )
        .route(
            "/api/v1/application/step/next",
            post(advance_handler::<S, E>),
        )
        .route(
            "/api/v1/application/step/previous",
            post(retreat_handler::<S, E>),
        )
        .route(
            "/api/v1/application/step/:step",
            put(set_step_handler::<S, E>),
        )
        .route(
            "/api/v1/application/steps/:step",
            get(step_report_handler::<S, E>),
        )
        .route("/api/v1/application/submit", post(submit_handler::<S, E>))
        .with_state(service)
}

pub(crate) async fn snapshot_handler<S, E>(
    State(service): State<Arc<ApplicationFormService<S, E>>>,
) -> Response
where
    S: StoragePort + 'static,
    E: SubmissionEndpoint + 'static,
{
    (StatusCode::OK, axum::Json(service.snapshot())).into_response()
}

pub(crate) async fn update_handler<S, E>(
    State(service): State<Arc<ApplicationFormService<S, E>>>,
    axum::Json(patch): axum::Json<ApplicationPatch>,
) -> Response
where
    S: StoragePort + 'static,
    E: SubmissionEndpoint + 'static,
{
    service.update_fields(patch);
    (StatusCode::OK, axum::Json(service.snapshot())).into_response()
}

pub(crate) async fn reset_handler<S, E>(
    State(service): State<Arc<ApplicationFormService<S, E>>>,
) -> Response
where
    S: StoragePort + 'static,
    E: SubmissionEndpoint + 'static,
{
    service.reset_record();
    (StatusCode::OK, axum::Json(service.snapshot())).into_response()
}

pub(crate) async fn advance_handler<S, E>(
    State(service): State<Arc<ApplicationFormService<S, E>>>,
) -> Response
where
    S: StoragePort + 'static,
    E: SubmissionEndpoint + 'static,
{
    step_response(service.advance_step())
}

pub(crate) async fn retreat_handler<S, E>(
    State(service): State<Arc<ApplicationFormService<S, E>>>,
) -> Response
where
    S: StoragePort + 'static,
    E: SubmissionEndpoint + 'static,
{
    step_response(service.retreat_step())
}

pub(crate) async fn set_step_handler<S, E>(
    State(service): State<Arc<ApplicationFormService<S, E>>>,
    Path(raw): Path<String>,
) -> Response
where
    S: StoragePort + 'static,
    E: SubmissionEndpoint + 'static,
{
    let outcome = parse_step_number(&raw).and_then(|number| service.set_step(number));
    match outcome {
        Ok(step) => step_response(step),
        Err(error) => form_error_response(error, service.step()),
    }
}

pub(crate) async fn step_report_handler<S, E>(
    State(service): State<Arc<ApplicationFormService<S, E>>>,
    Path(raw): Path<String>,
) -> Response
where
    S: StoragePort + 'static,
    E: SubmissionEndpoint + 'static,
{
    let step = match parse_step_number(&raw).and_then(Step::try_from) {
        Ok(step) => step,
        Err(error) => return form_error_response(error, service.step()),
    };

    let report = service.step_report(step);
    let payload = json!({
        "step": step,
        "label": step.label(),
        "valid": report.is_valid(),
        "errors": report.to_field_map(),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn submit_handler<S, E>(
    State(service): State<Arc<ApplicationFormService<S, E>>>,
) -> Response
where
    S: StoragePort + 'static,
    E: SubmissionEndpoint + 'static,
{
    match service.submit_detailed().await {
        Ok(receipt) => {
            let payload = json!({
                "reference": receipt.reference,
                "accepted_at": receipt.accepted_at,
                "submission": service.submission_status(),
            });
            (StatusCode::ACCEPTED, axum::Json(payload)).into_response()
        }
        Err(SubmitError::AlreadySubmitting) => {
            let payload = json!({
                "error": "a submission is already in flight",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(SubmitError::Failed(failure)) => {
            let payload = json!({
                "error": service.submit_error(),
                "detail": failure.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}

/// Path segments that are not a small number get the same JSON rejection as 0 or 5.
fn parse_step_number(raw: &str) -> Result<u8, FormError> {
    raw.trim()
        .parse::<u8>()
        .map_err(|_| FormError::UnrecognizedStep(raw.to_string()))
}

fn step_response(step: Step) -> Response {
    let payload = json!({
        "step": step,
        "label": step.label(),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

fn form_error_response(error: FormError, current: Step) -> Response {
    let payload = json!({
        "error": error.to_string(),
        "step": current,
    });
    (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
}
