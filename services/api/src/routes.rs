use crate::infra::AppState;
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use puppyhub::workflows::adoption::application::{
    application_router, ApplicationFormService, StoragePort, SubmissionEndpoint,
};
use puppyhub::workflows::adoption::{breeds, choice_options, find_breed};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_application_routes<S, E>(
    service: Arc<ApplicationFormService<S, E>>,
) -> axum::Router
where
    S: StoragePort + 'static,
    E: SubmissionEndpoint + 'static,
{
    application_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/breeds", axum::routing::get(breeds_endpoint))
        .route("/api/v1/breeds/:breed_id", axum::routing::get(breed_endpoint))
        .route(
            "/api/v1/application/options",
            axum::routing::get(options_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn breeds_endpoint() -> impl IntoResponse {
    Json(breeds())
}

pub(crate) async fn breed_endpoint(Path(breed_id): Path<String>) -> impl IntoResponse {
    match find_breed(&breed_id) {
        Some(breed) => (StatusCode::OK, Json(json!(breed))),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("unknown breed '{breed_id}'") })),
        ),
    }
}

pub(crate) async fn options_endpoint() -> impl IntoResponse {
    Json(choice_options())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use puppyhub::workflows::adoption::application::{
        MemoryStorage, PersistenceAdapter, SimulatedEndpoint,
    };
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;
    use tower::ServiceExt;

    fn router() -> axum::Router {
        let service = ApplicationFormService::new(
            PersistenceAdapter::with_default_slot(Arc::new(MemoryStorage::default())),
            Arc::new(SimulatedEndpoint::new(Duration::ZERO)),
        );
        with_application_routes(Arc::new(service))
    }

    async fn get_json(router: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("body");
        (status, serde_json::from_slice(&bytes).expect("json"))
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (status, body) = get_json(router(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_follows_the_flag() {
        let handle = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(handle.handle()),
        };

        let response = readiness_endpoint(Extension(state.clone()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        state
            .readiness
            .store(true, std::sync::atomic::Ordering::Release);
        let response = readiness_endpoint(Extension(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn breeds_are_listed_and_looked_up() {
        let (status, body) = get_json(router(), "/api/v1/breeds").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(4));
        assert_eq!(body[0]["id"], "maltipoo");

        let (status, body) = get_json(router(), "/api/v1/breeds/bernedoodle").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["life_expectancy"], "12-18 years");

        let (status, _) = get_json(router(), "/api/v1/breeds/poodle").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn options_expose_labels_for_every_choice() {
        let (status, body) = get_json(router(), "/api/v1/application/options").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["preferredGender"][2]["value"], "either");
        assert_eq!(body["preferredGender"][2]["label"], "Either Gender");
        assert_eq!(body["pickupLocations"].as_array().map(Vec::len), Some(5));
    }

    #[tokio::test]
    async fn application_routes_are_mounted() {
        let (status, body) = get_json(router(), "/api/v1/application").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["step"], 1);
    }
}
