use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;

use crate::workflows::adoption::application::router::submit_handler;
use crate::workflows::adoption::application::{
    application_router, ApplicationPatch, MemoryStorage, Step, SUBMIT_ERROR_MESSAGE,
};

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
        .expect("request")
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

#[tokio::test]
async fn patch_then_get_reflects_merged_fields() {
    let (service, _, _) = build_service(CountingEndpoint::accepting(Duration::ZERO));
    let router = application_router(service);

    let response = router
        .clone()
        .oneshot(json_request(
            Method::PATCH,
            "/api/v1/application",
            json!({ "firstName": "Ada", "preferredSizes": ["mini", "toy"] }),
        ))
        .await
        .expect("patch response");
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(empty_request(Method::GET, "/api/v1/application"))
        .await
        .expect("get response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["record"]["firstName"], "Ada");
    assert_eq!(body["record"]["preferredSizes"], json!(["toy", "mini"]));
    assert_eq!(body["step"], 1);
    assert_eq!(body["steps"].as_array().map(Vec::len), Some(4));
    assert_eq!(body["steps"][0]["valid"], false);
    assert_eq!(body["submission"]["state"], "idle");
}

#[tokio::test]
async fn patch_with_unknown_field_is_rejected() {
    let (service, _, _) = build_service(CountingEndpoint::accepting(Duration::ZERO));
    let response = application_router(Arc::clone(&service))
        .oneshot(json_request(
            Method::PATCH,
            "/api/v1/application",
            json!({ "nickname": "Ada" }),
        ))
        .await
        .expect("patch response");

    assert!(response.status().is_client_error());
    assert_eq!(service.record().first_name, "");
}

#[tokio::test]
async fn step_routes_navigate_and_reject_out_of_range() {
    let (service, _, _) = build_service(CountingEndpoint::accepting(Duration::ZERO));
    let router = application_router(Arc::clone(&service));

    let response = router
        .clone()
        .oneshot(empty_request(Method::POST, "/api/v1/application/step/next"))
        .await
        .expect("next response");
    assert_eq!(body_json(response).await["step"], 2);

    let response = router
        .clone()
        .oneshot(empty_request(Method::PUT, "/api/v1/application/step/7"))
        .await
        .expect("set response");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["step"], 2);
    assert_eq!(service.step(), Step::Preferences);

    let response = router
        .clone()
        .oneshot(empty_request(Method::PUT, "/api/v1/application/step/4"))
        .await
        .expect("set response");
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(empty_request(
            Method::POST,
            "/api/v1/application/step/previous",
        ))
        .await
        .expect("previous response");
    let body = body_json(response).await;
    assert_eq!(body["step"], 3);
    assert_eq!(body["label"], "Household Info");
}

#[tokio::test]
async fn step_report_lists_field_errors() {
    let (service, _, _) = build_service(CountingEndpoint::accepting(Duration::ZERO));
    service.update_fields(ApplicationPatch::from(complete_record()));
    service.set_text(
        crate::workflows::adoption::application::TextField::ConfirmEmail,
        "ada@example.net",
    );
    let router = application_router(service);

    let response = router
        .clone()
        .oneshot(empty_request(Method::GET, "/api/v1/application/steps/1"))
        .await
        .expect("report response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["valid"], false);
    assert_eq!(body["errors"]["confirmEmail"], "Email addresses do not match");

    let response = router
        .oneshot(empty_request(Method::GET, "/api/v1/application/steps/0"))
        .await
        .expect("report response");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn oversized_or_non_numeric_steps_get_a_json_rejection() {
    let (service, _, _) = build_service(CountingEndpoint::accepting(Duration::ZERO));
    service.advance_step();
    let router = application_router(Arc::clone(&service));

    for (method, uri) in [
        (Method::GET, "/api/v1/application/steps/300"),
        (Method::PUT, "/api/v1/application/step/300"),
        (Method::PUT, "/api/v1/application/step/two"),
    ] {
        let response = router
            .clone()
            .oneshot(empty_request(method, uri))
            .await
            .expect("step response");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
        let body = body_json(response).await;
        assert_eq!(body["step"], 2, "{uri}");
        assert!(body["error"].as_str().is_some_and(|error| !error.is_empty()));
    }
    assert_eq!(service.step(), Step::Preferences);
}

#[tokio::test]
async fn submit_route_reports_generic_error_for_incomplete_application() {
    let (service, _, _) = build_service(CountingEndpoint::accepting(Duration::ZERO));
    let response = application_router(service)
        .oneshot(empty_request(Method::POST, "/api/v1/application/submit"))
        .await
        .expect("submit response");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"], SUBMIT_ERROR_MESSAGE);
}

#[tokio::test]
async fn submit_handler_accepts_complete_application() {
    let (service, storage, _) = build_service(CountingEndpoint::accepting(Duration::ZERO));
    service.update_fields(ApplicationPatch::from(complete_record()));

    let response =
        submit_handler::<MemoryStorage, CountingEndpoint>(State(Arc::clone(&service))).await;

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = body_json(response).await;
    assert_eq!(body["reference"], "test-1");
    assert_eq!(body["submission"]["state"], "succeeded");
    assert_eq!(service.record().first_name, "");
    assert!(!storage.contains(crate::workflows::adoption::application::DEFAULT_SLOT));
}

#[tokio::test]
async fn delete_resets_the_application() {
    let (service, _, _) = build_service(CountingEndpoint::accepting(Duration::ZERO));
    service.update_fields(ApplicationPatch::from(complete_record()));
    service.advance_step();

    let response = application_router(Arc::clone(&service))
        .oneshot(empty_request(Method::DELETE, "/api/v1/application"))
        .await
        .expect("delete response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["record"]["firstName"], "");
    assert_eq!(body["step"], 1);
    assert_eq!(service.step(), Step::Identity);
}
