//! Integration tests for the HTTP gate
//!
//! Requests are driven through the router with `tower::ServiceExt::oneshot`.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use seo_content_gate::handler::{
    create_router, with_gate_layers, HandlerState, EMPTY_REQUEST_MESSAGE,
};
use seo_content_gate::GateConfig;

fn state() -> HandlerState {
    HandlerState::from_config(&GateConfig::default()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(
    router: Router,
    request: Request<Body>,
) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

async fn send_json(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, _, body) = send(router, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_validate_meta_and_schema() {
    let body = json!({
        "title": "Cat Litter Odor Control - Natural Activated Carbon",
        "description": "A".repeat(150),
        "targetKeyword": "cat litter",
        "schema": {
            "@context": "https://schema.org",
            "@type": "Organization",
            "name": "Purrify",
            "url": "https://purrify.ca"
        },
        "url": "/learn/odor-control"
    });

    let (status, json) =
        send_json(create_router(state()), post_json("/validate", &body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["meta"]["title"]["length"], 50);
    assert_eq!(json["meta"]["title"]["isOptimal"], true);
    assert_eq!(json["meta"]["description"]["length"], 150);
    assert_eq!(json["meta"]["description"]["isOptimal"], true);
    assert!(json["meta"]["score"].as_u64().unwrap() <= 100);

    assert_eq!(json["schema"]["isValid"], false);
    let errors = json["schema"]["errors"].as_array().unwrap();
    assert!(errors.iter().any(|e| e["field"] == "logo" && e["fix"].is_string()));
}

#[tokio::test]
async fn test_validate_schema_only_omits_meta() {
    let body = json!({"schema": {"@context": "https://schema.org", "@type": "Recipe"}});
    let (status, json) =
        send_json(create_router(state()), post_json("/validate", &body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json.get("meta").is_none());
    assert_eq!(json["schema"]["errors"][0]["message"], "Unsupported schema type: Recipe");
}

#[tokio::test]
async fn test_validate_requires_content() {
    let (status, json) = send_json(
        create_router(state()),
        post_json("/validate", r#"{"targetKeyword": "litter"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["message"], EMPTY_REQUEST_MESSAGE);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (status, json) =
        send_json(create_router(state()), post_json("/validate", "{\"title\": ")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_other_methods_not_allowed() {
    let (status, headers, body) = send(create_router(state()), get_request("/validate")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(headers[header::ALLOW], "POST");

    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"]["code"], "METHOD_NOT_ALLOWED");
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let (status, json) = send_json(create_router(state()), get_request("/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "NOT_FOUND");
}

async fn boom() -> &'static str {
    panic!("database password is hunter2")
}

#[tokio::test]
async fn test_panic_becomes_generic_500() {
    let router = with_gate_layers(Router::new().route("/boom", get(boom)));
    let (status, _, body) = send(router, get_request("/boom")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let text = String::from_utf8(body).unwrap();
    assert!(!text.contains("hunter2"));

    let json: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["error"]["message"], "Internal server error");
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let (_, headers, _) = send(create_router(state()), get_request("/health")).await;
    assert!(headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_health() {
    let (status, json) = send_json(create_router(state()), get_request("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "healthy");
    assert_eq!(json["data"]["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_metrics_after_validation() {
    let router = create_router(state());

    let body = json!({"title": "Cat Litter Odor Control - Natural Activated Carbon"});
    let (status, _, _) = send(router.clone(), post_json("/validate", &body.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _, _) = send(router.clone(), post_json("/validate", "{}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, headers, body) = send(router, get_request("/metrics")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/plain"));

    let text = String::from_utf8(body).unwrap();
    assert!(text.contains("seo_gate_requests_total{endpoint=\"validate\",outcome=\"ok\"} 1"));
    assert!(text.contains("seo_gate_requests_total{endpoint=\"validate\",outcome=\"bad_request\"} 1"));
    assert!(text.contains("seo_gate_content_score_count 1"));
}

#[tokio::test]
async fn test_metrics_disabled() {
    let mut config = GateConfig::default();
    config.server.telemetry_enabled = false;
    let router = create_router(HandlerState::from_config(&config).unwrap());

    let (status, _, _) = send(router, get_request("/metrics")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
