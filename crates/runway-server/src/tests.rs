//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use runway_core::{ForecastEngine, NoopAugmentor};
use tower::ServiceExt;

const BOUNDARY: &str = "runway-test-boundary";

fn setup_test_app() -> Router {
    let state = AppState::new(ForecastEngine::new(Box::new(NoopAugmentor)));
    create_router(state, ServerConfig::default())
}

fn sample_csv() -> &'static str {
    "date,amount,merchant,category,account\n\
     2026-03-01,3000.00,ACME PAYROLL,Income,checking\n\
     2026-03-02,-1500.00,CITY APARTMENTS,Rent,checking\n\
     2026-03-08,-500.00,CORNER BISTRO,Dining,credit\n"
}

fn multipart_request(parts: &[(&str, &str)]) -> Request<Body> {
    let mut body = String::new();
    for (name, value) in parts {
        body.push_str(&format!("--{BOUNDARY}\r\n"));
        if *name == "file" {
            body.push_str(
                "Content-Disposition: form-data; name=\"file\"; filename=\"transactions.csv\"\r\n",
            );
            body.push_str("Content-Type: text/csv\r\n\r\n");
        } else {
            body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
            ));
        }
        body.push_str(value);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    Request::builder()
        .method("POST")
        .uri("/api/forecast/analyze")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_analyze_on_track_goal() {
    let app = setup_test_app();
    let goal = r#"{"targetAmount": 3000, "monthsToDeadline": 3}"#;

    let response = app
        .oneshot(multipart_request(&[("file", sample_csv()), ("goal", goal)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["status"], "on_track");
    assert_eq!(json["onTrack"], true);
    assert_eq!(json["requiredMonthly"], 1000.0);
    assert_eq!(json["p50"], 1000.0);
    assert_eq!(json["monthlyGap"], 0.0);
    assert!(json["suggestions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_analyze_with_gap_returns_suggestions() {
    let app = setup_test_app();
    let goal = r#"{"targetAmount": 6000, "monthsToDeadline": 3}"#;

    let response = app
        .oneshot(multipart_request(&[("file", sample_csv()), ("goal", goal)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["status"], "off_track");
    assert_eq!(json["monthlyGap"], 1000.0);

    let suggestions = json["suggestions"].as_array().unwrap();
    assert!(!suggestions.is_empty());
    let levers: Vec<&str> = suggestions
        .iter()
        .map(|s| s["leverType"].as_str().unwrap())
        .collect();
    assert!(levers.contains(&"variable_trim"));
    assert!(levers.contains(&"timeline"));
    assert!(levers.contains(&"income"));
}

#[tokio::test]
async fn test_goal_text_payload() {
    let app = setup_test_app();
    let goal = r#"{"goalText": "Save $2.5k in 6 months"}"#;

    let response = app
        .oneshot(multipart_request(&[("file", sample_csv()), ("goal", goal)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["parsedTargetAmount"], 2500.0);
    assert_eq!(json["parsedMonthsToDeadline"], 6);
}

#[tokio::test]
async fn test_unresolvable_goal_is_bad_request() {
    let app = setup_test_app();
    let goal = r#"{"goalText": "become rich eventually"}"#;

    let response = app
        .oneshot(multipart_request(&[("file", sample_csv()), ("goal", goal)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("Goal resolution"));
}

#[tokio::test]
async fn test_missing_file_is_bad_request() {
    let app = setup_test_app();
    let goal = r#"{"targetAmount": 3000, "monthsToDeadline": 3}"#;

    let response = app
        .oneshot(multipart_request(&[("goal", goal)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_goal_json_is_bad_request() {
    let app = setup_test_app();

    let response = app
        .oneshot(multipart_request(&[
            ("file", sample_csv()),
            ("goal", "not json"),
        ]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
