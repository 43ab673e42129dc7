use super::{create_router, AppState};
use crate::config::{ServerConfig, SmtpConfig};
use crate::mail::service::{FakeMailTransport, MailTransport, Mailer};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

fn test_state(transport: FakeMailTransport) -> AppState {
    let smtp = SmtpConfig {
        host: "smtp.example.com".to_string(),
        port: 587,
        secure: false,
        user: "artist@example.com".to_string(),
        pass: "hunter2".to_string(),
    };
    let transport: Arc<dyn MailTransport> = Arc::new(transport);
    AppState {
        mailer: Arc::new(Mailer::new(transport, &smtp)),
    }
}

fn test_router(transport: FakeMailTransport) -> axum::Router {
    create_router(test_state(transport), &ServerConfig::default())
}

fn post_json(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/send-email")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let response = test_router(FakeMailTransport::new())
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn valid_submission_sends_both_emails() {
    let transport = FakeMailTransport::new();
    let router = test_router(transport.clone());

    let response = router
        .oneshot(post_json(
            r#"{"name":"Ada","email":"ada@buyers.example","country":"Norway","message":"Hello"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert!(body["messageId"].as_str().unwrap().starts_with('<'));
    assert_eq!(transport.fake_sent_count(), 2);
}

#[tokio::test]
async fn missing_fields_are_rejected_without_sending() {
    let transport = FakeMailTransport::new();
    let router = test_router(transport.clone());

    let response = router
        .oneshot(post_json(r#"{"name":"Ada","email":"ada@buyers.example"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(transport.fake_sent_count(), 0);
}

#[tokio::test]
async fn invalid_email_is_a_bad_request() {
    let transport = FakeMailTransport::new();
    let router = test_router(transport.clone());

    let response = router
        .oneshot(post_json(
            r#"{"name":"Ada","email":"not-an-email","message":"Hello"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid email address");
    assert_eq!(transport.fake_sent_count(), 0);
}

#[tokio::test]
async fn transport_failure_maps_to_internal_error() {
    let transport = FakeMailTransport::new();
    transport.fake_fail_sends(true);
    let router = test_router(transport);

    let response = router
        .oneshot(post_json(
            r#"{"name":"Ada","email":"ada@buyers.example","message":"Hello"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Failed to send email");
}

#[tokio::test]
async fn unknown_routes_get_a_json_404() {
    let response = test_router(FakeMailTransport::new())
        .oneshot(
            Request::builder()
                .uri("/api/unknown")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Endpoint not found");
}
