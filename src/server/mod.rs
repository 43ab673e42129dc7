use crate::config::ServerConfig;
use crate::mail::error::MailError;
use crate::mail::message::ContactForm;
use crate::mail::service::{MailTransport, Mailer};
use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

#[cfg(test)]
mod tests;

const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub mailer: Arc<Mailer<Arc<dyn MailTransport>>>,
}

#[derive(Debug, Deserialize)]
pub struct SendEmailRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendEmailResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "messageId")]
    pub message_id: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    fn new(error: impl Into<String>) -> Self {
        ErrorResponse {
            success: false,
            error: error.into(),
        }
    }
}

/// Create the relay API router
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/send-email", post(send_email))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config.frontend_url.as_deref()))
        .with_state(state)
}

fn cors_layer(frontend_url: Option<&str>) -> CorsLayer {
    let origin = frontend_url.unwrap_or(DEFAULT_FRONTEND_URL);
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);
    match origin.parse::<HeaderValue>() {
        Ok(value) => cors.allow_origin(value).allow_credentials(true),
        Err(_) => {
            warn!("Unparseable frontend URL '{}', CORS disabled", origin);
            cors
        }
    }
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "message": "Email service is running",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Accept a contact-form submission and relay both emails
async fn send_email(
    State(state): State<AppState>,
    Json(request): Json<SendEmailRequest>,
) -> Result<Json<SendEmailResponse>, (StatusCode, Json<ErrorResponse>)> {
    if request.name.is_none() || request.email.is_none() || request.message.is_none() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                "Missing required fields: name, email, and message are required",
            )),
        ));
    }

    let form = ContactForm::parse(
        request.name.as_deref().unwrap_or_default(),
        request.email.as_deref().unwrap_or_default(),
        request.country.as_deref(),
        request.message.as_deref().unwrap_or_default(),
    )
    .map_err(|e| match e {
        MailError::MissingField(_) | MailError::InvalidEmail => {
            (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string())))
        }
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(other.to_string())),
        ),
    })?;

    info!("Processing email request from {}", form.email);

    let message_id = state.mailer.send_contact(&form).await.map_err(|e| {
        error!("Failed to send contact emails: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("Failed to send email")),
        )
    })?;

    Ok(Json(SendEmailResponse {
        success: true,
        message: "Email sent successfully".to_string(),
        message_id,
    }))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Endpoint not found")),
    )
}

/// Bind and serve until the task is cancelled
pub async fn start_server(state: AppState, config: &ServerConfig) -> Result<()> {
    let router = create_router(state, config);
    let addr = format!("0.0.0.0:{}", config.port);

    info!("Mail relay listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, router)
        .await
        .context("Server error")?;
    Ok(())
}
