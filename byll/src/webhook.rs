use crate::{
    handler::WebhookHandler,
    signature::{SIGNATURE_HEADER, verify_signature},
};
use axum::{
    Router,
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
};
use byll_application::Notifier;
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    pub object: String,
    #[serde(default)]
    pub entry: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(default)]
    pub messaging: Vec<MessagingEvent>,
}

#[derive(Debug, Deserialize)]
pub struct Party {
    pub id: String,
}

/// One callback event; exactly one of the optional bodies is expected.
#[derive(Debug, Deserialize)]
pub struct MessagingEvent {
    pub sender: Party,
    #[serde(default)]
    pub recipient: Option<Party>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub message: Option<IncomingMessage>,
    #[serde(default)]
    pub postback: Option<Postback>,
    #[serde(default)]
    pub optin: Option<Optin>,
    #[serde(default)]
    pub delivery: Option<Delivery>,
    #[serde(default)]
    pub read: Option<Read>,
}

#[derive(Debug, Deserialize)]
pub struct IncomingMessage {
    #[serde(default)]
    pub mid: Option<String>,
    #[serde(default)]
    pub is_echo: bool,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub quick_reply: Option<QuickReplyPayload>,
    #[serde(default)]
    pub attachments: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct QuickReplyPayload {
    #[serde(default)]
    pub payload: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Postback {
    #[serde(default)]
    pub payload: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Optin {
    #[serde(default, rename = "ref")]
    pub pass_through: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Delivery {
    #[serde(default)]
    pub mids: Vec<String>,
    #[serde(default)]
    pub watermark: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct Read {
    #[serde(default)]
    pub watermark: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

pub struct AppState<N>
where
    N: Notifier,
{
    pub handler: WebhookHandler<'static, N>,
    pub app_secret: String,
    pub validation_token: String,
}

pub fn router<N>(state: Arc<AppState<N>>) -> Router
where
    N: Notifier,
{
    Router::new()
        .route("/webhook", get(verify::<N>).post(receive::<N>))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn verify<N>(
    State(state): State<Arc<AppState<N>>>,
    Query(params): Query<VerifyParams>,
) -> Result<String, StatusCode>
where
    N: Notifier,
{
    let subscribed = params.mode.as_deref() == Some("subscribe")
        && params.verify_token.as_deref() == Some(state.validation_token.as_str());
    if !subscribed {
        tracing::warn!(mode = ?params.mode, "Webhook validation failed");
        return Err(StatusCode::FORBIDDEN);
    }

    tracing::info!("Webhook validated");
    Ok(params.challenge.unwrap_or_default())
}

async fn receive<N>(
    State(state): State<Arc<AppState<N>>>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode
where
    N: Notifier,
{
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());
    if let Err(err) = verify_signature(state.app_secret.as_bytes(), signature, &body) {
        tracing::warn!("Rejected webhook delivery: {err}");
        return StatusCode::FORBIDDEN;
    }

    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            tracing::warn!("Malformed webhook body: {err}");
            return StatusCode::BAD_REQUEST;
        }
    };

    if payload.object != "page" {
        tracing::debug!(object = %payload.object, "Ignoring non-page webhook");
        return StatusCode::NOT_FOUND;
    }

    // Events are handled after the 200 goes out.
    let handler = state.handler.clone();
    tokio::spawn(async move {
        handler.handle_payload(payload).await;
    });

    StatusCode::OK
}
