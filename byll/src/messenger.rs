use byll_application::{Notifier, QuickReply, Reply};
use byll_domain::ConversationId;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::sync::Arc;

const MESSAGE_METADATA: &str = "DEVELOPER_DEFINED_METADATA";

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("send request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("send API answered {status}: {body}")]
    Status { status: StatusCode, body: String },
}

#[derive(Debug, Serialize, PartialEq)]
struct QuickReplyButton<'a> {
    content_type: &'static str,
    title: &'a str,
    payload: &'a str,
}

impl<'a> From<&'a QuickReply> for QuickReplyButton<'a> {
    fn from(reply: &'a QuickReply) -> Self {
        Self {
            content_type: "text",
            title: reply.title,
            payload: reply.payload,
        }
    }
}

#[derive(Debug, Serialize)]
struct Recipient<'a> {
    id: &'a str,
}

#[derive(Debug, Serialize)]
struct OutgoingMessage<'a> {
    text: &'a str,
    metadata: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    quick_replies: Vec<QuickReplyButton<'a>>,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    recipient: Recipient<'a>,
    message: OutgoingMessage<'a>,
}

impl<'a> SendRequest<'a> {
    fn text(recipient: &'a str, text: &'a str, quick_replies: &'a [QuickReply]) -> Self {
        Self {
            recipient: Recipient { id: recipient },
            message: OutgoingMessage {
                text,
                metadata: MESSAGE_METADATA,
                quick_replies: quick_replies.iter().map(QuickReplyButton::from).collect(),
            },
        }
    }
}

/// Messenger Send API client.
#[derive(Clone, Debug)]
pub struct MessengerClient {
    http_client: Client,
    endpoint: Arc<str>,
    access_token: Arc<str>,
}

impl MessengerClient {
    pub fn new(endpoint: impl Into<Arc<str>>, access_token: impl Into<Arc<str>>) -> Self {
        Self {
            http_client: Client::new(),
            endpoint: endpoint.into(),
            access_token: access_token.into(),
        }
    }

    /// Sends one text message, optionally with quick-reply buttons.
    pub async fn send_text(
        &self,
        recipient: &str,
        text: &str,
        quick_replies: &[QuickReply],
    ) -> Result<(), SendError> {
        let response = self
            .http_client
            .post(&*self.endpoint)
            .query(&[("access_token", &*self.access_token)])
            .json(&SendRequest::text(recipient, text, quick_replies))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SendError::Status { status, body });
        }

        tracing::debug!(recipient, "Message sent");
        Ok(())
    }
}

impl Notifier for MessengerClient {
    async fn notify(&self, conversation: &ConversationId, reply: Reply) {
        let last = reply.lines.len().saturating_sub(1);
        for (idx, line) in reply.lines.iter().enumerate() {
            let quick_replies: &[QuickReply] = if idx == last {
                &reply.quick_replies
            } else {
                &[]
            };
            // Stops at the first failed line.
            if let Err(err) = self
                .send_text(conversation.as_str(), line, quick_replies)
                .await
            {
                tracing::warn!(
                    conversation = %conversation,
                    line = idx,
                    "Failed to send reply: {err}"
                );
                return;
            }
        }
    }
}
