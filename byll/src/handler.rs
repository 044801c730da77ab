use crate::webhook::{IncomingMessage, MessagingEvent, WebhookPayload};
use byll_application::{MessageProcessor, Notifier};
use byll_domain::ConversationId;
use byll_presentation::OutcomePresenter;

/// Turns webhook events into ledger operations and replies.
#[derive(Clone)]
pub struct WebhookHandler<'a, N>
where
    N: Notifier,
{
    processor: MessageProcessor<'a>,
    notifier: N,
}

impl<'a, N> WebhookHandler<'a, N>
where
    N: Notifier,
{
    pub fn new(processor: MessageProcessor<'a>, notifier: N) -> Self {
        Self {
            processor,
            notifier,
        }
    }

    /// Handles every event of one delivery, in order.
    pub async fn handle_payload(&self, payload: WebhookPayload) {
        for entry in payload.entry {
            tracing::debug!(
                page = entry.id.as_deref().unwrap_or("?"),
                time = entry.time,
                events = entry.messaging.len(),
                "Webhook entry received"
            );
            for event in entry.messaging {
                self.handle_event(event).await;
            }
        }
    }

    pub async fn handle_event(&self, event: MessagingEvent) {
        tracing::trace!(
            sender = %event.sender.id,
            recipient = event.recipient.as_ref().map(|party| party.id.as_str()),
            timestamp = event.timestamp,
            "Messaging event"
        );
        let conversation = ConversationId::new(event.sender.id);

        if let Some(message) = event.message {
            self.handle_message(&conversation, message).await;
        } else if let Some(postback) = event.postback {
            match postback.payload {
                Some(payload) => self.handle_text(&conversation, &payload).await,
                None => tracing::debug!(conversation = %conversation, "Postback without payload"),
            }
        } else if let Some(optin) = event.optin {
            tracing::info!(
                conversation = %conversation,
                pass_through = optin.pass_through.as_deref().unwrap_or(""),
                "Authentication received"
            );
            self.notifier
                .notify(&conversation, OutcomePresenter::authentication_successful())
                .await;
        } else if let Some(delivery) = event.delivery {
            tracing::debug!(
                conversation = %conversation,
                messages = delivery.mids.len(),
                watermark = delivery.watermark,
                "Delivery confirmed"
            );
        } else if let Some(read) = event.read {
            tracing::debug!(
                conversation = %conversation,
                watermark = read.watermark,
                "Messages read"
            );
        } else {
            tracing::warn!(conversation = %conversation, "Unknown messaging event");
        }
    }

    async fn handle_message(&self, conversation: &ConversationId, message: IncomingMessage) {
        if message.is_echo {
            tracing::debug!(
                conversation = %conversation,
                mid = message.mid.as_deref().unwrap_or(""),
                "Ignoring echo"
            );
            return;
        }

        let text = message
            .quick_reply
            .and_then(|quick_reply| quick_reply.payload)
            .or(message.text);

        match text {
            Some(text) => self.handle_text(conversation, &text).await,
            None if !message.attachments.is_empty() => {
                self.notifier
                    .notify(conversation, OutcomePresenter::attachments_unsupported())
                    .await;
            }
            None => tracing::debug!(conversation = %conversation, "Empty message"),
        }
    }

    async fn handle_text(&self, conversation: &ConversationId, text: &str) {
        let outcome = self.processor.process_text(conversation, text);
        tracing::debug!(conversation = %conversation, ?outcome, "Message processed");
        let reply = OutcomePresenter::render(&outcome);
        if !reply.is_empty() {
            self.notifier.notify(conversation, reply).await;
        }
    }
}
