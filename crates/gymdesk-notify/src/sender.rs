//! # Message Senders
//!
//! The delivery seam. The queue only knows [`MessageSender`]; the WhatsApp
//! gateway client (or a test double) lives behind it.

use async_trait::async_trait;
use tracing::info;

use crate::error::NotifyResult;
use crate::message::Notification;

/// Delivers one message.
///
/// Return [`NotifyError::SendFailed`](crate::NotifyError::SendFailed) for
/// transient failures the queue should retry, and
/// [`NotifyError::Rejected`](crate::NotifyError::Rejected) for ones it should not.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Sends `notification` to its (already normalised) recipient.
    async fn send(&self, notification: &Notification) -> NotifyResult<()>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}

/// Writes messages to the log instead of sending them.
///
/// Default sender for development and for installs without a gateway.
#[derive(Debug, Default, Clone)]
pub struct LogSender;

#[async_trait]
impl MessageSender for LogSender {
    async fn send(&self, notification: &Notification) -> NotifyResult<()> {
        info!(
            id = %notification.id,
            to = %notification.recipient,
            kind = %notification.kind,
            body = %notification.body,
            "WhatsApp message (log only)"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}
