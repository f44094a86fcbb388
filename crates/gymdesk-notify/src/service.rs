//! # Notification Service
//!
//! A single background task that drains a message queue at a fixed pace.
//!
//! ## Processing Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Notification Service Flow                            │
//! │                                                                         │
//! │  NotificationHandle::enqueue(n)                                        │
//! │       │  normalise recipient, try_send (never blocks the caller)       │
//! │       ▼                                                                 │
//! │  mpsc channel (queue_capacity) ──► local queue (VecDeque)              │
//! │                                          │                              │
//! │  every interval_ms:                      ▼                              │
//! │    take the first message that is due (not_before <= now)              │
//! │    MessageSender::send                                                 │
//! │       ├── Ok              → sent += 1                                  │
//! │       ├── SendFailed and attempts < max_attempts → back of the queue   │
//! │       └── otherwise       → failed += 1                                │
//! │                                                                         │
//! │  NotificationHandle::shutdown() → loop exits, queue is dropped         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, RwLock};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::{NotifyConfig, WhatsAppSettings};
use crate::error::{NotifyError, NotifyResult};
use crate::message::{normalize_phone, Notification};
use crate::sender::MessageSender;

// =============================================================================
// Status
// =============================================================================

/// Snapshot of the queue for the settings screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationStatus {
    /// Accepted but not yet sent or given up on.
    pub pending: usize,

    /// Delivered successfully.
    pub sent: u64,

    /// Given up on after `max_attempts` or a permanent rejection.
    pub failed: u64,

    /// Whether the background task is alive.
    pub running: bool,

    /// Most recent delivery error, if any.
    pub last_error: Option<String>,
}

// =============================================================================
// Handle
// =============================================================================

/// Cloneable handle to a running [`NotificationService`].
#[derive(Clone)]
pub struct NotificationHandle {
    tx: mpsc::Sender<Notification>,
    shutdown_tx: mpsc::Sender<oneshot::Sender<()>>,
    status: Arc<RwLock<NotificationStatus>>,
    settings: Arc<WhatsAppSettings>,
}

impl NotificationHandle {
    /// Queues a message and returns its id.
    ///
    /// Does not wait for delivery. Fails when messaging is disabled, the
    /// recipient is not a usable phone number, the queue is full, or the
    /// service has stopped.
    pub async fn enqueue(&self, mut notification: Notification) -> NotifyResult<Uuid> {
        if !self.settings.enabled {
            return Err(NotifyError::Disabled);
        }

        notification.recipient =
            normalize_phone(&notification.recipient, &self.settings.default_country_code)?;
        let id = notification.id;

        // Counted before sending so the worker can never decrement first
        self.status.write().await.pending += 1;

        if let Err(e) = self.tx.try_send(notification) {
            let mut status = self.status.write().await;
            status.pending = status.pending.saturating_sub(1);
            return Err(match e {
                mpsc::error::TrySendError::Full(_) => NotifyError::QueueFull,
                mpsc::error::TrySendError::Closed(_) => NotifyError::ShuttingDown,
            });
        }

        debug!(%id, "Notification queued");
        Ok(id)
    }

    /// Returns the current queue status.
    pub async fn status(&self) -> NotificationStatus {
        self.status.read().await.clone()
    }

    /// Stops the service and waits for the task to exit.
    ///
    /// Messages still queued are dropped. Calling this twice is harmless.
    pub async fn shutdown(&self) -> NotifyResult<()> {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.shutdown_tx.send(ack_tx).await.is_err() {
            // Already stopped
            return Ok(());
        }

        ack_rx
            .await
            .map_err(|_| NotifyError::ChannelError("Shutdown ack dropped".into()))
    }
}

// =============================================================================
// Service
// =============================================================================

/// Background task that owns the queue.
pub struct NotificationService {
    settings: Arc<WhatsAppSettings>,
    sender: Arc<dyn MessageSender>,
    rx: mpsc::Receiver<Notification>,
    shutdown_rx: mpsc::Receiver<oneshot::Sender<()>>,
    status: Arc<RwLock<NotificationStatus>>,
    queue: VecDeque<Notification>,
}

impl NotificationService {
    /// Spawns the service on the current tokio runtime.
    ///
    /// Fails with [`NotifyError::InvalidConfig`] before anything is spawned if
    /// `config` does not pass [`NotifyConfig::validate`].
    ///
    /// ## Example
    /// ```rust,ignore
    /// let handle = NotificationService::spawn(&NotifyConfig::load_or_default(None), Arc::new(LogSender))?;
    /// handle.enqueue(Notification::welcome("98765 43210", "Asha", "Iron Temple")).await?;
    /// ```
    pub fn spawn(
        config: &NotifyConfig,
        sender: Arc<dyn MessageSender>,
    ) -> NotifyResult<NotificationHandle> {
        config.validate()?;

        let settings = Arc::new(config.whatsapp.clone());
        let (tx, rx) = mpsc::channel(settings.queue_capacity);
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let status = Arc::new(RwLock::new(NotificationStatus {
            running: true,
            ..Default::default()
        }));

        let service = NotificationService {
            settings: Arc::clone(&settings),
            sender,
            rx,
            shutdown_rx,
            status: Arc::clone(&status),
            queue: VecDeque::new(),
        };
        tokio::spawn(service.run());

        Ok(NotificationHandle {
            tx,
            shutdown_tx,
            status,
            settings,
        })
    }

    async fn run(mut self) {
        info!(
            sender = self.sender.name(),
            interval_ms = self.settings.interval_ms,
            "Notification service starting"
        );

        let mut interval = tokio::time::interval(self.settings.interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let ack = loop {
            tokio::select! {
                biased;

                ack = self.shutdown_rx.recv() => {
                    info!(dropped = self.queue.len(), "Notification service shutting down");
                    break ack;
                }

                Some(notification) = self.rx.recv() => {
                    self.queue.push_back(notification);
                }

                _ = interval.tick() => {
                    self.dispatch_next().await;
                }
            }
        };

        self.rx.close();
        {
            let mut status = self.status.write().await;
            status.running = false;
            status.pending = 0;
        }
        if let Some(ack) = ack {
            let _ = ack.send(());
        }

        info!("Notification service stopped");
    }

    /// Sends the first due message, if any.
    async fn dispatch_next(&mut self) {
        let now = Utc::now();
        let Some(index) = self.queue.iter().position(|n| n.is_due(now)) else {
            return;
        };
        let Some(mut notification) = self.queue.remove(index) else {
            return;
        };

        notification.attempts += 1;

        match self.sender.send(&notification).await {
            Ok(()) => {
                debug!(id = %notification.id, attempts = notification.attempts, "Notification sent");
                let mut status = self.status.write().await;
                status.sent += 1;
                status.pending = status.pending.saturating_sub(1);
            }
            Err(e) if e.is_retryable() && notification.attempts < self.settings.max_attempts => {
                warn!(
                    id = %notification.id,
                    attempts = notification.attempts,
                    error = %e,
                    "Send failed, will retry"
                );
                self.status.write().await.last_error = Some(e.to_string());
                self.queue.push_back(notification);
            }
            Err(e) => {
                error!(
                    id = %notification.id,
                    attempts = notification.attempts,
                    error = %e,
                    "Giving up on notification"
                );
                let mut status = self.status.write().await;
                status.failed += 1;
                status.pending = status.pending.saturating_sub(1);
                status.last_error = Some(e.to_string());
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records deliveries; fails the first `fail_first` calls.
    #[derive(Default)]
    struct RecordingSender {
        fail_first: u32,
        reject: bool,
        calls: AtomicU32,
        delivered: Mutex<Vec<Notification>>,
    }

    impl RecordingSender {
        fn delivered(&self) -> Vec<Notification> {
            self.delivered.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MessageSender for RecordingSender {
        async fn send(&self, notification: &Notification) -> NotifyResult<()> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.reject {
                return Err(NotifyError::Rejected {
                    recipient: notification.recipient.clone(),
                    reason: "blocked".into(),
                });
            }
            if call < self.fail_first {
                return Err(NotifyError::SendFailed {
                    recipient: notification.recipient.clone(),
                    reason: "gateway busy".into(),
                });
            }
            self.delivered.lock().unwrap().push(notification.clone());
            Ok(())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn config(interval_ms: u64) -> NotifyConfig {
        let mut config = NotifyConfig::default();
        config.whatsapp.interval_ms = interval_ms;
        config
    }

    async fn settle(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispatches_in_order_and_normalises() {
        let sender = Arc::new(RecordingSender::default());
        let handle = NotificationService::spawn(&config(1000), sender.clone()).unwrap();

        for body in ["one", "two", "three"] {
            handle
                .enqueue(Notification::custom("98765 43210", body))
                .await
                .unwrap();
        }
        assert_eq!(handle.status().await.pending, 3);

        settle(5_000).await;

        let delivered = sender.delivered();
        let bodies: Vec<_> = delivered.iter().map(|n| n.body.as_str()).collect();
        assert_eq!(bodies, vec!["one", "two", "three"]);
        assert!(delivered.iter().all(|n| n.recipient == "919876543210"));

        let status = handle.status().await;
        assert_eq!(status.sent, 3);
        assert_eq!(status.pending, 0);
        assert!(status.running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sends_at_most_one_per_interval() {
        let sender = Arc::new(RecordingSender::default());
        let handle = NotificationService::spawn(&config(1000), sender.clone()).unwrap();

        for _ in 0..5 {
            handle
                .enqueue(Notification::custom("9876543210", "hi"))
                .await
                .unwrap();
        }

        settle(1_500).await;
        let status = handle.status().await;
        assert!(status.sent <= 2);
        assert!(status.pending >= 3);

        settle(5_000).await;
        assert_eq!(handle.status().await.sent, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failure_is_retried() {
        let sender = Arc::new(RecordingSender {
            fail_first: 1,
            ..Default::default()
        });
        let handle = NotificationService::spawn(&config(1000), sender.clone()).unwrap();

        handle
            .enqueue(Notification::custom("9876543210", "retry me"))
            .await
            .unwrap();
        settle(5_000).await;

        let delivered = sender.delivered();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].attempts, 2);

        let status = handle.status().await;
        assert_eq!(status.sent, 1);
        assert_eq!(status.failed, 0);
        assert!(status.last_error.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let sender = Arc::new(RecordingSender {
            fail_first: u32::MAX,
            ..Default::default()
        });
        let handle = NotificationService::spawn(&config(1000), sender.clone()).unwrap();

        handle
            .enqueue(Notification::custom("9876543210", "never"))
            .await
            .unwrap();
        settle(10_000).await;

        assert_eq!(sender.calls.load(Ordering::SeqCst), 3);
        let status = handle.status().await;
        assert_eq!(status.failed, 1);
        assert_eq!(status.pending, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejection_is_not_retried() {
        let sender = Arc::new(RecordingSender {
            reject: true,
            ..Default::default()
        });
        let handle = NotificationService::spawn(&config(1000), sender.clone()).unwrap();

        handle
            .enqueue(Notification::custom("9876543210", "blocked"))
            .await
            .unwrap();
        settle(5_000).await;

        assert_eq!(sender.calls.load(Ordering::SeqCst), 1);
        assert_eq!(handle.status().await.failed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduled_message_waits() {
        let sender = Arc::new(RecordingSender::default());
        let handle = NotificationService::spawn(&config(1000), sender.clone()).unwrap();

        let later = Notification::custom("9876543210", "later")
            .not_before(Utc::now() + chrono::Duration::hours(1));
        handle.enqueue(later).await.unwrap();
        handle
            .enqueue(Notification::custom("9876543210", "now"))
            .await
            .unwrap();

        settle(5_000).await;

        let bodies: Vec<_> = sender.delivered().into_iter().map(|n| n.body).collect();
        assert_eq!(bodies, vec!["now".to_string()]);
        assert_eq!(handle.status().await.pending, 1);
    }

    #[tokio::test]
    async fn test_rejects_bad_recipient_and_disabled() {
        let handle = NotificationService::spawn(&config(1000), Arc::new(RecordingSender::default()))
            .unwrap();
        assert!(matches!(
            handle.enqueue(Notification::custom("call me", "x")).await,
            Err(NotifyError::InvalidRecipient(_))
        ));
        assert_eq!(handle.status().await.pending, 0);

        let mut off = config(1000);
        off.whatsapp.enabled = false;
        let handle = NotificationService::spawn(&off, Arc::new(RecordingSender::default()))
            .unwrap();
        assert!(matches!(
            handle.enqueue(Notification::custom("9876543210", "x")).await,
            Err(NotifyError::Disabled)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_queue_is_reported() {
        let mut small = config(60_000);
        small.whatsapp.queue_capacity = 1;
        let handle = NotificationService::spawn(&small, Arc::new(RecordingSender::default()))
            .unwrap();

        // Worker has not run yet, so the channel holds exactly one message
        handle
            .enqueue(Notification::custom("9876543210", "a"))
            .await
            .unwrap();
        assert!(matches!(
            handle.enqueue(Notification::custom("9876543210", "b")).await,
            Err(NotifyError::QueueFull)
        ));
        assert_eq!(handle.status().await.pending, 1);
    }

    #[tokio::test]
    async fn test_spawn_rejects_invalid_config() {
        let sender = Arc::new(RecordingSender::default());

        for interval_ms in [0, 10] {
            let result = NotificationService::spawn(&config(interval_ms), sender.clone());
            assert!(matches!(result, Err(NotifyError::InvalidConfig(_))));
        }

        let mut no_queue = config(1000);
        no_queue.whatsapp.queue_capacity = 0;
        assert!(matches!(
            NotificationService::spawn(&no_queue, sender.clone()),
            Err(NotifyError::InvalidConfig(_))
        ));

        // Deserialized configs skip `load`, so spawn is the only check
        let parsed: NotifyConfig = toml::from_str("[whatsapp]\ninterval_ms = 0\n").unwrap();
        assert!(NotificationService::spawn(&parsed, sender.clone()).is_err());
        assert_eq!(sender.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_service() {
        let handle = NotificationService::spawn(&config(1000), Arc::new(RecordingSender::default()))
            .unwrap();

        handle.shutdown().await.unwrap();
        let status = handle.status().await;
        assert!(!status.running);

        assert!(matches!(
            handle.enqueue(Notification::custom("9876543210", "late")).await,
            Err(NotifyError::ShuttingDown)
        ));
        assert!(handle.shutdown().await.is_ok());
    }
}
