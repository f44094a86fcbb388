//! # Notification Error Types
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │     Queue       │  │       Delivery          │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  QueueFull      │  │  InvalidRecipient       │ │
//! │  │  ConfigLoad     │  │  ShuttingDown   │  │  SendFailed (retryable) │ │
//! │  │  ConfigSave     │  │  Disabled       │  │  Rejected               │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for notification operations.
pub type NotifyResult<T> = Result<T, NotifyError>;

/// Errors raised while configuring, queueing or delivering notifications.
#[derive(Debug, Error)]
pub enum NotifyError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid notification configuration.
    #[error("Invalid notification configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Queue Errors
    // =========================================================================
    /// WhatsApp messaging is switched off in config.
    #[error("WhatsApp notifications are disabled")]
    Disabled,

    /// The queue is at capacity.
    #[error("Notification queue is full")]
    QueueFull,

    /// The service task has stopped.
    #[error("Notification service is shutting down")]
    ShuttingDown,

    /// Channel send/receive failed.
    #[error("Channel error: {0}")]
    ChannelError(String),

    // =========================================================================
    // Delivery Errors
    // =========================================================================
    /// Phone number could not be normalised.
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    /// Transient delivery failure (network, gateway busy).
    #[error("Failed to send to {recipient}: {reason}")]
    SendFailed { recipient: String, reason: String },

    /// Permanent delivery failure (blocked number, not on WhatsApp).
    #[error("Message to {recipient} rejected: {reason}")]
    Rejected { recipient: String, reason: String },
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<std::io::Error> for NotifyError {
    fn from(err: std::io::Error) -> Self {
        NotifyError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for NotifyError {
    fn from(err: toml::de::Error) -> Self {
        NotifyError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for NotifyError {
    fn from(err: toml::ser::Error) -> Self {
        NotifyError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization (for retry logic)
// =============================================================================

impl NotifyError {
    /// Returns true if delivery may succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, NotifyError::SendFailed { .. })
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            NotifyError::InvalidConfig(_)
                | NotifyError::ConfigLoadFailed(_)
                | NotifyError::ConfigSaveFailed(_)
        )
    }
}
