//! # gymdesk-notify: WhatsApp Notification Queue for GymDesk
//!
//! Fee reminders, receipts and welcome messages go out through one paced
//! queue so the gateway is never flooded and the UI never waits on it.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   gymdesk-notify (THIS CRATE)                           │
//! │                                                                         │
//! │  ┌─────────────┐   ┌─────────────────────┐   ┌─────────────────────┐   │
//! │  │ NotifyConfig│   │ NotificationService │   │  MessageSender      │   │
//! │  │ (config.rs) │──►│   (service.rs)      │──►│   (sender.rs)       │   │
//! │  │ TOML + env  │   │  mpsc + select!     │   │  LogSender, gateway │   │
//! │  └─────────────┘   └──────────▲──────────┘   └─────────────────────┘   │
//! │                               │ enqueue / status / shutdown             │
//! │                     ┌─────────┴──────────┐                              │
//! │                     │ NotificationHandle │  Clone + Send + Sync         │
//! │                     └────────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use gymdesk_notify::{LogSender, Notification, NotificationService, NotifyConfig};
//!
//! let config = NotifyConfig::load_or_default(None);
//! let handle = NotificationService::spawn(&config, Arc::new(LogSender))?;
//!
//! handle
//!     .enqueue(Notification::receipt("98765 43210", "Asha", "R-1042", &result))
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod message;
pub mod sender;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{NotifyConfig, WhatsAppSettings};
pub use error::{NotifyError, NotifyResult};
pub use message::{normalize_phone, Notification, NotificationKind};
pub use sender::{LogSender, MessageSender};
pub use service::{NotificationHandle, NotificationService, NotificationStatus};
