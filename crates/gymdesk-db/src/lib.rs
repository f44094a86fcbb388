//! # gymdesk-db: Tax Catalog Store for GymDesk
//!
//! SQLite storage for the tax catalog that receipt forms price against.
//! Uses sqlx for async access and embeds its migrations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        GymDesk Data Flow                                │
//! │                                                                         │
//! │  Tax settings screen / receipt form                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   gymdesk-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌─────────────────┐   ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories   │   │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│ TaxSettingRepo  │   │  (embedded)  │  │   │
//! │  │   └───────────────┘    └────────┬────────┘   └──────────────┘  │   │
//! │  │                                 │ quote()                       │   │
//! │  └─────────────────────────────────┼───────────────────────────────┘   │
//! │                                    ▼                                    │
//! │                       gymdesk-core tax engine                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Tax catalog repository
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gymdesk_db::{Database, DbConfig};
//! use gymdesk_core::TaxSelection;
//!
//! let db = Database::new(DbConfig::new("gymdesk.db")).await?;
//! let gst = db.tax_settings().create("GST", 18.0, true).await?;
//! let quote = db
//!     .tax_settings()
//!     .quote(1000.0, &TaxSelection::new().with(&gst.id, true))
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::tax_setting::TaxSettingRepository;
