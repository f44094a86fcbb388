//! # Error Types
//!
//! Domain-specific error types for gymdesk-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  gymdesk-core errors (this file)                                       │
//! │  ├── CoreError        - Tax engine rule violations                     │
//! │  └── ValidationError  - Catalog entry validation failures              │
//! │                                                                         │
//! │  gymdesk-db errors      └── DbError      - Catalog store failures      │
//! │  gymdesk-notify errors  └── NotifyError  - Message queue failures      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine's selection and result predicates return `bool`; these errors
//! are only produced by the strict and sanitising entry points.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Tax engine errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A selected tax id does not exist in the catalog.
    #[error("Tax not found: {0}")]
    TaxNotFound(String),

    /// The selection combines inclusive and exclusive taxes.
    ///
    /// ## When This Occurs
    /// - The receipt form skipped `validate_tax_selection`
    /// - A catalog entry changed kind between selection and checkout
    #[error("Cannot mix inclusive and exclusive taxes: {first_id} conflicts with {conflicting_id}")]
    MixedTaxSelection {
        first_id: String,
        conflicting_id: String,
    },

    /// A computed result failed the consistency check.
    #[error("Inconsistent tax calculation: {reason}")]
    InconsistentCalculation { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors for catalog entries.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },

    /// Value is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
