//! # gymdesk-core: Pure Business Logic for GymDesk
//!
//! The tax engine used by receipt and invoice forms, plus the small amount of
//! money handling and catalog validation around it. No I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        GymDesk Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (receipt form)                      │   │
//! │  │   Pick taxes ──► Enter amount ──► Preview breakdown ──► Save    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ IPC                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ gymdesk-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │    tax    │  │   state   │  │   money   │  │   │
//! │  │   │TaxSetting │  │  filter   │  │ toggle    │  │  paise    │  │   │
//! │  │   │Selection  │  │  calc     │  │ clear     │  │ rounding  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌──────────────────────┐  ┌───▼──────────────────────────────────┐    │
//! │  │ gymdesk-notify       │  │ gymdesk-db (tax catalog store)       │    │
//! │  └──────────────────────┘  └──────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Catalog entry, tax kind, ordered selection map
//! - [`tax`] - Filter, selection validator, calculator, formatter, result validator
//! - [`state`] - Receipt form selection state
//! - [`money`] - Paise-based money for rounded receipt totals
//! - [`validation`] - Catalog entry sanitisation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use gymdesk_core::{calculate_tax_amounts, format_tax_breakdown, TaxSelection, TaxSetting};
//!
//! let catalog = vec![
//!     TaxSetting::new("1", "GST", 18.0, true),
//!     TaxSetting::new("3", "Service", 15.0, false),
//! ];
//!
//! let selection = TaxSelection::new().with("1", true);
//! let result = calculate_tax_amounts(1000.0, &selection, &catalog);
//!
//! assert_eq!(result.total_amount, 1000.0);
//! assert_eq!(
//!     format_tax_breakdown(&result.tax_breakdown),
//!     "Tax Inclusive - GST (18%): ₹152.54"
//! );
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod state;
pub mod tax;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, ReceiptTaxTotals};
pub use state::{create_initial_tax_state, TaxSelectionState};
pub use tax::{
    calculate_tax_amounts, calculate_tax_amounts_strict, filter_taxes_by_type,
    format_tax_breakdown, get_current_tax_type, resolve_tax_type, validate_tax_calculation,
    validate_tax_selection, TaxBreakdownItem, TaxCalculationResult,
};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Allowed gap between `tax_amount` and the summed breakdown.
pub const BREAKDOWN_TOLERANCE: f64 = 0.01;

/// Formatter output for an empty breakdown.
pub const NO_TAXES_APPLIED: &str = "No taxes applied";

/// Highest percentage the catalog store accepts.
pub const MAX_TAX_RATE: f64 = 100.0;

/// Longest tax display name the catalog store accepts.
pub const MAX_TAX_NAME_LEN: usize = 100;
