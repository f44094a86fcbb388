//! # Tax Selection State
//!
//! The aggregate the receipt form holds while a user toggles taxes.
//!
//! ## Toggle Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_initial_tax_state(catalog)                                     │
//! │       │   every id → false, tax_type = None, filtered = active         │
//! │       ▼                                                                 │
//! │  User ticks "GST 18% (incl.)"                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  toggle("1") ─► validate_tax_selection ─► OK                           │
//! │       │         tax_type = Inclusive                                   │
//! │       │         filtered = active inclusive taxes only                 │
//! │       ▼                                                                 │
//! │  User ticks "Service 15% (excl.)"                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  toggle("3") ─► validate_tax_selection ─► rejected, state unchanged    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  User unticks "GST" ─► nothing selected ─► tax_type = None,            │
//! │                        filtered = all active again                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::tax::{
    calculate_tax_amounts, filter_taxes_by_type, get_current_tax_type, validate_tax_selection,
    TaxCalculationResult,
};
use crate::types::{TaxKind, TaxSelection, TaxSetting};

/// UI-facing tax selection aggregate.
///
/// `tax_type` and `filtered_taxes` are derived from `selected_taxes`; mutate
/// the state through [`TaxSelectionState::toggle`] and
/// [`TaxSelectionState::clear`] to keep them in step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxSelectionState {
    #[ts(as = "std::collections::HashMap<String, bool>")]
    pub selected_taxes: TaxSelection,
    pub tax_type: Option<TaxKind>,
    pub available_taxes: Vec<TaxSetting>,
    pub filtered_taxes: Vec<TaxSetting>,
}

/// Builds the starting state for a receipt form.
///
/// Every catalog id (active or not) is tracked as unselected; both
/// `available_taxes` and `filtered_taxes` hold the active entries.
pub fn create_initial_tax_state(taxes: &[TaxSetting]) -> TaxSelectionState {
    let selected_taxes = taxes.iter().map(|t| (t.id.clone(), false)).collect();
    let active = filter_taxes_by_type(taxes, None);

    TaxSelectionState {
        selected_taxes,
        tax_type: None,
        available_taxes: active.clone(),
        filtered_taxes: active,
    }
}

impl TaxSelectionState {
    /// Flips the selection of `tax_id`.
    ///
    /// Deselecting always succeeds. Selecting is gated by
    /// [`validate_tax_selection`]. Returns whether the state changed.
    pub fn toggle(&mut self, tax_id: &str, taxes: &[TaxSetting]) -> bool {
        if self.selected_taxes.is_selected(tax_id) {
            self.selected_taxes.set(tax_id, false);
        } else {
            if !validate_tax_selection(&self.selected_taxes, tax_id, taxes) {
                return false;
            }
            self.selected_taxes.set(tax_id, true);
        }

        self.refresh(taxes);
        true
    }

    /// Unselects everything and lifts the kind filter.
    pub fn clear(&mut self) {
        self.selected_taxes.clear_selection();
        self.tax_type = None;
        self.filtered_taxes = self.available_taxes.clone();
    }

    /// Runs [`calculate_tax_amounts`] for the current selection.
    pub fn calculate(&self, base_amount: f64, taxes: &[TaxSetting]) -> TaxCalculationResult {
        calculate_tax_amounts(base_amount, &self.selected_taxes, taxes)
    }

    /// Re-derives `tax_type` and `filtered_taxes` from the selection.
    fn refresh(&mut self, taxes: &[TaxSetting]) {
        self.tax_type = get_current_tax_type(&self.selected_taxes, taxes);
        self.filtered_taxes = filter_taxes_by_type(taxes, self.tax_type);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
