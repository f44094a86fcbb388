//! # Tax Engine
//!
//! Tax selection rules and inclusive/exclusive amount math for receipts.
//!
//! ## Call Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Receipt Form Tax Flow                            │
//! │                                                                         │
//! │  Catalog (from store)                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  filter_taxes_by_type ──► choices offered to the user                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_tax_selection ──► gate each toggle (no mixing kinds)          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  calculate_tax_amounts ──► TaxCalculationResult                        │
//! │       │                                                                 │
//! │       ├──► format_tax_breakdown ──► receipt text                        │
//! │       └──► validate_tax_calculation ──► consistency gate                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Formulas
//! ```text
//! Inclusive:  amount = base × rate / (100 + rate)    total = base
//! Exclusive:  amount = base × rate / 100             total = base + Σ amount
//! ```
//!
//! All math is `f64` and unrounded. Rounding to currency happens only in
//! [`format_tax_breakdown`] (display) and
//! [`TaxCalculationResult::receipt_totals`] (persistence).
//!
//! Nothing here rejects negative rates or amounts: the catalog store
//! sanitises entries before they reach the engine.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, ReceiptTaxTotals};
use crate::types::{find_tax, TaxKind, TaxSelection, TaxSetting, TaxTypeState};
use crate::{BREAKDOWN_TOLERANCE, NO_TAXES_APPLIED};

// =============================================================================
// Result Types
// =============================================================================

/// One line of a computed tax result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxBreakdownItem {
    pub id: String,
    pub name: String,
    /// Percentage rate copied from the catalog entry.
    pub rate: f64,
    /// Computed tax in currency units.
    pub amount: f64,
    /// Formula that produced `amount`.
    #[serde(rename = "type")]
    pub kind: TaxKind,
}

/// Output of [`calculate_tax_amounts`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxCalculationResult {
    pub base_amount: f64,
    /// Sum of the breakdown amounts.
    pub tax_amount: f64,
    pub total_amount: f64,
    /// One item per resolved selected tax, in selection order.
    pub tax_breakdown: Vec<TaxBreakdownItem>,
}

impl TaxCalculationResult {
    /// A result with no taxes applied.
    pub fn untaxed(base_amount: f64) -> Self {
        TaxCalculationResult {
            base_amount,
            tax_amount: 0.0,
            total_amount: base_amount,
            tax_breakdown: Vec::new(),
        }
    }

    /// Kind of the first breakdown line, if any.
    pub fn kind(&self) -> Option<TaxKind> {
        self.tax_breakdown.first().map(|item| item.kind)
    }

    /// Checks [`validate_tax_calculation`] plus the total relationship of the
    /// result's kind (inclusive: total = base, exclusive: total = base + tax).
    ///
    /// Use before persisting or sending a total anywhere.
    pub fn ensure_consistent(&self) -> CoreResult<()> {
        if !validate_tax_calculation(self) {
            return Err(CoreError::InconsistentCalculation {
                reason: "negative figures or breakdown does not sum to tax amount".into(),
            });
        }

        let expected_total = match self.kind() {
            None => self.base_amount,
            Some(TaxKind::Inclusive) => self.base_amount,
            Some(TaxKind::Exclusive) => self.base_amount + self.tax_amount,
        };
        if (self.total_amount - expected_total).abs() > BREAKDOWN_TOLERANCE {
            return Err(CoreError::InconsistentCalculation {
                reason: format!(
                    "total {:.2} does not match expected {:.2}",
                    self.total_amount, expected_total
                ),
            });
        }

        Ok(())
    }

    /// Rounds base, tax and total to whole paise for storage on a receipt.
    ///
    /// Each figure is rounded independently, so for inclusive results
    /// `total == base` still holds after rounding.
    pub fn receipt_totals(&self) -> ReceiptTaxTotals {
        ReceiptTaxTotals {
            base: Money::from_amount(self.base_amount),
            tax: Money::from_amount(self.tax_amount),
            total: Money::from_amount(self.total_amount),
            kind: self.kind(),
        }
    }
}

// =============================================================================
// Catalog Filter
// =============================================================================

/// Returns the active taxes a user may pick next.
///
/// With no committed kind every active entry is offered; otherwise only
/// active entries of that kind. Input order is preserved.
pub fn filter_taxes_by_type(
    taxes: &[TaxSetting],
    selected_type: Option<TaxKind>,
) -> Vec<TaxSetting> {
    taxes
        .iter()
        .filter(|t| t.is_active)
        .filter(|t| selected_type.map_or(true, |kind| t.kind() == kind))
        .cloned()
        .collect()
}

// =============================================================================
// Selection Validator
// =============================================================================

/// Decides whether `new_tax_id` may be added to `current` without mixing
/// inclusive and exclusive taxes.
///
/// ## Rules
/// 1. Unknown candidate id → `false`.
/// 2. Nothing selected yet → `true` (activity is the filter's concern).
/// 3. Otherwise the candidate must share `is_inclusive` with every selected
///    id that resolves in the catalog. Selected ids missing from the catalog
///    do not block the candidate.
///
/// The caller applies the change when this returns `true`.
pub fn validate_tax_selection(
    current: &TaxSelection,
    new_tax_id: &str,
    taxes: &[TaxSetting],
) -> bool {
    let Some(candidate) = find_tax(taxes, new_tax_id) else {
        return false;
    };

    current
        .selected_ids()
        .filter_map(|id| find_tax(taxes, id))
        .all(|existing| existing.is_inclusive == candidate.is_inclusive)
}

// =============================================================================
// Type Detector
// =============================================================================

/// Detects the committed kind from the first selected id.
pub fn resolve_tax_type(selected: &TaxSelection, taxes: &[TaxSetting]) -> TaxTypeState {
    match selected.selected_ids().next() {
        None => TaxTypeState::NotSet,
        Some(first) => match find_tax(taxes, first) {
            Some(tax) => tax.kind().into(),
            None => TaxTypeState::Unknown(first.to_string()),
        },
    }
}

/// Returns the committed kind, or `None` when nothing is selected or the
/// first selected id is not in the catalog.
pub fn get_current_tax_type(selected: &TaxSelection, taxes: &[TaxSetting]) -> Option<TaxKind> {
    resolve_tax_type(selected, taxes).kind()
}

// =============================================================================
// Amount Calculator
// =============================================================================

/// Computes per-tax amounts, total tax and final total.
///
/// The governing formula comes from the first selected entry and is applied
/// to every selected entry, whatever their own `is_inclusive` flags say.
/// Selections are expected to be homogeneous already (see
/// [`validate_tax_selection`]); use [`calculate_tax_amounts_strict`] when
/// that is not guaranteed.
///
/// ## Example
/// ```rust
/// use gymdesk_core::tax::calculate_tax_amounts;
/// use gymdesk_core::types::{TaxSelection, TaxSetting};
///
/// let catalog = vec![TaxSetting::new("3", "Service", 15.0, false)];
/// let selection = TaxSelection::new().with("3", true);
///
/// let result = calculate_tax_amounts(1000.0, &selection, &catalog);
/// assert_eq!(result.tax_amount, 150.0);
/// assert_eq!(result.total_amount, 1150.0);
/// ```
pub fn calculate_tax_amounts(
    base_amount: f64,
    selected: &TaxSelection,
    taxes: &[TaxSetting],
) -> TaxCalculationResult {
    let resolved = resolve_selected(selected, taxes);

    let Some(first) = resolved.first() else {
        return TaxCalculationResult::untaxed(base_amount);
    };

    // An unknown leading id leaves the detector unresolved; the first entry
    // that did resolve decides the formula instead.
    let kind = get_current_tax_type(selected, taxes).unwrap_or_else(|| first.kind());

    compute(base_amount, &resolved, kind)
}

/// Like [`calculate_tax_amounts`] but refuses selections that mix kinds.
///
/// ## Errors
/// - [`CoreError::TaxNotFound`] if a selected id is missing from the catalog
/// - [`CoreError::MixedTaxSelection`] if selected entries differ in kind
pub fn calculate_tax_amounts_strict(
    base_amount: f64,
    selected: &TaxSelection,
    taxes: &[TaxSetting],
) -> CoreResult<TaxCalculationResult> {
    let mut resolved = Vec::new();
    for id in selected.selected_ids() {
        let tax = find_tax(taxes, id).ok_or_else(|| CoreError::TaxNotFound(id.to_string()))?;
        resolved.push(tax);
    }

    let Some(first) = resolved.first() else {
        return Ok(TaxCalculationResult::untaxed(base_amount));
    };

    let kind = first.kind();
    if let Some(conflict) = resolved.iter().find(|t| t.kind() != kind) {
        return Err(CoreError::MixedTaxSelection {
            first_id: first.id.clone(),
            conflicting_id: conflict.id.clone(),
        });
    }

    Ok(compute(base_amount, &resolved, kind))
}

/// Resolves selected ids to catalog entries, keeping selection order.
fn resolve_selected<'a>(selected: &TaxSelection, taxes: &'a [TaxSetting]) -> Vec<&'a TaxSetting> {
    selected
        .selected_ids()
        .filter_map(|id| find_tax(taxes, id))
        .collect()
}

fn compute(base_amount: f64, resolved: &[&TaxSetting], kind: TaxKind) -> TaxCalculationResult {
    let tax_breakdown: Vec<TaxBreakdownItem> = resolved
        .iter()
        .map(|tax| TaxBreakdownItem {
            id: tax.id.clone(),
            name: tax.name.clone(),
            rate: tax.rate,
            amount: tax_amount_for(base_amount, tax.rate, kind),
            kind,
        })
        .collect();

    let tax_amount: f64 = tax_breakdown.iter().map(|item| item.amount).sum();

    let total_amount = match kind {
        TaxKind::Inclusive => base_amount,
        TaxKind::Exclusive => base_amount + tax_amount,
    };

    TaxCalculationResult {
        base_amount,
        tax_amount,
        total_amount,
        tax_breakdown,
    }
}

/// Tax on `base_amount` at `rate` percent under the given formula.
#[inline]
pub fn tax_amount_for(base_amount: f64, rate: f64, kind: TaxKind) -> f64 {
    match kind {
        TaxKind::Inclusive => base_amount * rate / (100.0 + rate),
        TaxKind::Exclusive => base_amount * rate / 100.0,
    }
}

// =============================================================================
// Formatter
// =============================================================================

/// Renders a breakdown for printing on a receipt.
///
/// ## Example
/// ```rust
/// use gymdesk_core::tax::{format_tax_breakdown, TaxBreakdownItem};
/// use gymdesk_core::types::TaxKind;
///
/// assert_eq!(format_tax_breakdown(&[]), "No taxes applied");
///
/// let items = vec![TaxBreakdownItem {
///     id: "3".into(),
///     name: "Service".into(),
///     rate: 15.0,
///     amount: 150.0,
///     kind: TaxKind::Exclusive,
/// }];
/// assert_eq!(
///     format_tax_breakdown(&items),
///     "Tax Exclusive - Service (15%): ₹150.00"
/// );
/// ```
pub fn format_tax_breakdown(breakdown: &[TaxBreakdownItem]) -> String {
    let Some(first) = breakdown.first() else {
        return NO_TAXES_APPLIED.to_string();
    };

    let header = match first.kind {
        TaxKind::Inclusive => "Tax Inclusive - ",
        TaxKind::Exclusive => "Tax Exclusive - ",
    };

    let body = breakdown
        .iter()
        .map(|item| format!("{} ({}%): ₹{:.2}", item.name, item.rate, item.amount))
        .collect::<Vec<_>>()
        .join(", ");

    format!("{header}{body}")
}

// =============================================================================
// Result Validator
// =============================================================================

/// Sanity-checks a computed result.
///
/// Rejects negative figures and breakdowns that do not sum to `tax_amount`
/// by more than [`BREAKDOWN_TOLERANCE`]. Anything else is accepted, including
/// NaN figures, which compare false against both limits. The
/// inclusive/exclusive total relationship is not checked here.
pub fn validate_tax_calculation(result: &TaxCalculationResult) -> bool {
    if result.base_amount < 0.0 || result.tax_amount < 0.0 || result.total_amount < 0.0 {
        return false;
    }

    let breakdown_sum: f64 = result.tax_breakdown.iter().map(|item| item.amount).sum();

    let drift = (breakdown_sum - result.tax_amount).abs();
    drift <= BREAKDOWN_TOLERANCE || drift.is_nan()
}

// =============================================================================
// Unit Tests
// =============================================================================
