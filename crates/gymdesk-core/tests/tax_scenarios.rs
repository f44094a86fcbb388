//! Receipt tax scenarios against the standard five-entry catalog.
//!
//! Run with: `cargo test -p gymdesk-core --test tax_scenarios`

use gymdesk_core::*;

/// GST/VAT inclusive, Service/Luxury exclusive, one inactive inclusive entry.
fn catalog() -> Vec<TaxSetting> {
    vec![
        TaxSetting::new("1", "GST", 18.0, true).with_tax_type("GST"),
        TaxSetting::new("2", "VAT", 12.0, true).with_tax_type("VAT"),
        TaxSetting::new("3", "Service", 15.0, false).with_tax_type("Service"),
        TaxSetting::new("4", "Luxury", 10.0, false).with_tax_type("Luxury"),
        TaxSetting::new("5", "Inactive", 5.0, true).inactive(),
    ]
}

fn select(ids: &[&str]) -> TaxSelection {
    ids.iter().map(|id| (*id, true)).collect()
}

#[test]
fn filter_without_type_hides_inactive() {
    let filtered = filter_taxes_by_type(&catalog(), None);
    assert_eq!(filtered.len(), 4);
    assert!(filtered.iter().all(|t| t.id != "5"));
}

#[test]
fn inclusive_gst_on_1000() {
    let result = calculate_tax_amounts(1000.0, &select(&["1"]), &catalog());
    assert!((result.tax_amount - 152.54).abs() < 0.01);
    assert_eq!(result.total_amount, 1000.0);
    assert!(validate_tax_calculation(&result));
}

#[test]
fn exclusive_service_on_1000() {
    let result = calculate_tax_amounts(1000.0, &select(&["3"]), &catalog());
    assert_eq!(result.tax_amount, 150.0);
    assert_eq!(result.total_amount, 1150.0);
}

#[test]
fn two_exclusive_taxes_on_1000() {
    let result = calculate_tax_amounts(1000.0, &select(&["3", "4"]), &catalog());
    assert_eq!(result.tax_amount, 250.0);
    assert_eq!(result.total_amount, 1250.0);
    assert_eq!(
        format_tax_breakdown(&result.tax_breakdown),
        "Tax Exclusive - Service (15%): ₹150.00, Luxury (10%): ₹100.00"
    );
}

#[test]
fn inclusive_then_exclusive_is_rejected() {
    assert!(!validate_tax_selection(&select(&["1"]), "3", &catalog()));
}

#[test]
fn empty_breakdown_formats_as_no_taxes() {
    assert_eq!(format_tax_breakdown(&[]), "No taxes applied");
}

#[test]
fn receipt_form_walkthrough() {
    let taxes = catalog();
    let mut state = create_initial_tax_state(&taxes);

    assert!(state.toggle("2", &taxes));
    assert!(state.toggle("1", &taxes));
    assert!(!state.toggle("4", &taxes));
    assert_eq!(state.tax_type, Some(TaxKind::Inclusive));

    let result = state.calculate(2360.0, &taxes);
    assert_eq!(result.total_amount, 2360.0);
    assert!(result.ensure_consistent().is_ok());

    // Selection order is the order the user ticked, seeded by catalog order
    let ids: Vec<_> = result.tax_breakdown.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);

    let totals = result.receipt_totals();
    assert_eq!(totals.total, Money::from_paise(236_000));
    assert_eq!(totals.tax, Money::from_amount(result.tax_amount));
}

#[test]
fn stale_catalog_entry_is_skipped() {
    // Tax 2 was deleted from the store after the user picked it
    let taxes: Vec<_> = catalog().into_iter().filter(|t| t.id != "2").collect();
    let result = calculate_tax_amounts(1000.0, &select(&["2", "1"]), &taxes);

    assert_eq!(result.tax_breakdown.len(), 1);
    assert_eq!(result.tax_breakdown[0].id, "1");
    assert_eq!(get_current_tax_type(&select(&["2", "1"]), &taxes), None);
    assert_eq!(
        resolve_tax_type(&select(&["2", "1"]), &taxes),
        TaxTypeState::Unknown("2".into())
    );
}
