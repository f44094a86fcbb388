//! # Validation Module
//!
//! Sanitisation of tax catalog entries before they are stored.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Tax settings form (TypeScript)                               │
//! │  └── Empty fields, immediate feedback                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Catalog store (gymdesk-db)                                   │
//! │  └── THIS MODULE: validate_tax_setting on insert/update                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Tax engine                                                   │
//! │  └── Trusts the catalog, computes whatever it is given                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use gymdesk_core::types::TaxSetting;
//! use gymdesk_core::validation::validate_tax_setting;
//!
//! assert!(validate_tax_setting(&TaxSetting::new("gst", "GST", 18.0, true)).is_ok());
//! assert!(validate_tax_setting(&TaxSetting::new("gst", "GST", -5.0, true)).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::TaxSetting;
use crate::{MAX_TAX_NAME_LEN, MAX_TAX_RATE};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a tax id.
pub fn validate_tax_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    Ok(())
}

/// Validates a tax display name.
///
/// ## Rules
/// - Must not be blank
/// - At most [`MAX_TAX_NAME_LEN`] characters
pub fn validate_tax_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_TAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_TAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a percentage rate.
///
/// ## Rules
/// - Finite
/// - Between 0 and [`MAX_TAX_RATE`] inclusive
pub fn validate_tax_rate(rate: f64) -> ValidationResult<()> {
    if !rate.is_finite() {
        return Err(ValidationError::NotFinite {
            field: "rate".to_string(),
        });
    }

    if !(0.0..=MAX_TAX_RATE).contains(&rate) {
        return Err(ValidationError::OutOfRange {
            field: "rate".to_string(),
            min: 0.0,
            max: MAX_TAX_RATE,
        });
    }

    Ok(())
}

/// Validates a full catalog entry.
pub fn validate_tax_setting(tax: &TaxSetting) -> ValidationResult<()> {
    validate_tax_id(&tax.id)?;
    validate_tax_name(&tax.name)?;
    validate_tax_rate(tax.rate)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_tax_rate() {
        assert!(validate_tax_rate(0.0).is_ok());
        assert!(validate_tax_rate(18.0).is_ok());
        assert!(validate_tax_rate(100.0).is_ok());

        assert!(validate_tax_rate(-0.5).is_err());
        assert!(validate_tax_rate(100.01).is_err());
        assert!(matches!(
            validate_tax_rate(f64::NAN),
            Err(ValidationError::NotFinite { .. })
        ));
    }

    #[test]
    fn test_validate_tax_name() {
        assert!(validate_tax_name("CGST + SGST").is_ok());
        assert!(validate_tax_name("   ").is_err());
        assert!(validate_tax_name(&"G".repeat(MAX_TAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_tax_setting() {
        assert!(validate_tax_setting(&TaxSetting::new("1", "GST", 18.0, true)).is_ok());
        assert!(matches!(
            validate_tax_setting(&TaxSetting::new(" ", "GST", 18.0, true)),
            Err(ValidationError::Required { ref field }) if field == "id"
        ));
    }
}
