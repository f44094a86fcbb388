//! # Notification Messages
//!
//! Outgoing WhatsApp messages and recipient normalisation.
//!
//! ## Receipt Message
//! ```text
//! Hi Asha, thank you for your payment.
//! Receipt: R-1042
//! Amount: ₹1000.00
//! Tax Exclusive - Service (15%): ₹150.00
//! Total paid: ₹1150.00
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use gymdesk_core::{format_tax_breakdown, Money, TaxCalculationResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{NotifyError, NotifyResult};

/// Local subscriber numbers are 10 digits.
const LOCAL_NUMBER_LEN: usize = 10;

/// E.164 bounds, excluding the leading `+`.
const MIN_E164_LEN: usize = 8;
const MAX_E164_LEN: usize = 15;

// =============================================================================
// Notification Kind
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    FeeReminder,
    ReceiptIssued,
    Welcome,
    Custom,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationKind::FeeReminder => write!(f, "fee_reminder"),
            NotificationKind::ReceiptIssued => write!(f, "receipt_issued"),
            NotificationKind::Welcome => write!(f, "welcome"),
            NotificationKind::Custom => write!(f, "custom"),
        }
    }
}

// =============================================================================
// Notification
// =============================================================================

/// A message waiting for, or going through, delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,

    /// Phone number as typed; normalised when enqueued.
    pub recipient: String,

    pub body: String,

    pub kind: NotificationKind,

    pub created_at: DateTime<Utc>,

    /// Earliest time the message may go out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_before: Option<DateTime<Utc>>,

    /// Delivery attempts made so far.
    #[serde(default)]
    pub attempts: u32,
}

impl Notification {
    pub fn new(
        recipient: impl Into<String>,
        body: impl Into<String>,
        kind: NotificationKind,
    ) -> Self {
        Notification {
            id: Uuid::new_v4(),
            recipient: recipient.into(),
            body: body.into(),
            kind,
            created_at: Utc::now(),
            not_before: None,
            attempts: 0,
        }
    }

    /// Free-text message.
    pub fn custom(recipient: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(recipient, body, NotificationKind::Custom)
    }

    /// Welcome message for a new member.
    pub fn welcome(recipient: impl Into<String>, member_name: &str, gym_name: &str) -> Self {
        let body = format!(
            "Welcome to {}, {}! Your membership is now active.",
            gym_name, member_name
        );
        Self::new(recipient, body, NotificationKind::Welcome)
    }

    /// Reminder for an upcoming or overdue fee.
    pub fn fee_reminder(
        recipient: impl Into<String>,
        member_name: &str,
        amount_due: Money,
        due_date: NaiveDate,
    ) -> Self {
        let body = format!(
            "Hi {}, your membership fee of {} is due on {}.",
            member_name,
            amount_due,
            due_date.format("%d %b %Y")
        );
        Self::new(recipient, body, NotificationKind::FeeReminder)
    }

    /// Payment receipt with the tax breakdown of `result`.
    ///
    /// Amounts are rounded to paise the same way the stored receipt is.
    pub fn receipt(
        recipient: impl Into<String>,
        member_name: &str,
        receipt_no: &str,
        result: &TaxCalculationResult,
    ) -> Self {
        let totals = result.receipt_totals();

        let mut body = format!(
            "Hi {}, thank you for your payment.\nReceipt: {}\nAmount: {}",
            member_name, receipt_no, totals.base
        );
        if !result.tax_breakdown.is_empty() {
            body.push('\n');
            body.push_str(&format_tax_breakdown(&result.tax_breakdown));
        }
        body.push_str(&format!("\nTotal paid: {}", totals.total));

        Self::new(recipient, body, NotificationKind::ReceiptIssued)
    }

    /// Delays delivery until `at`.
    pub fn not_before(mut self, at: DateTime<Utc>) -> Self {
        self.not_before = Some(at);
        self
    }

    /// Returns true when the message may be sent at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.not_before.map_or(true, |at| at <= now)
    }
}

// =============================================================================
// Phone Normalisation
// =============================================================================

/// Normalises a phone number to international digits (no `+`).
///
/// ## Rules
/// - Spaces, dashes, dots and brackets are ignored
/// - `+` or `00` prefix: already international
/// - 10 digits: local number, `default_country_code` is prepended
/// - 11 digits starting with `0`: trunk prefix dropped, then as above
/// - Anything else must already be 8-15 digits
///
/// ## Example
/// ```rust
/// use gymdesk_notify::normalize_phone;
///
/// assert_eq!(normalize_phone("98765 43210", "91").unwrap(), "919876543210");
/// assert_eq!(normalize_phone("+44 20 7946 0958", "91").unwrap(), "442079460958");
/// ```
pub fn normalize_phone(raw: &str, default_country_code: &str) -> NotifyResult<String> {
    let trimmed = raw.trim();
    let invalid = || NotifyError::InvalidRecipient(raw.to_string());

    let mut digits = String::with_capacity(trimmed.len());
    for (i, c) in trimmed.chars().enumerate() {
        match c {
            '0'..='9' => digits.push(c),
            '+' if i == 0 => {}
            ' ' | '-' | '.' | '(' | ')' => {}
            _ => return Err(invalid()),
        }
    }

    let international = if trimmed.starts_with('+') {
        digits
    } else if let Some(rest) = digits.strip_prefix("00") {
        rest.to_string()
    } else if digits.len() == LOCAL_NUMBER_LEN {
        format!("{}{}", default_country_code, digits)
    } else if digits.len() == LOCAL_NUMBER_LEN + 1 && digits.starts_with('0') {
        format!("{}{}", default_country_code, &digits[1..])
    } else {
        digits
    };

    if !(MIN_E164_LEN..=MAX_E164_LEN).contains(&international.len())
        || international.starts_with('0')
    {
        return Err(invalid());
    }

    Ok(international)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gymdesk_core::{calculate_tax_amounts, TaxSelection, TaxSetting};

    #[test]
    fn test_normalize_local_numbers() {
        assert_eq!(normalize_phone("9876543210", "91").unwrap(), "919876543210");
        assert_eq!(normalize_phone("098765-43210", "91").unwrap(), "919876543210");
        assert_eq!(normalize_phone("(987) 654.3210", "1").unwrap(), "19876543210");
    }

    #[test]
    fn test_normalize_international_numbers() {
        assert_eq!(normalize_phone("+91 98765 43210", "44").unwrap(), "919876543210");
        assert_eq!(normalize_phone("0091 98765 43210", "44").unwrap(), "919876543210");
        assert_eq!(normalize_phone("919876543210", "44").unwrap(), "919876543210");
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(normalize_phone("", "91").is_err());
        assert!(normalize_phone("12345", "91").is_err());
        assert!(normalize_phone("98765x43210", "91").is_err());
        assert!(normalize_phone("91+9876543210", "91").is_err());
        assert!(normalize_phone("+1234567890123456", "91").is_err());
    }

    #[test]
    fn test_receipt_body_includes_breakdown() {
        let catalog = vec![TaxSetting::new("3", "Service", 15.0, false)];
        let result =
            calculate_tax_amounts(1000.0, &TaxSelection::new().with("3", true), &catalog);

        let n = Notification::receipt("9876543210", "Asha", "R-1042", &result);
        assert_eq!(n.kind, NotificationKind::ReceiptIssued);
        assert_eq!(
            n.body,
            "Hi Asha, thank you for your payment.\n\
             Receipt: R-1042\n\
             Amount: ₹1000.00\n\
             Tax Exclusive - Service (15%): ₹150.00\n\
             Total paid: ₹1150.00"
        );
    }

    #[test]
    fn test_receipt_without_taxes() {
        let result = calculate_tax_amounts(500.0, &TaxSelection::new(), &[]);
        let n = Notification::receipt("9876543210", "Ravi", "R-7", &result);
        assert!(n.body.ends_with("Amount: ₹500.00\nTotal paid: ₹500.00"));
    }

    #[test]
    fn test_fee_reminder_body() {
        let due = NaiveDate::from_ymd_opt(2024, 4, 5).unwrap();
        let n = Notification::fee_reminder("9876543210", "Asha", Money::from_paise(150_000), due);
        assert_eq!(
            n.body,
            "Hi Asha, your membership fee of ₹1500.00 is due on 05 Apr 2024."
        );
    }

    #[test]
    fn test_not_before() {
        let now = Utc::now();
        let n = Notification::custom("9876543210", "hello");
        assert!(n.is_due(now));

        let later = n.not_before(now + chrono::Duration::hours(1));
        assert!(!later.is_due(now));
        assert!(later.is_due(now + chrono::Duration::hours(2)));
    }

    #[test]
    fn test_serializes_kind_snake_case() {
        let n = Notification::welcome("9876543210", "Asha", "Iron Temple");
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["kind"], "welcome");
        assert!(json.get("notBefore").is_none());
        assert_eq!(json["attempts"], 0);
    }
}
