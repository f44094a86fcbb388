//! # Domain Types
//!
//! Catalog and selection types shared by the tax engine, the catalog store
//! and the receipt form.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   TaxSetting    │   │  TaxSelection   │   │    TaxKind      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  [(id, bool)]   │   │  Inclusive      │       │
//! │  │  name           │   │  ordered,       │   │  Exclusive      │       │
//! │  │  rate (%)       │   │  first-insert   │   └─────────────────┘       │
//! │  │  is_inclusive   │   │  position wins  │                             │
//! │  │  is_active      │   └─────────────────┘   ┌─────────────────┐       │
//! │  │  tax_type       │                         │  TaxTypeState   │       │
//! │  └─────────────────┘                         │  NotSet/Unknown │       │
//! │                                              │  Incl./Excl.    │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why an Ordered Selection?
//! The receipt form keeps a `{ id: bool }` dictionary and the engine reads
//! the governing tax kind from the *first* selected id. A hash map would make
//! that choice arbitrary, so the selection is a small ordered association.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Tax Kind
// =============================================================================

/// Whether a tax is folded into the quoted price or added on top of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum TaxKind {
    /// Tax is already contained in the quoted amount.
    Inclusive,
    /// Tax is added on top of the quoted amount.
    Exclusive,
}

impl TaxKind {
    /// Maps the catalog's `is_inclusive` flag to a kind.
    #[inline]
    pub const fn from_inclusive(is_inclusive: bool) -> Self {
        if is_inclusive {
            TaxKind::Inclusive
        } else {
            TaxKind::Exclusive
        }
    }

    /// Returns true for [`TaxKind::Inclusive`].
    #[inline]
    pub const fn is_inclusive(&self) -> bool {
        matches!(self, TaxKind::Inclusive)
    }

    /// Lowercase label used on the wire and in logs.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TaxKind::Inclusive => "inclusive",
            TaxKind::Exclusive => "exclusive",
        }
    }
}

impl fmt::Display for TaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Tax Setting
// =============================================================================

/// One entry of the tax catalog.
///
/// The catalog is owned by the caller (sourced from the tax-settings store)
/// and passed wholesale into every engine call. The engine never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct TaxSetting {
    /// Stable identifier.
    pub id: String,

    /// Display label, printed on receipts.
    pub name: String,

    /// Percentage rate (18.0 = 18%). Not clamped by the engine.
    pub rate: f64,

    /// `true` when the tax is embedded in the quoted base amount.
    pub is_inclusive: bool,

    /// Inactive entries are hidden from pickers but stay addressable by id.
    pub is_active: bool,

    /// Free-form category ("GST", "VAT", ...). Descriptive only.
    pub tax_type: String,
}

impl TaxSetting {
    /// Creates an active catalog entry.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        rate: f64,
        is_inclusive: bool,
    ) -> Self {
        let name = name.into();
        TaxSetting {
            id: id.into(),
            tax_type: name.clone(),
            name,
            rate,
            is_inclusive,
            is_active: true,
        }
    }

    /// Sets the descriptive category label.
    pub fn with_tax_type(mut self, tax_type: impl Into<String>) -> Self {
        self.tax_type = tax_type.into();
        self
    }

    /// Marks the entry inactive.
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Returns the kind implied by `is_inclusive`.
    #[inline]
    pub fn kind(&self) -> TaxKind {
        TaxKind::from_inclusive(self.is_inclusive)
    }
}

/// Looks up a catalog entry by id.
pub fn find_tax<'a>(taxes: &'a [TaxSetting], id: &str) -> Option<&'a TaxSetting> {
    taxes.iter().find(|t| t.id == id)
}

// =============================================================================
// Tax Type State
// =============================================================================

/// Tagged outcome of detecting the committed tax kind of a selection.
///
/// Separates "nothing selected" from "the first selected id is not in the
/// catalog", which the plain `Option<TaxKind>` view collapses into `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "state", content = "id", rename_all = "snake_case")]
pub enum TaxTypeState {
    /// No id is currently selected.
    NotSet,
    /// The first selected id does not resolve in the catalog.
    Unknown(String),
    /// The first selected tax is inclusive.
    Inclusive,
    /// The first selected tax is exclusive.
    Exclusive,
}

impl TaxTypeState {
    /// Returns the kind when one could be determined.
    pub fn kind(&self) -> Option<TaxKind> {
        match self {
            TaxTypeState::Inclusive => Some(TaxKind::Inclusive),
            TaxTypeState::Exclusive => Some(TaxKind::Exclusive),
            TaxTypeState::NotSet | TaxTypeState::Unknown(_) => None,
        }
    }
}

impl From<TaxKind> for TaxTypeState {
    fn from(kind: TaxKind) -> Self {
        match kind {
            TaxKind::Inclusive => TaxTypeState::Inclusive,
            TaxKind::Exclusive => TaxTypeState::Exclusive,
        }
    }
}

// =============================================================================
// Tax Selection
// =============================================================================

/// Ordered `tax id → chosen` association.
///
/// ## Ordering Rules
/// - Iteration follows first insertion.
/// - Re-setting an existing id updates its flag in place.
/// - Serialises as a JSON object, keys in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxSelection {
    entries: Vec<(String, bool)>,
}

impl TaxSelection {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the flag for `id`, appending it if unseen.
    pub fn set(&mut self, id: impl Into<String>, selected: bool) {
        let id = id.into();
        match self.entries.iter_mut().find(|(k, _)| *k == id) {
            Some(entry) => entry.1 = selected,
            None => self.entries.push((id, selected)),
        }
    }

    /// Builder-style [`TaxSelection::set`].
    pub fn with(mut self, id: impl Into<String>, selected: bool) -> Self {
        self.set(id, selected);
        self
    }

    /// Returns the flag for `id`, if present.
    pub fn get(&self, id: &str) -> Option<bool> {
        self.entries
            .iter()
            .find(|(k, _)| k == id)
            .map(|(_, v)| *v)
    }

    /// Returns true if `id` is present and mapped to `true`.
    pub fn is_selected(&self, id: &str) -> bool {
        self.get(id).unwrap_or(false)
    }

    /// Ids mapped to `true`, in selection order.
    pub fn selected_ids(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, selected)| *selected)
            .map(|(id, _)| id.as_str())
    }

    /// Returns true if at least one id is mapped to `true`.
    pub fn has_selection(&self) -> bool {
        self.entries.iter().any(|(_, selected)| *selected)
    }

    /// All `(id, flag)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(id, v)| (id.as_str(), *v))
    }

    /// Sets every flag back to `false`, keeping the ids.
    pub fn clear_selection(&mut self) {
        for entry in &mut self.entries {
            entry.1 = false;
        }
    }

    /// Number of ids tracked (selected or not).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no ids are tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for TaxSelection {
    fn from_iter<I: IntoIterator<Item = (K, bool)>>(iter: I) -> Self {
        let mut selection = TaxSelection::new();
        for (id, selected) in iter {
            selection.set(id, selected);
        }
        selection
    }
}

impl Serialize for TaxSelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, selected) in &self.entries {
            map.serialize_entry(id, selected)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TaxSelection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SelectionVisitor;

        impl<'de> Visitor<'de> for SelectionVisitor {
            type Value = TaxSelection;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of tax id to boolean")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut selection = TaxSelection::new();
                while let Some((id, selected)) = access.next_entry::<String, bool>()? {
                    selection.set(id, selected);
                }
                Ok(selection)
            }
        }

        deserializer.deserialize_map(SelectionVisitor)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
