//! # Tax Setting Repository
//!
//! Storage for the tax catalog that receipt forms select from.
//!
//! ## Key Operations
//! - Catalog listing in a stable order (drives selection order on screen)
//! - CRUD with sanitisation on every write
//! - `quote`: fetch the current catalog and price a selection against it
//!
//! ## Catalog Freshness
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Settings screen                      Receipt form                      │
//! │       │                                    │                            │
//! │  update("gst", rate 18 → 12)               │ selection {gst: true}      │
//! │       │                                    │                            │
//! │       ▼                                    ▼                            │
//! │  tax_settings table ◄──────────── quote(base, selection)               │
//! │                                   re-reads catalog, then computes       │
//! │                                                                         │
//! │  The engine never caches rates; a stale preview is fixed by quoting.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use gymdesk_core::validation::validate_tax_setting;
use gymdesk_core::{calculate_tax_amounts, TaxCalculationResult, TaxSelection, TaxSetting};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};

const COLUMNS: &str = "id, name, rate, is_inclusive, is_active, tax_type";

/// Repository for tax catalog operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.tax_settings();
///
/// let gst = repo.create("GST", 18.0, true).await?;
/// let catalog = repo.list_all().await?;
/// let preview = repo.quote(1000.0, &TaxSelection::new().with(&gst.id, true)).await?;
/// ```
#[derive(Debug, Clone)]
pub struct TaxSettingRepository {
    pool: SqlitePool,
}

impl TaxSettingRepository {
    /// Creates a new TaxSettingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TaxSettingRepository { pool }
    }

    /// Lists every entry, active or not, in catalog order.
    ///
    /// Catalog order is creation time, then insertion order. The receipt form
    /// seeds its selection map from this list, so the order must be stable.
    pub async fn list_all(&self) -> DbResult<Vec<TaxSetting>> {
        let sql = format!("SELECT {COLUMNS} FROM tax_settings ORDER BY created_at, rowid");
        let taxes = sqlx::query_as::<_, TaxSetting>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = taxes.len(), "Listed tax catalog");
        Ok(taxes)
    }

    /// Lists active entries in catalog order.
    pub async fn list_active(&self) -> DbResult<Vec<TaxSetting>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM tax_settings WHERE is_active = 1 ORDER BY created_at, rowid"
        );
        let taxes = sqlx::query_as::<_, TaxSetting>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(taxes)
    }

    /// Gets an entry by id.
    ///
    /// ## Returns
    /// * `Ok(Some(TaxSetting))` - Entry found
    /// * `Ok(None)` - No entry with that id
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<TaxSetting>> {
        let sql = format!("SELECT {COLUMNS} FROM tax_settings WHERE id = ?1");
        let tax = sqlx::query_as::<_, TaxSetting>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(tax)
    }

    /// Creates an active entry with a generated id.
    pub async fn create(&self, name: &str, rate: f64, is_inclusive: bool) -> DbResult<TaxSetting> {
        let tax = TaxSetting::new(Uuid::new_v4().to_string(), name, rate, is_inclusive);
        self.insert(&tax).await
    }

    /// Inserts an entry.
    ///
    /// ## Returns
    /// * `Ok(TaxSetting)` - The entry as stored (trimmed, `tax_type` filled in)
    /// * `Err(DbError::Validation)` - Blank id/name, or rate outside 0-100
    /// * `Err(DbError::UniqueViolation)` - Id or name already exists
    pub async fn insert(&self, tax: &TaxSetting) -> DbResult<TaxSetting> {
        let tax = sanitize(tax)?;
        let now = timestamp();

        debug!(id = %tax.id, name = %tax.name, "Inserting tax setting");

        sqlx::query(
            r#"
            INSERT INTO tax_settings (
                id, name, rate, is_inclusive, is_active, tax_type, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            "#,
        )
        .bind(&tax.id)
        .bind(&tax.name)
        .bind(tax.rate)
        .bind(tax.is_inclusive)
        .bind(tax.is_active)
        .bind(&tax.tax_type)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| with_duplicate_value(e.into(), &tax))?;

        info!(id = %tax.id, rate = tax.rate, kind = %tax.kind(), "Tax setting created");
        Ok(tax)
    }

    /// Updates name, rate, kind, active flag and type label of an entry.
    ///
    /// ## Returns
    /// * `Ok(TaxSetting)` - The entry as stored
    /// * `Err(DbError::NotFound)` - No entry with that id
    pub async fn update(&self, tax: &TaxSetting) -> DbResult<TaxSetting> {
        let tax = sanitize(tax)?;

        debug!(id = %tax.id, "Updating tax setting");

        let result = sqlx::query(
            r#"
            UPDATE tax_settings SET
                name = ?2,
                rate = ?3,
                is_inclusive = ?4,
                is_active = ?5,
                tax_type = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(&tax.id)
        .bind(&tax.name)
        .bind(tax.rate)
        .bind(tax.is_inclusive)
        .bind(tax.is_active)
        .bind(&tax.tax_type)
        .bind(timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| with_duplicate_value(e.into(), &tax))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("TaxSetting", &tax.id));
        }

        Ok(tax)
    }

    /// Hides an entry from new selections while keeping it resolvable.
    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deactivating tax setting");

        let result = sqlx::query(
            "UPDATE tax_settings SET is_active = 0, updated_at = ?2 WHERE id = ?1",
        )
        .bind(id)
        .bind(timestamp())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("TaxSetting", id));
        }

        Ok(())
    }

    /// Removes an entry. Selections still naming it are skipped by the engine.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting tax setting");

        let result = sqlx::query("DELETE FROM tax_settings WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("TaxSetting", id));
        }

        info!(id = %id, "Tax setting deleted");
        Ok(())
    }

    /// Counts all entries.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tax_settings")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Prices `selection` against the catalog as it is right now.
    ///
    /// The full catalog is used, inactive entries included, so an entry
    /// deactivated after it was ticked still contributes.
    pub async fn quote(
        &self,
        base_amount: f64,
        selection: &TaxSelection,
    ) -> DbResult<TaxCalculationResult> {
        let catalog = self.list_all().await?;
        let result = calculate_tax_amounts(base_amount, selection, &catalog);

        debug!(
            base_amount,
            tax_amount = result.tax_amount,
            total_amount = result.total_amount,
            items = result.tax_breakdown.len(),
            "Quoted tax selection"
        );
        Ok(result)
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Trims text fields, fills an empty `tax_type` with the name, then validates.
fn sanitize(tax: &TaxSetting) -> DbResult<TaxSetting> {
    let mut clean = tax.clone();
    clean.id = clean.id.trim().to_string();
    clean.name = clean.name.trim().to_string();
    clean.tax_type = clean.tax_type.trim().to_string();
    if clean.tax_type.is_empty() {
        clean.tax_type = clean.name.clone();
    }

    validate_tax_setting(&clean)?;
    Ok(clean)
}

/// Fixed-width UTC timestamp; sorts lexically in time order.
fn timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.9fZ").to_string()
}

fn with_duplicate_value(err: DbError, tax: &TaxSetting) -> DbError {
    match err {
        DbError::UniqueViolation { field, .. } => {
            let value = if field.ends_with(".name") {
                tax.name.clone()
            } else {
                tax.id.clone()
            };
            DbError::UniqueViolation { field, value }
        }
        other => other,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use gymdesk_core::{TaxKind, ValidationError};

    async fn repo() -> TaxSettingRepository {
        Database::new(DbConfig::in_memory())
            .await
            .unwrap()
            .tax_settings()
    }

    async fn seeded() -> TaxSettingRepository {
        let repo = repo().await;
        for tax in [
            TaxSetting::new("1", "GST", 18.0, true),
            TaxSetting::new("2", "VAT", 12.0, true),
            TaxSetting::new("3", "Service", 15.0, false),
            TaxSetting::new("4", "Luxury", 10.0, false),
            TaxSetting::new("5", "Cess", 5.0, true).inactive(),
        ] {
            repo.insert(&tax).await.unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn test_list_all_keeps_insertion_order() {
        let repo = seeded().await;

        let ids: Vec<_> = repo.list_all().await.unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
    }

    #[tokio::test]
    async fn test_list_active_hides_inactive() {
        let repo = seeded().await;

        let active = repo.list_active().await.unwrap();
        assert_eq!(active.len(), 4);
        assert!(active.iter().all(|t| t.is_active));
    }

    #[tokio::test]
    async fn test_round_trip_preserves_fields() {
        let repo = seeded().await;

        let gst = repo.get_by_id("1").await.unwrap().unwrap();
        assert_eq!(gst.name, "GST");
        assert_eq!(gst.rate, 18.0);
        assert_eq!(gst.kind(), TaxKind::Inclusive);
        assert_eq!(gst.tax_type, "GST");

        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_sanitises_and_validates() {
        let repo = repo().await;

        let stored = repo
            .insert(&TaxSetting::new(" s1 ", "  Service  ", 15.0, false).with_tax_type(""))
            .await
            .unwrap();
        assert_eq!(stored.id, "s1");
        assert_eq!(stored.name, "Service");
        assert_eq!(stored.tax_type, "Service");

        let err = repo
            .insert(&TaxSetting::new("bad", "Bad", 150.0, false))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::OutOfRange { .. })
        ));

        let err = repo
            .insert(&TaxSetting::new("blank", "   ", 5.0, false))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(ValidationError::Required { .. })));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_reported() {
        let repo = seeded().await;

        let err = repo
            .insert(&TaxSetting::new("9", "GST", 5.0, true))
            .await
            .unwrap_err();
        match err {
            DbError::UniqueViolation { field, value } => {
                assert_eq!(field, "tax_settings.name");
                assert_eq!(value, "GST");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_generates_id() {
        let repo = repo().await;

        let tax = repo.create("GST", 18.0, true).await.unwrap();
        assert!(Uuid::parse_str(&tax.id).is_ok());
        assert_eq!(repo.get_by_id(&tax.id).await.unwrap(), Some(tax));
    }

    #[tokio::test]
    async fn test_update_and_missing_update() {
        let repo = seeded().await;

        let mut gst = repo.get_by_id("1").await.unwrap().unwrap();
        gst.rate = 12.0;
        repo.update(&gst).await.unwrap();
        assert_eq!(repo.get_by_id("1").await.unwrap().unwrap().rate, 12.0);

        let ghost = TaxSetting::new("ghost", "Ghost", 1.0, false);
        assert!(matches!(
            repo.update(&ghost).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_deactivate_and_delete() {
        let repo = seeded().await;

        repo.deactivate("3").await.unwrap();
        assert!(!repo.get_by_id("3").await.unwrap().unwrap().is_active);

        repo.delete("4").await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 4);
        assert!(matches!(
            repo.delete("4").await.unwrap_err(),
            DbError::NotFound { .. }
        ));
        assert!(repo.deactivate("4").await.is_err());
    }

    #[tokio::test]
    async fn test_quote_uses_current_rates() {
        let repo = seeded().await;
        let selection = TaxSelection::new().with("3", true);

        let before = repo.quote(1000.0, &selection).await.unwrap();
        assert_eq!(before.total_amount, 1150.0);

        let mut service = repo.get_by_id("3").await.unwrap().unwrap();
        service.rate = 10.0;
        repo.update(&service).await.unwrap();

        let after = repo.quote(1000.0, &selection).await.unwrap();
        assert_eq!(after.tax_amount, 100.0);
        assert_eq!(after.total_amount, 1100.0);
    }

    #[tokio::test]
    async fn test_quote_skips_deleted_entries() {
        let repo = seeded().await;
        let selection = TaxSelection::new().with("3", true).with("4", true);

        repo.delete("4").await.unwrap();

        let result = repo.quote(1000.0, &selection).await.unwrap();
        assert_eq!(result.tax_breakdown.len(), 1);
        assert_eq!(result.total_amount, 1150.0);
    }

    #[test]
    fn test_timestamp_is_fixed_width() {
        assert_eq!(timestamp().len(), "2024-01-01T00:00:00.000000000Z".len());
    }
}
