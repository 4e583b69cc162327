//! Database operations for the `order_field_values` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::store::RecordStore;
use crate::StoreError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `order_field_values` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderFieldRow {
    pub id: i64,
    /// Assigned by the host platform's order subsystem.
    pub order_id: i64,
    pub label: String,
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Record store
// ---------------------------------------------------------------------------

/// [`RecordStore`] backed by Postgres.
#[derive(Debug, Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl RecordStore for PgRecordStore {
    /// Upserts one value.
    ///
    /// Conflicts on `(order_id, label)` replace `value`; `updated_at` only
    /// moves when the value actually changes, so retried writes are no-ops.
    async fn save(&self, order_id: i64, label: &str, value: &str) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO order_field_values (order_id, label, value) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (order_id, label) DO UPDATE SET \
                 value      = EXCLUDED.value, \
                 updated_at = NOW() \
             WHERE order_field_values.value IS DISTINCT FROM EXCLUDED.value",
        )
        .bind(order_id)
        .bind(label)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn load(&self, order_id: i64, label: &str) -> Result<Option<String>, StoreError> {
        let value = sqlx::query_scalar::<_, String>(
            "SELECT value FROM order_field_values WHERE order_id = $1 AND label = $2",
        )
        .bind(order_id)
        .bind(label)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// List every stored value for an order, oldest first.
///
/// # Errors
///
/// Returns [`StoreError::Sqlx`] if the query fails.
pub async fn list_order_fields(
    pool: &PgPool,
    order_id: i64,
) -> Result<Vec<OrderFieldRow>, StoreError> {
    let rows = sqlx::query_as::<_, OrderFieldRow>(
        "SELECT id, order_id, label, value, created_at, updated_at \
         FROM order_field_values \
         WHERE order_id = $1 \
         ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
