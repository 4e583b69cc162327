//! Glue between the field pipeline and a [`RecordStore`].

use storefront_core::{PersistedFieldValue, Schema};

use crate::store::RecordStore;
use crate::StoreError;

/// A stored value paired with the label it is shown under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayField {
    pub label: String,
    pub value: String,
}

impl std::fmt::Display for DisplayField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.label, self.value)
    }
}

/// Save each extracted value for `order_id`, one `save` call per value, in order.
///
/// Stops at the first failed write. Values already written stay written;
/// callers needing all-or-nothing must wrap this in their own transaction.
///
/// # Errors
///
/// Returns the first [`StoreError`] the store reports.
pub async fn persist_values<S: RecordStore>(
    store: &S,
    order_id: i64,
    values: &[PersistedFieldValue],
) -> Result<usize, StoreError> {
    for value in values {
        if let Err(e) = store.save(order_id, &value.label, &value.value).await {
            tracing::error!(order_id, label = %value.label, error = %e, "order field save failed");
            return Err(e);
        }
    }

    tracing::info!(order_id, saved = values.len(), "order custom fields saved");
    Ok(values.len())
}

/// Load the stored values of every field in `schema` for admin display.
///
/// Fields without a stored value are skipped. A label shared by fields in
/// several sections is only shown once.
///
/// # Errors
///
/// Returns the first [`StoreError`] the store reports.
pub async fn load_display_fields<S: RecordStore>(
    store: &S,
    order_id: i64,
    schema: &Schema,
) -> Result<Vec<DisplayField>, StoreError> {
    let mut shown: Vec<DisplayField> = Vec::new();

    for (_, field) in schema.fields() {
        if shown.iter().any(|d| d.label == field.label()) {
            continue;
        }
        if let Some(value) = store.load(order_id, field.label()).await? {
            shown.push(DisplayField {
                label: field.label().to_string(),
                value,
            });
        }
    }

    tracing::debug!(order_id, shown = shown.len(), "order custom fields loaded");
    Ok(shown)
}
