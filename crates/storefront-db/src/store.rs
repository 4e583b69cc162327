use std::future::Future;

use crate::StoreError;

/// Key-value persistence for order custom fields, keyed by `(order_id, label)`.
///
/// `save` may be retried by callers, so implementations must treat a repeated
/// identical write as a no-op (upsert semantics).
pub trait RecordStore: Send + Sync {
    fn save(
        &self,
        order_id: i64,
        label: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn load(
        &self,
        order_id: i64,
        label: &str,
    ) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;
}
