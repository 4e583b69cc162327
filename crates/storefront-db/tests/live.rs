//! Live integration tests for storefront-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. `"../../migrations"` is relative to `crates/storefront-db/`.

use storefront_core::{FieldDefinition, FieldGroup, FieldType, PersistedFieldValue, Schema};
use storefront_db::{
    list_order_fields, load_display_fields, persist_values, PgRecordStore, RecordStore,
};

fn order_schema() -> Schema {
    Schema::new().with_section(
        FieldGroup::new("order")
            .with_field(FieldDefinition::new(
                "web_address",
                FieldType::Text,
                "Hacked Website Address",
            ))
            .with_field(FieldDefinition::new(
                "host_user",
                FieldType::Text,
                "Hosting Username",
            )),
    )
}

#[sqlx::test(migrations = "../../migrations")]
async fn save_then_load_returns_value(pool: sqlx::PgPool) {
    let store = PgRecordStore::new(pool);
    store
        .save(77, "Hacked Website Address", "mysite.com")
        .await
        .expect("save");

    let value = store
        .load(77, "Hacked Website Address")
        .await
        .expect("load");
    assert_eq!(value.as_deref(), Some("mysite.com"));
    assert!(store.load(78, "Hacked Website Address").await.expect("load").is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn repeated_save_upserts_single_row(pool: sqlx::PgPool) {
    let store = PgRecordStore::new(pool.clone());
    store.save(9, "Hosting Username", "admin").await.expect("save");
    store.save(9, "Hosting Username", "admin").await.expect("save");
    store.save(9, "Hosting Username", "root").await.expect("save");

    let rows = list_order_fields(&pool, 9).await.expect("list");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].value, "root");
    assert!(rows[0].updated_at >= rows[0].created_at);
}

#[sqlx::test(migrations = "../../migrations")]
async fn persisted_values_display_in_schema_order(pool: sqlx::PgPool) {
    let store = PgRecordStore::new(pool);
    let values = vec![
        PersistedFieldValue {
            label: "Hosting Username".to_string(),
            value: "admin".to_string(),
        },
        PersistedFieldValue {
            label: "Hacked Website Address".to_string(),
            value: "mysite.com".to_string(),
        },
    ];
    persist_values(&store, 12, &values).await.expect("persist");

    let shown = load_display_fields(&store, 12, &order_schema())
        .await
        .expect("display");
    let labels: Vec<_> = shown.iter().map(|d| d.label.as_str()).collect();
    assert_eq!(labels, vec!["Hacked Website Address", "Hosting Username"]);
}
