//! Checkout command handlers for the CLI.
//!
//! The checkout file is loaded and the pipeline assembled on every command,
//! so a bad binding fails the command before any schema is built or any
//! value is written.

use std::collections::HashMap;

use storefront_core::{AppConfig, CartContext, FieldPipeline, LineItem};
use storefront_db::PgRecordStore;

/// Load the checkout file and assemble its pipeline.
pub(crate) fn load_pipeline(config: &AppConfig) -> anyhow::Result<FieldPipeline> {
    let file = storefront_core::load_checkout(&config.checkout_path)?;
    let pipeline = file.build_pipeline()?;
    tracing::debug!(path = %config.checkout_path.display(), "checkout configuration loaded");
    Ok(pipeline)
}

pub(crate) fn run_validate(config: &AppConfig) -> anyhow::Result<()> {
    let pipeline = load_pipeline(config)?;
    let base = pipeline.base_with_exclusions();

    println!("checkout configuration OK: {}", config.checkout_path.display());
    for section in base.sections() {
        println!("  section {:<12} {} field(s)", section.name(), section.len());
    }
    for group in pipeline.registry().groups() {
        println!("  group   {:<12} {} field(s)", group.name(), group.len());
    }
    for binding in pipeline.bindings() {
        println!(
            "  binding {} -> {} ({binding:?})",
            binding.group(),
            binding.section()
        );
    }
    Ok(())
}

pub(crate) fn run_schema(config: &AppConfig, products: Vec<LineItem>) -> anyhow::Result<()> {
    let pipeline = load_pipeline(config)?;
    let schema = pipeline.build_schema(&CartContext::new(products));
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

/// Extract values for `order_id` and save them to Postgres.
///
/// When `dry_run` is `true` the extracted values are printed as JSON and the
/// database is never contacted.
pub(crate) async fn run_submit(
    config: &AppConfig,
    order_id: i64,
    products: Vec<LineItem>,
    fields: Vec<(String, String)>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let pipeline = load_pipeline(config)?;
    let schema = pipeline.build_schema(&CartContext::new(products));
    let submission: HashMap<String, String> = fields.into_iter().collect();
    let values = FieldPipeline::extract_values(&schema, &submission);

    if dry_run {
        println!("{}", serde_json::to_string_pretty(&values)?);
        return Ok(());
    }

    let pool = storefront_db::connect_from_app_config(config).await?;
    let store = PgRecordStore::new(pool);
    let saved = storefront_db::persist_values(&store, order_id, &values).await?;
    println!("saved {saved} field(s) on order {order_id}");
    Ok(())
}

pub(crate) async fn run_show(
    config: &AppConfig,
    order_id: i64,
    products: Vec<LineItem>,
) -> anyhow::Result<()> {
    let pipeline = load_pipeline(config)?;
    let schema = pipeline.build_schema(&CartContext::new(products));

    let pool = storefront_db::connect_from_app_config(config).await?;
    let store = PgRecordStore::new(pool);
    let shown = storefront_db::load_display_fields(&store, order_id, &schema).await?;

    if shown.is_empty() {
        println!("order {order_id} has no custom field values");
    }
    for field in shown {
        println!("{field}");
    }
    Ok(())
}
