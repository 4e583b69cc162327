mod checkout;
mod hooks;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use storefront_core::{AppConfig, LineItem};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "storefront-cli")]
#[command(about = "Storefront checkout customization tools")]
struct Cli {
    /// Checkout configuration file; overrides `STOREFRONT_CHECKOUT_PATH`.
    #[arg(long, global = true)]
    checkout: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load the checkout configuration and report what it defines
    Validate,
    /// Print the checkout schema as JSON for a given cart
    Schema {
        /// Cart line as `PRODUCT_ID` or `PRODUCT_ID:QTY`; repeatable
        #[arg(long = "product", value_parser = parse_line_item)]
        products: Vec<LineItem>,
    },
    /// Extract submitted values and save them on an order
    Submit {
        #[arg(long)]
        order_id: i64,
        #[arg(long = "product", value_parser = parse_line_item)]
        products: Vec<LineItem>,
        /// Submitted form value as `KEY=VALUE`; repeatable
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
        /// Print the values that would be saved without touching the database
        #[arg(long)]
        dry_run: bool,
    },
    /// Show the custom field values stored on an order
    Show {
        #[arg(long)]
        order_id: i64,
        #[arg(long = "product", value_parser = parse_line_item)]
        products: Vec<LineItem>,
    },
    /// Resolve the redirect after an add-to-cart action
    Redirect {
        /// Current request URL
        #[arg(long)]
        url: String,
        /// Redirect URL already chosen by the platform, if any
        #[arg(long)]
        supplied: Option<String>,
    },
    /// Render the configured email footer
    Footer {
        /// Defaults to the current year
        #[arg(long)]
        year: Option<i32>,
    },
    /// Database operations
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Apply pending migrations
    Migrate,
}

fn parse_line_item(raw: &str) -> Result<LineItem, String> {
    let (id, qty) = match raw.split_once(':') {
        Some((id, qty)) => (id, qty),
        None => (raw, "1"),
    };
    let product_id = id
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("invalid product id '{id}': {e}"))?;
    let quantity = qty
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid quantity '{qty}': {e}"))?;
    Ok(LineItem::new(product_id, quantity))
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    if key.trim().is_empty() {
        return Err(format!("empty field key in '{raw}'"));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

/// Load the environment configuration and start logging.
///
/// Only commands that read the configuration call this, so parsing and
/// `redirect` keep working when the environment is misconfigured.
fn init_app_config(checkout: Option<PathBuf>) -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();
    let mut config = storefront_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    if let Some(path) = checkout {
        config.checkout_path = path;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Cli {
        checkout: checkout_path,
        command,
    } = Cli::parse();

    match command {
        Some(Commands::Validate) => checkout::run_validate(&init_app_config(checkout_path)?)?,
        Some(Commands::Schema { products }) => {
            checkout::run_schema(&init_app_config(checkout_path)?, products)?;
        }
        Some(Commands::Submit {
            order_id,
            products,
            fields,
            dry_run,
        }) => {
            let config = init_app_config(checkout_path)?;
            checkout::run_submit(&config, order_id, products, fields, dry_run).await?;
        }
        Some(Commands::Show { order_id, products }) => {
            checkout::run_show(&init_app_config(checkout_path)?, order_id, products).await?;
        }
        Some(Commands::Redirect { url, supplied }) => {
            hooks::run_redirect(&url, supplied.as_deref())?;
        }
        Some(Commands::Footer { year }) => {
            hooks::run_footer(&init_app_config(checkout_path)?, year)?;
        }
        Some(Commands::Db {
            command: DbCommands::Migrate,
        }) => {
            let config = init_app_config(checkout_path)?;
            let pool = storefront_db::connect_from_app_config(&config).await?;
            let applied = storefront_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
        None => println!("storefront-cli ready; see --help"),
    }

    Ok(())
}

#[cfg(test)]
mod tests;
