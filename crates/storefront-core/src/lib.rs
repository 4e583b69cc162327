pub mod app_config;
pub mod checkout;
pub mod config;
pub mod fields;
pub mod hooks;
pub mod pipeline;
pub mod policy;
pub mod registry;

pub use app_config::{AppConfig, Environment};
pub use checkout::{load_checkout, parse_checkout, BindingConfig, CheckoutFile, PolicyConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use fields::{FieldDefinition, FieldGroup, FieldType, Schema, SelectOption};
pub use hooks::{add_to_cart_redirect, render_footer, StorefrontHooks};
pub use pipeline::{
    sanitize, ConditionalBinding, Exclusion, FieldPipeline, PersistedFieldValue,
};
pub use policy::{any_of, contains_product, CartContext, LineItem, Policy};
pub use registry::FieldSchemaRegistry;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FieldError {
    #[error("no extra field group registered as '{group}'")]
    NotFound { group: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read checkout config {path}: {source}")]
    CheckoutFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse checkout config: {0}")]
    CheckoutFileParse(#[from] serde_yaml::Error),

    #[error("binding for section '{section}' references an unknown group: {source}")]
    UnknownGroup {
        section: String,
        #[source]
        source: FieldError,
    },

    #[error("label '{label}' is used by both '{first_key}' and '{second_key}'")]
    DuplicateLabel {
        label: String,
        first_key: String,
        second_key: String,
    },

    #[error("checkout config validation failed: {0}")]
    Validation(String),
}

#[derive(Debug, Error)]
pub enum HookError {
    #[error("invalid request URL \"{url}\": {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}
