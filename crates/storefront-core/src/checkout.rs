//! Checkout configuration file: base schema, exclusions, extra groups, and
//! the conditional bindings that tie groups to cart contents.

use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::fields::{FieldDefinition, FieldGroup, Schema};
use crate::hooks::StorefrontHooks;
use crate::pipeline::{ConditionalBinding, Exclusion, FieldPipeline};
use crate::policy::{any_of, contains_product};
use crate::registry::FieldSchemaRegistry;
use crate::ConfigError;

/// A YAML mapping whose entry order is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordered<V>(pub Vec<(String, V)>);

impl<V> Default for Ordered<V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Ordered<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedVisitor<V> {
            type Value = Ordered<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    entries.push((key, value));
                }
                Ok(Ordered(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor(PhantomData))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum PolicyConfig {
    ContainsProduct { product_id: u64 },
    AnyOf { product_ids: Vec<u64> },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BindingConfig {
    pub section: String,
    pub group: String,
    pub when: PolicyConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StorefrontSection {
    /// Email footer template; `{site_title}` and `{year}` are substituted.
    #[serde(default)]
    pub footer: Option<String>,
    #[serde(default)]
    pub suppress_structured_data: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct CheckoutFile {
    #[serde(default)]
    pub base: Ordered<Vec<FieldDefinition>>,
    #[serde(default)]
    pub exclusions: Ordered<Vec<String>>,
    #[serde(default)]
    pub groups: Ordered<Vec<FieldDefinition>>,
    #[serde(default)]
    pub bindings: Vec<BindingConfig>,
    #[serde(default)]
    pub storefront: StorefrontSection,
}

impl CheckoutFile {
    /// Build the registry and pipeline described by this file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownGroup`] or [`ConfigError::DuplicateLabel`]
    /// from [`FieldPipeline::new`].
    pub fn build_pipeline(&self) -> Result<FieldPipeline, ConfigError> {
        let base = self
            .base
            .0
            .iter()
            .fold(Schema::new(), |schema, (name, fields)| {
                schema.with_section(to_group(name, fields))
            });

        let registry = self
            .groups
            .0
            .iter()
            .fold(FieldSchemaRegistry::new(base), |registry, (name, fields)| {
                registry.with_group(to_group(name, fields))
            });

        let exclusions = self
            .exclusions
            .0
            .iter()
            .map(|(section, keys)| Exclusion::new(section.clone(), keys.iter().cloned()))
            .collect();

        let bindings = self
            .bindings
            .iter()
            .map(|b| match &b.when {
                PolicyConfig::ContainsProduct { product_id } => ConditionalBinding::new(
                    b.section.clone(),
                    contains_product(*product_id),
                    b.group.clone(),
                ),
                PolicyConfig::AnyOf { product_ids } => ConditionalBinding::new(
                    b.section.clone(),
                    any_of(product_ids.iter().copied()),
                    b.group.clone(),
                ),
            })
            .collect();

        FieldPipeline::new(registry, exclusions, bindings)
    }

    /// Storefront side hooks configured in the `storefront` section.
    #[must_use]
    pub fn hooks(&self, site_title: &str) -> StorefrontHooks {
        StorefrontHooks::new(
            site_title,
            self.storefront.footer.clone(),
            self.storefront.suppress_structured_data,
        )
    }
}

fn to_group(name: &str, fields: &[FieldDefinition]) -> FieldGroup {
    fields
        .iter()
        .cloned()
        .fold(FieldGroup::new(name), FieldGroup::with_field)
}

/// Load and validate the checkout configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_checkout(path: &Path) -> Result<CheckoutFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CheckoutFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_checkout(&content)
}

/// Parse and validate checkout configuration from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_checkout(content: &str) -> Result<CheckoutFile, ConfigError> {
    let file: CheckoutFile = serde_yaml::from_str(content)?;
    validate_checkout(&file)?;
    Ok(file)
}

fn validate_checkout(file: &CheckoutFile) -> Result<(), ConfigError> {
    validate_sections("base section", &file.base)?;
    validate_sections("group", &file.groups)?;

    let mut seen_sections = HashSet::new();
    for (section, _) in &file.exclusions.0 {
        if !seen_sections.insert(section.as_str()) {
            return Err(ConfigError::Validation(format!(
                "exclusions list section '{section}' more than once"
            )));
        }
    }

    for binding in &file.bindings {
        if binding.section.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "binding for group '{}' has an empty section name",
                binding.group
            )));
        }
        if let PolicyConfig::AnyOf { product_ids } = &binding.when {
            if product_ids.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "binding for group '{}' has an empty any_of product list",
                    binding.group
                )));
            }
        }
    }

    Ok(())
}

fn validate_sections(
    kind: &str,
    sections: &Ordered<Vec<FieldDefinition>>,
) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for (name, fields) in &sections.0 {
        if name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "{kind} name must be non-empty"
            )));
        }
        if !seen_names.insert(name.as_str()) {
            return Err(ConfigError::Validation(format!("duplicate {kind}: '{name}'")));
        }

        let mut seen_keys = HashSet::new();
        for field in fields {
            if field.key().trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "{kind} '{name}' has a field with an empty key"
                )));
            }
            if field.label().trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "field '{}' in {kind} '{name}' has an empty label",
                    field.key()
                )));
            }
            if !seen_keys.insert(field.key()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate field key '{}' in {kind} '{name}'",
                    field.key()
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldType;
    use crate::policy::{CartContext, LineItem};

    const CHECKOUT_YAML: &str = r#"
base:
  billing:
    - { key: country, type: select, label: Country }
    - { key: address_1, label: Street address }
    - { key: email, type: email, label: Email address, required: true, class: [form-row-wide] }
  order:
    - { key: order_comments, type: textarea, label: Order notes }
exclusions:
  billing: [country, address_1]
groups:
  hosting:
    - { key: web_address, label: Hacked Website Address, placeholder: example.com, required: true }
    - { key: host_pass, type: password, label: Hosting Password }
bindings:
  - section: order
    group: hosting
    when: { policy: contains_product, product_id: 1758 }
storefront:
  footer: "{site_title} | {year}"
  suppress_structured_data: true
"#;

    #[test]
    fn parses_sections_in_document_order() {
        let file = parse_checkout(CHECKOUT_YAML).unwrap();
        let names: Vec<_> = file.base.0.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["billing", "order"]);
        assert_eq!(file.base.0[0].1[2].field_type(), FieldType::Email);
        assert!(file.base.0[0].1[2].is_required());
        assert_eq!(
            file.bindings[0].when,
            PolicyConfig::ContainsProduct { product_id: 1758 }
        );
        assert!(file.storefront.suppress_structured_data);
    }

    #[test]
    fn builds_working_pipeline() {
        let pipeline = parse_checkout(CHECKOUT_YAML)
            .unwrap()
            .build_pipeline()
            .unwrap();

        let plain = pipeline.build_schema(&CartContext::default());
        let billing: Vec<_> = plain.section("billing").unwrap().keys().collect();
        assert_eq!(billing, vec!["email"]);
        assert_eq!(plain.section("order").unwrap().len(), 1);

        let cart = CartContext::new(vec![LineItem::new(1758, 1)]);
        let hosted = pipeline.build_schema(&cart);
        let order: Vec<_> = hosted.section("order").unwrap().keys().collect();
        assert_eq!(order, vec!["order_comments", "web_address", "host_pass"]);
    }

    #[test]
    fn any_of_policy_parses() {
        let yaml = r"
groups:
  gift:
    - { key: gift_note, label: Gift note }
bindings:
  - { section: order, group: gift, when: { policy: any_of, product_ids: [1, 2] } }
";
        let file = parse_checkout(yaml).unwrap();
        let pipeline = file.build_pipeline().unwrap();
        let cart = CartContext::new(vec![LineItem::new(2, 1)]);
        assert!(pipeline
            .build_schema(&cart)
            .section("order")
            .is_some_and(|s| s.contains_key("gift_note")));
    }

    #[test]
    fn select_options_reach_schema_json() {
        let yaml = r"
groups:
  hosting:
    - key: host_plan
      type: select
      label: Hosting plan
      options:
        - { value: shared, label: Shared }
        - { value: vps, label: VPS }
bindings:
  - { section: order, group: hosting, when: { policy: contains_product, product_id: 1758 } }
";
        let pipeline = parse_checkout(yaml).unwrap().build_pipeline().unwrap();
        let schema = pipeline.build_schema(&CartContext::new(vec![LineItem::new(1758, 1)]));

        let plan = schema.section("order").unwrap().get("host_plan").unwrap();
        let values: Vec<_> = plan.options().iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["shared", "vps"]);

        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(json["order"][0]["options"][1]["label"], "VPS");
    }

    #[test]
    fn unknown_group_surfaces_at_build() {
        let yaml = r"
bindings:
  - { section: order, group: missing, when: { policy: contains_product, product_id: 5 } }
";
        let err = parse_checkout(yaml).unwrap().build_pipeline().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownGroup { .. }), "got: {err:?}");
    }

    #[test]
    fn rejects_duplicate_field_key() {
        let yaml = r"
groups:
  hosting:
    - { key: host_name, label: Host }
    - { key: host_name, label: Host again }
";
        let err = parse_checkout(yaml).unwrap_err();
        assert!(err.to_string().contains("duplicate field key 'host_name'"));
    }

    #[test]
    fn rejects_empty_label() {
        let yaml = r#"
base:
  billing:
    - { key: email, label: "  " }
"#;
        let err = parse_checkout(yaml).unwrap_err();
        assert!(err.to_string().contains("empty label"));
    }

    #[test]
    fn rejects_empty_any_of() {
        let yaml = r"
groups:
  gift:
    - { key: gift_note, label: Gift note }
bindings:
  - { section: order, group: gift, when: { policy: any_of, product_ids: [] } }
";
        let err = parse_checkout(yaml).unwrap_err();
        assert!(err.to_string().contains("empty any_of"));
    }

    #[test]
    fn rejects_unknown_field_type() {
        let yaml = r"
base:
  billing:
    - { key: email, type: carrier_pigeon, label: Email }
";
        let err = parse_checkout(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::CheckoutFileParse(_)));
    }

    #[test]
    fn empty_document_is_valid() {
        let file = parse_checkout("{}").unwrap();
        let pipeline = file.build_pipeline().unwrap();
        assert!(pipeline.build_schema(&CartContext::default()).is_empty());
    }

    #[test]
    fn load_checkout_from_real_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("config")
            .join("checkout.yaml");
        assert!(
            path.exists(),
            "checkout.yaml missing at {path:?}; required for this test"
        );
        let file = load_checkout(&path).unwrap();
        assert!(file.build_pipeline().is_ok());
    }

    #[test]
    fn load_checkout_missing_file_is_io_error() {
        let err = load_checkout(Path::new("/nonexistent/checkout.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::CheckoutFileIo { .. }));
    }
}
