//! Checkout schema construction and submitted-value extraction.
//!
//! Both operations are pure: [`FieldPipeline::build_schema`] depends only on
//! the registry and the cart, and [`FieldPipeline::extract_values`] only on
//! the schema and the submission. Persisting the extracted values is left to
//! the caller so it can own the transaction.

use std::collections::{HashMap, HashSet};
use std::hash::BuildHasher;

use serde::Serialize;

use crate::fields::{FieldGroup, Schema};
use crate::policy::{CartContext, Policy};
use crate::registry::FieldSchemaRegistry;
use crate::ConfigError;

/// Keys removed from a section on every render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exclusion {
    pub section: String,
    pub keys: Vec<String>,
}

impl Exclusion {
    #[must_use]
    pub fn new<I, K>(section: impl Into<String>, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            section: section.into(),
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }
}

/// Inject `group` into `section` whenever `policy` holds for the cart.
pub struct ConditionalBinding {
    section: String,
    policy: Box<dyn Policy>,
    group: String,
}

impl ConditionalBinding {
    pub fn new(
        section: impl Into<String>,
        policy: impl Policy + 'static,
        group: impl Into<String>,
    ) -> Self {
        Self {
            section: section.into(),
            policy: Box::new(policy),
            group: group.into(),
        }
    }

    #[must_use]
    pub fn section(&self) -> &str {
        &self.section
    }

    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }
}

impl std::fmt::Debug for ConditionalBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConditionalBinding")
            .field("section", &self.section)
            .field("policy", &self.policy.describe())
            .field("group", &self.group)
            .finish()
    }
}

/// A binding whose group has been looked up in the registry.
#[derive(Debug)]
struct ResolvedBinding {
    binding: ConditionalBinding,
    fields: FieldGroup,
}

/// One submitted value ready for the record store, keyed by field label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersistedFieldValue {
    pub label: String,
    pub value: String,
}

#[derive(Debug)]
pub struct FieldPipeline {
    registry: FieldSchemaRegistry,
    exclusions: Vec<Exclusion>,
    bindings: Vec<ResolvedBinding>,
}

impl FieldPipeline {
    /// Assemble a pipeline, validating every binding against the registry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownGroup`] if a binding names a group the
    /// registry does not hold, or [`ConfigError::DuplicateLabel`] if two
    /// different field keys that can appear on the same form share a label.
    pub fn new(
        registry: FieldSchemaRegistry,
        exclusions: Vec<Exclusion>,
        bindings: Vec<ConditionalBinding>,
    ) -> Result<Self, ConfigError> {
        let mut resolved = Vec::with_capacity(bindings.len());
        for binding in bindings {
            let fields = registry
                .extra_group(&binding.group)
                .map_err(|source| ConfigError::UnknownGroup {
                    section: binding.section.clone(),
                    source,
                })?
                .clone();
            resolved.push(ResolvedBinding { binding, fields });
        }

        let pipeline = Self {
            registry,
            exclusions,
            bindings: resolved,
        };
        pipeline.check_labels()?;

        tracing::debug!(
            exclusions = pipeline.exclusions.len(),
            bindings = pipeline.bindings.len(),
            "checkout field pipeline assembled"
        );
        Ok(pipeline)
    }

    #[must_use]
    pub fn registry(&self) -> &FieldSchemaRegistry {
        &self.registry
    }

    pub fn bindings(&self) -> impl Iterator<Item = &ConditionalBinding> {
        self.bindings.iter().map(|b| &b.binding)
    }

    /// The schema shown when no binding matches.
    #[must_use]
    pub fn base_with_exclusions(&self) -> Schema {
        self.exclusions
            .iter()
            .fold(self.registry.base_schema(), |schema, exclusion| {
                FieldSchemaRegistry::remove_fields(&schema, &exclusion.section, &exclusion.keys)
            })
    }

    /// Build the checkout schema for `context`.
    ///
    /// Bindings are applied in registration order; when two matching groups
    /// define the same key, the later one wins.
    #[must_use]
    pub fn build_schema(&self, context: &CartContext) -> Schema {
        let mut schema = self.base_with_exclusions();

        for resolved in &self.bindings {
            let binding = &resolved.binding;
            if !binding.policy.applies(context) {
                continue;
            }
            tracing::debug!(
                section = %binding.section,
                group = %binding.group,
                policy = %binding.policy.describe(),
                "conditional field group applied"
            );
            schema
                .section_or_insert(&binding.section)
                .merge(&resolved.fields);
        }

        schema
    }

    /// Extract the persistable values of `submission` against `schema`.
    ///
    /// Fields missing from the submission or blank after trimming are
    /// skipped, so a partial resubmission never overwrites stored values
    /// with empty strings. Values are returned in section-then-field order.
    /// Each label is emitted at most once: when a field appears in several
    /// sections, only its first non-blank occurrence is kept.
    #[must_use]
    pub fn extract_values<S: BuildHasher>(
        schema: &Schema,
        submission: &HashMap<String, String, S>,
    ) -> Vec<PersistedFieldValue> {
        let mut labels = HashSet::new();
        let values: Vec<PersistedFieldValue> = schema
            .fields()
            .filter_map(|(_, field)| {
                if labels.contains(field.label()) {
                    return None;
                }
                let raw = submission.get(field.key())?;
                let value = sanitize(raw);
                if value.is_empty() {
                    return None;
                }
                labels.insert(field.label());
                Some(PersistedFieldValue {
                    label: field.label().to_string(),
                    value,
                })
            })
            .collect();

        tracing::debug!(
            submitted = submission.len(),
            extracted = values.len(),
            "checkout field values extracted"
        );
        values
    }

    /// Every label is owned by exactly one key across the forms this
    /// pipeline can produce.
    fn check_labels(&self) -> Result<(), ConfigError> {
        let base = self.base_with_exclusions();
        let mut owners: HashMap<&str, &str> = HashMap::new();
        let mut seen_groups = HashSet::new();

        let extra = self
            .bindings
            .iter()
            .filter(|b| seen_groups.insert(b.binding.group.as_str()))
            .flat_map(|b| b.fields.iter());

        for field in base.fields().map(|(_, f)| f).chain(extra) {
            match owners.get(field.label()) {
                Some(&owner) if owner != field.key() => {
                    return Err(ConfigError::DuplicateLabel {
                        label: field.label().to_string(),
                        first_key: owner.to_string(),
                        second_key: field.key().to_string(),
                    });
                }
                Some(_) => {}
                None => {
                    owners.insert(field.label(), field.key());
                }
            }
        }
        Ok(())
    }
}

/// Strip control characters and surrounding whitespace.
///
/// Markup is left as-is; escaping is the job of whatever renders the value.
#[must_use]
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
