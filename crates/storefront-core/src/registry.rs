use crate::fields::{FieldGroup, Schema};
use crate::FieldError;

/// Base checkout schema plus the named extra groups that bindings may inject.
///
/// Assembled once at startup and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct FieldSchemaRegistry {
    base: Schema,
    groups: Vec<FieldGroup>,
}

impl FieldSchemaRegistry {
    #[must_use]
    pub fn new(base: Schema) -> Self {
        Self {
            base,
            groups: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_group(mut self, group: FieldGroup) -> Self {
        self.register_group(group);
        self
    }

    /// Register an extra group. A second group with the same name replaces the first.
    pub fn register_group(&mut self, group: FieldGroup) {
        match self.groups.iter_mut().find(|g| g.name() == group.name()) {
            Some(slot) => *slot = group,
            None => self.groups.push(group),
        }
    }

    /// A fresh copy of the base schema; callers may mutate it freely.
    #[must_use]
    pub fn base_schema(&self) -> Schema {
        self.base.clone()
    }

    /// Look up an extra group by name.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NotFound`] if no group is registered under `name`.
    pub fn extra_group(&self, name: &str) -> Result<&FieldGroup, FieldError> {
        self.groups
            .iter()
            .find(|g| g.name() == name)
            .ok_or_else(|| FieldError::NotFound {
                group: name.to_string(),
            })
    }

    pub fn groups(&self) -> std::slice::Iter<'_, FieldGroup> {
        self.groups.iter()
    }

    /// Return a copy of `schema` with `keys` removed from `section`.
    ///
    /// Unknown keys and unknown sections are ignored, so applying the same
    /// removal twice yields the same schema as applying it once.
    #[must_use]
    pub fn remove_fields<I, K>(schema: &Schema, section: &str, keys: I) -> Schema
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut out = schema.clone();
        if let Some(group) = out.section_mut(section) {
            for key in keys {
                group.remove(key.as_ref());
            }
        }
        out
    }
}
