//! Checkout field data model: definitions, ordered groups, and schemas.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Password,
    Select,
    Email,
    Tel,
    Textarea,
    Checkbox,
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::Text => write!(f, "text"),
            FieldType::Password => write!(f, "password"),
            FieldType::Select => write!(f, "select"),
            FieldType::Email => write!(f, "email"),
            FieldType::Tel => write!(f, "tel"),
            FieldType::Textarea => write!(f, "textarea"),
            FieldType::Checkbox => write!(f, "checkbox"),
        }
    }
}

/// One choice of a `select` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// A single checkout form field.
///
/// Fields are private so a definition cannot change once it has been placed
/// in a [`FieldGroup`]; the `with_*` methods consume and return the value and
/// are meant for construction only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    key: String,
    #[serde(rename = "type", default)]
    field_type: FieldType,
    /// Shown next to the input and used as the storage key on the order.
    label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    placeholder: Option<String>,
    #[serde(default)]
    required: bool,
    #[serde(default, rename = "class", skip_serializing_if = "Vec::is_empty")]
    css_classes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    options: Vec<SelectOption>,
}

impl FieldDefinition {
    #[must_use]
    pub fn new(key: impl Into<String>, field_type: FieldType, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            field_type,
            label: label.into(),
            placeholder: None,
            required: false,
            css_classes: Vec::new(),
            options: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.css_classes.push(class.into());
        self
    }

    #[must_use]
    pub fn with_option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.options.push(SelectOption {
            value: value.into(),
            label: label.into(),
        });
        self
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    #[must_use]
    pub fn css_classes(&self) -> &[String] {
        &self.css_classes
    }

    #[must_use]
    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }
}

/// A named, insertion-ordered set of fields, unique by key.
///
/// Groups hold a handful of fields, so lookups are linear scans over a `Vec`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldGroup {
    name: String,
    fields: Vec<FieldDefinition>,
}

impl FieldGroup {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.insert(field);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert a field, replacing any existing field with the same key.
    ///
    /// A replaced field keeps its original position; a new key is appended.
    /// Returns the replaced definition, if any.
    pub fn insert(&mut self, field: FieldDefinition) -> Option<FieldDefinition> {
        match self.fields.iter_mut().find(|f| f.key == field.key) {
            Some(slot) => Some(std::mem::replace(slot, field)),
            None => {
                self.fields.push(field);
                None
            }
        }
    }

    /// Remove a field by key. Absent keys are a no-op.
    pub fn remove(&mut self, key: &str) -> Option<FieldDefinition> {
        let idx = self.fields.iter().position(|f| f.key == key)?;
        Some(self.fields.remove(idx))
    }

    /// Merge every field of `other` into this group, last write wins.
    pub fn merge(&mut self, other: &FieldGroup) {
        for field in &other.fields {
            self.insert(field.clone());
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.key == key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(FieldDefinition::key)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldDefinition> {
        self.fields.iter()
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a> IntoIterator for &'a FieldGroup {
    type Item = &'a FieldDefinition;
    type IntoIter = std::slice::Iter<'a, FieldDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Form sections (e.g. `"billing"`, `"order"`) in render order.
///
/// Each section is a [`FieldGroup`] whose name is the section name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    sections: Vec<FieldGroup>,
}

impl Schema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a whole section.
    #[must_use]
    pub fn with_section(mut self, section: FieldGroup) -> Self {
        self.insert_section(section);
        self
    }

    pub fn insert_section(&mut self, section: FieldGroup) {
        match self.sections.iter_mut().find(|s| s.name == section.name) {
            Some(slot) => *slot = section,
            None => self.sections.push(section),
        }
    }

    #[must_use]
    pub fn section(&self, name: &str) -> Option<&FieldGroup> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut FieldGroup> {
        self.sections.iter_mut().find(|s| s.name == name)
    }

    /// Return the named section, appending an empty one if it does not exist.
    pub fn section_or_insert(&mut self, name: &str) -> &mut FieldGroup {
        let idx = match self.sections.iter().position(|s| s.name == name) {
            Some(idx) => idx,
            None => {
                self.sections.push(FieldGroup::new(name));
                self.sections.len() - 1
            }
        };
        &mut self.sections[idx]
    }

    pub fn sections(&self) -> std::slice::Iter<'_, FieldGroup> {
        self.sections.iter()
    }

    /// Every field with its section name, in section-then-field order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldDefinition)> {
        self.sections
            .iter()
            .flat_map(|s| s.iter().map(move |f| (s.name(), f)))
    }

    #[must_use]
    pub fn field_count(&self) -> usize {
        self.sections.iter().map(FieldGroup::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for section in &self.sections {
            map.serialize_entry(section.name(), section.fields())?;
        }
        map.end()
    }
}
