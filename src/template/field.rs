// src/template/field.rs
use serde::ser::{Serialize, SerializeMap, Serializer};

/// One checkbox choice declared by a `checkboxes` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckboxOption {
    pub label: String,
    pub required: bool,
}

impl Serialize for CheckboxOption {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("label", &self.label)?;
        map.serialize_entry("required", &self.required)?;
        map.end()
    }
}

/// Field type plus the metadata only that type carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Input,
    Textarea,
    Dropdown {
        multiple: bool,
        options: Vec<String>,
    },
    Checkboxes {
        options: Vec<CheckboxOption>,
    },
    /// A `type` outside the known set, kept verbatim. Formatting such a field fails.
    Unrecognized(String),
}

impl FieldKind {
    /// Name used for this kind in issue form YAML.
    pub fn type_name(&self) -> &str {
        match self {
            FieldKind::Input => "input",
            FieldKind::Textarea => "textarea",
            FieldKind::Dropdown { .. } => "dropdown",
            FieldKind::Checkboxes { .. } => "checkboxes",
            FieldKind::Unrecognized(name) => name,
        }
    }
}

/// A data-bearing field of a normalized template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub key: String,
    pub label: String,
    pub required: bool,
    pub kind: FieldKind,
}

impl Serialize for FieldDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", self.kind.type_name())?;
        map.serialize_entry("label", &self.label)?;
        map.serialize_entry("required", &self.required)?;
        match &self.kind {
            FieldKind::Dropdown { multiple, options } => {
                map.serialize_entry("multiple", multiple)?;
                map.serialize_entry("options", options)?;
            }
            FieldKind::Checkboxes { options } => {
                map.serialize_entry("options", options)?;
            }
            _ => {}
        }
        map.end()
    }
}

/// Normalized template: field key -> descriptor, in declaration order.
///
/// Re-inserting a key replaces its descriptor but keeps the position of the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    fields: Vec<FieldDescriptor>,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: FieldDescriptor) {
        match self.fields.iter_mut().find(|f| f.key == field.key) {
            Some(existing) => {
                tracing::warn!("Template declares key '{}' more than once; keeping the last declaration", field.key);
                *existing = field;
            }
            None => self.fields.push(field),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// First field, in declaration order, whose label is exactly `label`.
    pub fn find_by_label(&self, label: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.label == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Template {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for field in &self.fields {
            map.serialize_entry(&field.key, field)?;
        }
        map.end()
    }
}
