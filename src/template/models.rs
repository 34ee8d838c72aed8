// src/template/models.rs
use serde::Deserialize;

/// Structure representing a GitHub issue form template (YAML).
/// Only `body` drives extraction; the remaining top-level keys are accepted and ignored.
/// `labels`, `assignees` and `projects` may be a string or a list, so they stay untyped.
#[derive(Debug, Deserialize)]
pub struct IssueForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub title: Option<String>,
    pub assignees: Option<serde_yaml::Value>,
    pub labels: Option<serde_yaml::Value>,
    pub projects: Option<serde_yaml::Value>,
    pub body: Vec<serde_yaml::Value>,
}

/// One entry of the template `body` list, prior to normalization.
#[derive(Debug, Deserialize)]
pub struct FormField {
    #[serde(rename = "type")]
    pub field_type: String,
    pub id: Option<String>,
    #[serde(default)]
    pub attributes: FieldAttributes,
    pub validations: Option<FieldValidations>,
}

/// Only the attributes that shape a descriptor. `description`, `placeholder`,
/// `value` and `render` are presentational and skipped by serde, whatever their type.
#[derive(Debug, Default, Deserialize)]
pub struct FieldAttributes {
    pub label: Option<String>,
    pub multiple: Option<bool>,
    #[serde(default)]
    pub options: Vec<OptionEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FieldValidations {
    pub required: Option<bool>,
}

/// Checkboxes list `{label, required}` objects; dropdowns list scalars, which YAML
/// may type as numbers or booleans (`- 18`, `- true`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OptionEntry {
    Checkbox {
        label: serde_yaml::Value,
        required: Option<bool>,
    },
    Scalar(serde_yaml::Value),
}

impl OptionEntry {
    pub fn label(&self) -> String {
        match self {
            OptionEntry::Checkbox { label, .. } => scalar_to_string(label),
            OptionEntry::Scalar(value) => scalar_to_string(value),
        }
    }

    pub fn required(&self) -> bool {
        match self {
            OptionEntry::Checkbox { required, .. } => required.unwrap_or(false),
            OptionEntry::Scalar(_) => false,
        }
    }
}

/// Renders a YAML scalar the way it reads in the rendered issue.
fn scalar_to_string(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(text) => text.clone(),
        serde_yaml::Value::Number(number) => number.to_string(),
        serde_yaml::Value::Bool(flag) => flag.to_string(),
        serde_yaml::Value::Null => String::new(),
        other => serde_yaml::to_string(other)
            .map(|text| text.trim_end().to_string())
            .unwrap_or_default(),
    }
}
