// src/template/parser.rs
use crate::extractors::keys::normalize_key;
use crate::template::field::{CheckboxOption, FieldDescriptor, FieldKind, Template};
use crate::template::models::{FormField, IssueForm};
use crate::utils::error::TemplateError;

const MARKDOWN_TYPE: &str = "markdown";

/// Parses an issue form template (YAML) into a [`Template`] keyed by field id.
///
/// `None` or an empty string yields an empty template, which makes
/// [`parse_issue`](crate::parse_issue) fall back to headings as keys.
/// Markdown entries are skipped; unrecognized field types are kept and only
/// rejected when a response for them is formatted.
pub fn parse_template(template: Option<&str>) -> Result<Template, TemplateError> {
    let Some(source) = template.filter(|t| !t.is_empty()) else {
        return Ok(Template::new());
    };

    let document: serde_yaml::Value = serde_yaml::from_str(source)?;
    let mapping = document.as_mapping().ok_or(TemplateError::NotAnObject)?;

    match mapping.get("body") {
        Some(serde_yaml::Value::Sequence(_)) => {}
        _ => return Err(TemplateError::MissingBody),
    }

    let form: IssueForm = serde_yaml::from_value(document)?;
    tracing::debug!(
        "Parsing issue form template {:?} with {} body entries",
        form.name.as_deref().unwrap_or("<unnamed>"),
        form.body.len()
    );

    let mut parsed = Template::new();
    for (index, entry) in form.body.into_iter().enumerate() {
        let field: FormField = serde_yaml::from_value(entry).map_err(|e| TemplateError::InvalidField {
            index,
            reason: e.to_string(),
        })?;

        if field.field_type == MARKDOWN_TYPE {
            tracing::trace!("Skipping markdown entry {}", index);
            continue;
        }

        parsed.insert(normalize_field(index, field)?);
    }

    tracing::debug!("Template normalized to {} fields", parsed.len());
    Ok(parsed)
}

fn normalize_field(index: usize, field: FormField) -> Result<FieldDescriptor, TemplateError> {
    let label = field.attributes.label.ok_or_else(|| TemplateError::InvalidField {
        index,
        reason: format!("{} field is missing attributes.label", field.field_type),
    })?;

    let key = match field.id {
        Some(id) if !id.is_empty() => id,
        _ => normalize_key(&label),
    };

    let options = field.attributes.options;
    let kind = match field.field_type.as_str() {
        "input" => FieldKind::Input,
        "textarea" => FieldKind::Textarea,
        "dropdown" => FieldKind::Dropdown {
            multiple: field.attributes.multiple.unwrap_or(false),
            options: options.iter().map(|o| o.label()).collect(),
        },
        "checkboxes" => FieldKind::Checkboxes {
            options: options
                .iter()
                .map(|o| CheckboxOption { label: o.label(), required: o.required() })
                .collect(),
        },
        other => {
            tracing::warn!("Field '{}' declares unrecognized type '{}'", key, other);
            FieldKind::Unrecognized(other.to_string())
        }
    };

    Ok(FieldDescriptor {
        key,
        label,
        required: field.validations.and_then(|v| v.required).unwrap_or(false),
        kind,
    })
}
