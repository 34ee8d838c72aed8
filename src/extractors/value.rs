// src/extractors/value.rs
use crate::template::{FieldDescriptor, FieldKind};
use crate::utils::error::FormatError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

// Responses GitHub renders when a field was left blank (compared case-insensitively)
const NO_RESPONSE: &str = "_no response_";
const NONE_RESPONSE: &str = "none";

static CHECKED_ITEM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^-\s\[x\]\s").expect("Failed to compile CHECKED_ITEM_RE")
});

static UNCHECKED_ITEM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"-\s\[\s\]\s").expect("Failed to compile UNCHECKED_ITEM_RE")
});

static DROPDOWN_SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r", *").expect("Failed to compile DROPDOWN_SEPARATOR_RE")
});

/// Checkbox items split by state, each list in the order the items appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Checkboxes {
    pub selected: Vec<String>,
    pub unselected: Vec<String>,
}

/// A formatted response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Checkboxes(Checkboxes),
    /// The respondent gave no answer to an input or textarea.
    Absent,
}

impl FieldValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// True for the blank, `None` and `_No response_` placeholders.
pub fn is_empty_response(value: &str) -> bool {
    value.is_empty()
        || value.eq_ignore_ascii_case(NONE_RESPONSE)
        || value.eq_ignore_ascii_case(NO_RESPONSE)
}

/// Trims, drops carriage returns, then strips leading and trailing blank lines.
fn clean(raw: &str) -> String {
    raw.trim().replace('\r', "").trim_matches('\n').to_string()
}

/// Shapes a raw section body according to the field it answers.
///
/// Without a field the cleaned text is returned as-is. Fails only for a field
/// whose template `type` was not recognized.
pub fn format_value(raw: &str, field: Option<&FieldDescriptor>) -> Result<FieldValue, FormatError> {
    let value = clean(raw);

    let Some(field) = field else {
        return Ok(FieldValue::Text(value));
    };

    match &field.kind {
        FieldKind::Input | FieldKind::Textarea => {
            if is_empty_response(&value) {
                Ok(FieldValue::Absent)
            } else {
                Ok(FieldValue::Text(value))
            }
        }
        FieldKind::Dropdown { .. } => {
            if is_empty_response(&value) {
                return Ok(FieldValue::List(Vec::new()));
            }
            let selections = DROPDOWN_SEPARATOR_RE
                .split(&value)
                .map(str::to_string)
                .collect();
            Ok(FieldValue::List(selections))
        }
        FieldKind::Checkboxes { .. } => {
            let mut checkboxes = Checkboxes::default();
            if is_empty_response(&value) {
                return Ok(FieldValue::Checkboxes(checkboxes));
            }

            for line in value.split('\n') {
                let line = line.trim();
                if CHECKED_ITEM_RE.is_match(line) {
                    checkboxes.selected.push(CHECKED_ITEM_RE.replace(line, "").into_owned());
                } else {
                    checkboxes.unselected.push(UNCHECKED_ITEM_RE.replace(line, "").into_owned());
                }
            }

            tracing::trace!(
                "Field '{}': {} selected, {} unselected",
                field.key,
                checkboxes.selected.len(),
                checkboxes.unselected.len()
            );
            Ok(FieldValue::Checkboxes(checkboxes))
        }
        FieldKind::Unrecognized(field_type) => {
            tracing::error!("Field '{}' has unknown type '{}'", field.key, field_type);
            Err(FormatError::UnknownFieldType(field_type.clone()))
        }
    }
}
