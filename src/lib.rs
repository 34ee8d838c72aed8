//! Extracts structured responses from GitHub issue form submissions.
//!
//! An issue body is the Markdown GitHub renders for a submitted issue form: one
//! `### <label>` heading per field followed by the response. Given the form's
//! YAML template, [`parse_issue`] maps each response to the field id and shapes
//! it by field type (text, dropdown selections, or checkbox states). Without a
//! template the headings themselves become keys.

pub mod extractors;
pub mod storage;
pub mod template;
pub mod utils;

pub use extractors::{
    extract_fields, extract_with_template, format_value, normalize_key, parse_issue, Checkboxes, FieldValue, ParseOptions, ParsedIssue,
};
pub use template::{parse_template, CheckboxOption, FieldDescriptor, FieldKind, Template};
pub use utils::error::{FormatError, ParseError, TemplateError};
