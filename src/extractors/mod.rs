// src/extractors/mod.rs
pub mod keys;
pub mod section;
pub mod value;

// Re-export key extraction types for convenience
pub use keys::normalize_key;
pub use section::{
    consolidate_sections,
    extract_fields,
    extract_with_template,
    parse_issue,
    segment_sections,
    ExtractedSection,
    ParseOptions,
    ParsedIssue,
    Section,
};
pub use value::{format_value, is_empty_response, Checkboxes, FieldValue};
