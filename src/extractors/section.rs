// src/extractors/section.rs

// --- Imports ---
use crate::extractors::keys::normalize_key;
use crate::extractors::value::{format_value, FieldValue};
use crate::template::{parse_template, Template};
use crate::utils::error::{FormatError, ParseError};
use serde::ser::{Serialize, SerializeMap, Serializer};

// --- Constants ---
// Level-3 heading marker; GitHub renders every issue form field under one
const HEADING_MARKER: &str = "###";

// --- Data Structures ---

/// A heading and its body as they appear in the issue, before any template matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section<'a> {
    pub heading: &'a str,
    pub body: &'a str,
    /// Marker through end of body, used when the section is folded into its predecessor.
    pub raw: &'a str,
}

/// A section accepted as a field response, with any continuation sections folded into its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSection {
    pub heading: String,
    pub body: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Slugify headings into keys when no template is given.
    pub slugify: bool,
}

/// Field key -> formatted response, in issue order.
///
/// Re-inserting a key overwrites its value but keeps its original position.
/// Absent responses are kept in memory and omitted from serialized output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedIssue {
    entries: Vec<(String, FieldValue)>,
}

impl ParsedIssue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: String, value: FieldValue) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => {
                tracing::debug!("Key '{}' resolved more than once; last value wins", key);
                *existing = value;
            }
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ParsedIssue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in self.entries.iter().filter(|(_, v)| !v.is_absent()) {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

// --- Segmentation ---

/// Splits an issue body into `###` sections, in document order.
///
/// Sections with an empty heading or an empty body are dropped.
pub fn segment_sections(issue: &str) -> Vec<Section<'_>> {
    let mut sections = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = issue[cursor..].find(HEADING_MARKER) {
        let start = cursor + offset;
        let Some(section) = section_at(issue, start) else {
            // The marker is ASCII, so start + 1 is a char boundary
            cursor = start + 1;
            continue;
        };
        cursor = start + section.raw.len();

        if section.heading.is_empty() || section.body.is_empty() {
            tracing::trace!("Dropping malformed section at byte {}: heading {:?}", start, section.heading);
            continue;
        }
        sections.push(section);
    }

    tracing::debug!("Segmented issue into {} sections", sections.len());
    sections
}

/// Reads the section whose marker starts at `start`.
/// `None` when the heading line is not followed by a line break.
fn section_at(issue: &str, start: usize) -> Option<Section<'_>> {
    let after_marker = &issue[start + HEADING_MARKER.len()..];
    let heading_text = after_marker.trim_start_matches(' ');
    let heading_start = issue.len() - heading_text.len();

    let line_len = heading_text.find(is_line_break)?;
    let heading = heading_text[..line_len].trim_end();

    // The body starts after the last line break of the whitespace following the heading
    let trailing = &issue[heading_start + heading.len()..];
    let gap = &trailing[..trailing.len() - trailing.trim_start().len()];
    let last_break = gap.rfind(is_line_break)?;
    let body_start = heading_start + heading.len() + last_break + 1;

    let body_end = body_start + body_len(&issue[body_start..]);

    Some(Section {
        heading,
        body: &issue[body_start..body_end],
        raw: &issue[start..body_end],
    })
}

/// A body runs until the next marker (optionally preceded by a newline) or the end
/// of the issue, not counting a single trailing newline.
fn body_len(text: &str) -> usize {
    text.char_indices()
        .map(|(index, _)| index)
        .find(|&index| {
            let rest = &text[index..];
            rest.starts_with(HEADING_MARKER)
                || (rest.starts_with('\n') && rest[1..].starts_with(HEADING_MARKER))
                || rest == "\n"
        })
        .unwrap_or(text.len())
}

fn is_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}

// --- Correlation ---

/// Keeps sections whose heading is a template label and folds every other
/// section, marker and heading included, into the most recently kept one.
/// Unmatched sections before the first kept one are dropped.
pub fn consolidate_sections(sections: &[Section<'_>], template: &Template) -> Vec<ExtractedSection> {
    let mut accepted: Vec<ExtractedSection> = Vec::new();

    for section in sections {
        if template.find_by_label(section.heading).is_some() {
            accepted.push(ExtractedSection {
                heading: section.heading.to_string(),
                body: section.body.to_string(),
            });
            continue;
        }

        match accepted.last_mut() {
            Some(previous) => {
                tracing::trace!("Appending section {:?} to {:?}", section.heading, previous.heading);
                previous.body.push('\n');
                previous.body.push_str(section.raw);
            }
            None => {
                tracing::debug!("Dropping section {:?}: no template field precedes it", section.heading);
            }
        }
    }

    accepted
}

// --- Extraction ---

/// Extracts responses from an issue body using an already parsed template.
///
/// With a template, keys come from field ids and values are shaped by field type.
/// Without one, headings (slugified when `options.slugify` is set) become keys
/// and bodies are returned as cleaned text.
pub fn extract_fields(
    issue: &str,
    template: Option<&Template>,
    options: ParseOptions,
) -> Result<ParsedIssue, FormatError> {
    let sections = segment_sections(issue);
    let mut parsed = ParsedIssue::new();

    match template {
        Some(template) => {
            for section in consolidate_sections(&sections, template) {
                let key = template
                    .find_by_label(&section.heading)
                    .map(|field| field.key.clone())
                    .unwrap_or(section.heading);
                let value = format_value(&section.body, template.get(&key))?;
                parsed.insert(key, value);
            }
        }
        None => {
            for section in sections {
                let key = if options.slugify {
                    normalize_key(section.heading)
                } else {
                    section.heading.to_string()
                };
                parsed.insert(key, format_value(section.body, None)?);
            }
        }
    }

    tracing::debug!("Extracted {} fields", parsed.len());
    Ok(parsed)
}

/// Extracts responses given both the template text and its parsed form.
///
/// Template mode applies whenever `template_source` is a non-empty string, even
/// if it normalized to no fields; otherwise headings become keys.
pub fn extract_with_template(
    issue: &str,
    template_source: Option<&str>,
    template: &Template,
    options: ParseOptions,
) -> Result<ParsedIssue, FormatError> {
    let active = template_source
        .filter(|source| !source.is_empty())
        .map(|_| template);
    extract_fields(issue, active, options)
}

/// Parses an issue body (Markdown) into field responses, optionally guided by an
/// issue form template (YAML).
pub fn parse_issue(
    issue: &str,
    template: Option<&str>,
    options: ParseOptions,
) -> Result<ParsedIssue, ParseError> {
    let parsed_template = parse_template(template)?;
    Ok(extract_with_template(issue, template, &parsed_template, options)?)
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{FieldDescriptor, FieldKind};

    fn template(fields: &[(&str, &str, FieldKind)]) -> Template {
        let mut template = Template::new();
        for (key, label, kind) in fields {
            template.insert(FieldDescriptor {
                key: key.to_string(),
                label: label.to_string(),
                required: false,
                kind: kind.clone(),
            });
        }
        template
    }

    #[test]
    fn test_segments_headings_and_bodies() {
        let issue = "### First\n\nalpha\n\n### Second\r\n\r\nbeta\ngamma\n";
        let sections = segment_sections(issue);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].heading, "First");
        assert_eq!(sections[0].body, "alpha\n");
        assert_eq!(sections[0].raw, "### First\n\nalpha\n");
        assert_eq!(sections[1].heading, "Second");
        assert_eq!(sections[1].body, "beta\ngamma");
    }

    #[test]
    fn test_heading_trailing_whitespace_trimmed() {
        let sections = segment_sections("###   Spaced Out   \n  indented body");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].heading, "Spaced Out");
        assert_eq!(sections[0].body, "  indented body");
    }

    #[test]
    fn test_drops_malformed_sections() {
        // Empty heading, empty body, and a heading with no line after it
        let issue = "###\norphan\n### Empty\n### Kept\nvalue\n### Dangling";
        let sections = segment_sections(issue);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].heading, "Kept");
        assert_eq!(sections[0].body, "value");
    }

    #[test]
    fn test_marker_matches_inside_deeper_headings_and_lines() {
        let sections = segment_sections("#### Deep\nbody ### inline\nmore\n");
        let pairs: Vec<(&str, &str)> = sections.iter().map(|s| (s.heading, s.body)).collect();
        assert_eq!(pairs, vec![("# Deep", "body "), ("inline", "more")]);
        assert_eq!(sections[0].raw, "#### Deep\nbody ");
    }

    #[test]
    fn test_empty_template_source_uses_headings() {
        let empty = Template::new();
        let issue = "### Name\nOcto";

        let headings = extract_with_template(issue, Some(""), &empty, ParseOptions::default()).unwrap();
        assert_eq!(headings.get("Name"), Some(&FieldValue::Text("Octo".into())));

        // A template with no fields still selects template mode, so nothing matches
        let templated = extract_with_template(issue, Some("body: []"), &empty, ParseOptions::default()).unwrap();
        assert!(templated.is_empty());
    }

    #[test]
    fn test_other_heading_levels_stay_in_body() {
        let sections = segment_sections("### Notes\n## Not a field\n# Nor this\nend");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].body, "## Not a field\n# Nor this\nend");
    }

    #[test]
    fn test_no_sections() {
        assert!(segment_sections("").is_empty());
        assert!(segment_sections("Just text, no headings.").is_empty());
    }

    #[test]
    fn test_consolidation_merges_unmatched_sections() {
        let template = template(&[("desc", "Description", FieldKind::Textarea), ("os", "OS", FieldKind::Input)]);
        let issue = "### Title\nignored\n### Description\nHello\n### Extra\nmore\n### OS\nLinux";
        let sections = segment_sections(issue);
        let merged = consolidate_sections(&sections, &template);

        assert_eq!(
            merged,
            vec![
                ExtractedSection { heading: "Description".into(), body: "Hello\n### Extra\nmore".into() },
                ExtractedSection { heading: "OS".into(), body: "Linux".into() },
            ]
        );
    }

    #[test]
    fn test_round_trip_with_id() {
        let template = template(&[("desc", "Description", FieldKind::Textarea)]);
        let parsed = extract_fields("### Description\nHello\nWorld", Some(&template), ParseOptions::default()).unwrap();

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.get("desc"), Some(&FieldValue::Text("Hello\nWorld".into())));
    }

    #[test]
    fn test_without_template_uses_headings() {
        let issue = "### The Name\nThing\n\n### Other Field!\n_No response_\n";
        let parsed = extract_fields(issue, None, ParseOptions::default()).unwrap();
        let keys: Vec<&str> = parsed.keys().collect();
        assert_eq!(keys, vec!["The Name", "Other Field!"]);
        assert_eq!(parsed.get("Other Field!"), Some(&FieldValue::Text("_No response_".into())));

        let slugged = extract_fields(issue, None, ParseOptions { slugify: true }).unwrap();
        let keys: Vec<&str> = slugged.keys().collect();
        assert_eq!(keys, vec!["the_name", "other_field"]);
    }

    #[test]
    fn test_duplicate_keys_last_write_wins() {
        let parsed = extract_fields("### A\none\n### A\ntwo\n### B\nthree", None, ParseOptions::default()).unwrap();
        let entries: Vec<(&str, &FieldValue)> = parsed.iter().collect();
        assert_eq!(
            entries,
            vec![("A", &FieldValue::Text("two".into())), ("B", &FieldValue::Text("three".into()))]
        );
    }

    #[test]
    fn test_unknown_type_propagates() {
        let template = template(&[("odd", "Odd", FieldKind::Unrecognized("bogus".into()))]);
        let err = extract_fields("### Odd\nvalue", Some(&template), ParseOptions::default()).unwrap_err();
        assert_eq!(err, FormatError::UnknownFieldType("bogus".into()));
    }

    #[test]
    fn test_absent_values_omitted_from_json() {
        let template = template(&[("name", "Name", FieldKind::Input), ("notes", "Notes", FieldKind::Textarea)]);
        let parsed = extract_fields("### Name\nOcto\n### Notes\n_No response_", Some(&template), ParseOptions::default()).unwrap();

        assert_eq!(parsed.get("notes"), Some(&FieldValue::Absent));
        assert_eq!(serde_json::to_string(&parsed).unwrap(), r#"{"name":"Octo"}"#);
    }

    #[test]
    fn test_parse_issue_rejects_bad_template() {
        let err = parse_issue("### A\nb", Some("title: Test"), ParseOptions::default()).unwrap_err();
        assert!(matches!(err, ParseError::Template(_)));
    }
}
