// src/utils/error.rs
use thiserror::Error;

// Raised while normalizing an issue form template, before any issue body is read
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Issue template could not be parsed into an object.")]
    NotAnObject,

    #[error("Issue template is missing a body array property.")]
    MissingBody,

    #[error("Issue template is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error), // Syntax errors surface from serde_yaml

    #[error("Issue template field {index} is invalid: {reason}")]
    InvalidField { index: usize, reason: String },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormatError {
    #[error("Unknown field type: {0}")]
    UnknownFieldType(String),
}

// Everything `parse_issue` can fail with
#[derive(Error, Debug)]
pub enum ParseError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Format(#[from] FormatError),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Parsing failed: {0}")]
    Parse(#[from] ParseError),

    #[error("Template parsing failed: {0}")]
    Template(#[from] TemplateError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
