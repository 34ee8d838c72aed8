// src/template/mod.rs
pub mod field;
pub mod models;
pub mod parser;

pub use field::{CheckboxOption, FieldDescriptor, FieldKind, Template};
pub use parser::parse_template;
