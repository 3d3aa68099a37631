// Template variable engine.
// Scans `{{name:description|default}}` directives out of message text and fills them back in.
// Pure and synchronous — safe to call from any handler without coordination.

pub mod fill;
pub mod handlers;
pub mod parser;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub use fill::{fill_template, unfilled_variables};
pub use parser::{extract_variables, infer_variable_type, name_to_display_name};

/// Outer `{{...}}` capture shared by the parser and the filler.
/// Bodies cannot contain `}`; the regex engine matches in linear time.
pub(crate) static DIRECTIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("directive pattern is valid"));

/// Semantic type of a variable, used by clients to pick an input widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariableType {
    #[default]
    Text,
    Textarea,
    Select,
    Date,
    Url,
    Email,
    Phone,
    ResumeSelect,
}

/// A single directive parsed from template content.
/// Stored as part of the template's `variables` JSON column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateVariable {
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub default_value: Option<String>,
    #[serde(rename = "type")]
    pub variable_type: VariableType,
    pub is_required: bool,
    /// Zero-based index of first appearance in the content.
    pub order: usize,
}
