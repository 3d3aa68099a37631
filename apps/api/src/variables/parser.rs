//! Directive parser — turns `{{...}}` markers into `TemplateVariable` records.
//!
//! Grammar:
//! ```text
//! directive := "{{" body "}}"
//! body      := name_part [ ":" desc_part ]
//! name_part := name [ "|" default ]
//! desc_part := description [ "|" default ]
//! ```
//! Only the first two `:` segments are significant. A `|` anywhere marks the
//! variable optional, even when the default itself is empty.

use std::collections::HashSet;

use crate::variables::{TemplateVariable, VariableType, DIRECTIVE_RE};

/// Raw pieces of one directive body before type inference.
#[derive(Debug, PartialEq)]
struct DirectiveParts<'a> {
    name: &'a str,
    description: Option<&'a str>,
    default_value: Option<&'a str>,
    has_default_syntax: bool,
}

fn split_directive(body: &str) -> DirectiveParts<'_> {
    let raw = body.trim();
    let mut segments = raw.split(':');
    let name_part = segments.next().unwrap_or_default();
    let desc_part = segments.next();

    let mut name = name_part;
    let mut description = None;
    let mut default_value = None;
    let mut has_default_syntax = false;

    if name_part.contains('|') {
        let mut pieces = name_part.split('|');
        name = pieces.next().unwrap_or_default();
        default_value = pieces.next();
        has_default_syntax = true;
    }

    match desc_part {
        Some(desc) if desc.contains('|') => {
            let mut pieces = desc.split('|');
            description = pieces.next().filter(|d| !d.is_empty());
            default_value = pieces.next();
            has_default_syntax = true;
        }
        Some(desc) if !desc.is_empty() => description = Some(desc),
        _ => {}
    }

    DirectiveParts {
        name: name.trim(),
        description,
        default_value,
        has_default_syntax,
    }
}

/// Extracts the distinct variables of `content` in first-appearance order.
///
/// Repeated names keep the metadata of their first occurrence. Text that does
/// not form a complete `{{...}}` directive is ignored.
pub fn extract_variables(content: &str) -> Vec<TemplateVariable> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut variables = Vec::new();

    for cap in DIRECTIVE_RE.captures_iter(content) {
        let Some(body) = cap.get(1) else { continue };
        let parts = split_directive(body.as_str());

        if !seen.insert(parts.name) {
            continue;
        }

        variables.push(TemplateVariable {
            name: parts.name.to_string(),
            display_name: name_to_display_name(parts.name),
            description: parts.description.map(str::to_string),
            default_value: parts.default_value.map(str::to_string),
            variable_type: infer_variable_type(parts.name),
            is_required: !parts.has_default_syntax,
            order: variables.len(),
        });
    }

    variables
}

/// Humanizes an identifier: `firstName` → `First Name`, `company_name` → `Company Name`.
pub fn name_to_display_name(name: &str) -> String {
    let mut spaced = String::with_capacity(name.len() + 8);
    for c in name.chars() {
        match c {
            c if c.is_ascii_uppercase() => {
                spaced.push(' ');
                spaced.push(c);
            }
            '_' | '-' => spaced.push(' '),
            c => spaced.push(c),
        }
    }

    spaced
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Infers a variable's type from substrings of its name, first match wins.
pub fn infer_variable_type(name: &str) -> VariableType {
    let lower = name.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

    if has(&["email"]) {
        VariableType::Email
    } else if has(&["phone"]) {
        VariableType::Phone
    } else if has(&["url", "link", "website"]) {
        VariableType::Url
    } else if has(&["date"]) {
        VariableType::Date
    } else if has(&["resume"]) {
        VariableType::ResumeSelect
    } else if has(&["description", "bio", "summary"]) {
        VariableType::Textarea
    } else {
        VariableType::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_directives_yields_empty() {
        assert!(extract_variables("Hello there, no placeholders here.").is_empty());
        assert!(extract_variables("").is_empty());
    }

    #[test]
    fn test_plain_directive_is_required() {
        let vars = extract_variables("Hi {{x}}");
        assert_eq!(vars.len(), 1);
        assert_eq!(vars[0].name, "x");
        assert!(vars[0].is_required);
        assert_eq!(vars[0].default_value, None);
        assert_eq!(vars[0].description, None);
    }

    #[test]
    fn test_name_default_is_optional() {
        let vars = extract_variables("{{x|5}}");
        assert!(!vars[0].is_required);
        assert_eq!(vars[0].default_value.as_deref(), Some("5"));
    }

    #[test]
    fn test_description_only_stays_required() {
        let vars = extract_variables("{{x:desc}}");
        assert!(vars[0].is_required);
        assert_eq!(vars[0].description.as_deref(), Some("desc"));
        assert_eq!(vars[0].default_value, None);
    }

    #[test]
    fn test_description_with_default() {
        let vars = extract_variables("{{x:desc|5}}");
        assert!(!vars[0].is_required);
        assert_eq!(vars[0].description.as_deref(), Some("desc"));
        assert_eq!(vars[0].default_value.as_deref(), Some("5"));
    }

    #[test]
    fn test_empty_default_still_optional() {
        let vars = extract_variables("{{x|}}");
        assert!(!vars[0].is_required);
        assert_eq!(vars[0].default_value.as_deref(), Some(""));
    }

    #[test]
    fn test_description_default_overrides_name_default() {
        let vars = extract_variables("{{x|a:desc|b}}");
        assert_eq!(vars[0].name, "x");
        assert_eq!(vars[0].description.as_deref(), Some("desc"));
        assert_eq!(vars[0].default_value.as_deref(), Some("b"));
    }

    #[test]
    fn test_third_colon_segment_is_discarded() {
        let vars = extract_variables("{{meeting:time: 3pm}}");
        assert_eq!(vars[0].name, "meeting");
        assert_eq!(vars[0].description.as_deref(), Some("time"));
    }

    #[test]
    fn test_name_is_trimmed() {
        let vars = extract_variables("{{  company  }} and {{ role :Job title}}");
        assert_eq!(vars[0].name, "company");
        assert_eq!(vars[1].name, "role");
        assert_eq!(vars[1].description.as_deref(), Some("Job title"));
    }

    #[test]
    fn test_duplicates_keep_first_metadata() {
        let vars = extract_variables("{{name:First}} then {{name:Second|x}} and {{other}}");
        assert_eq!(vars.len(), 2);
        assert_eq!(vars[0].description.as_deref(), Some("First"));
        assert!(vars[0].is_required);
        assert_eq!(vars[1].name, "other");
    }

    #[test]
    fn test_order_follows_first_appearance() {
        let vars = extract_variables("{{b}} {{a}} {{b}} {{c}}");
        let names: Vec<_> = vars.iter().map(|v| (v.name.as_str(), v.order)).collect();
        assert_eq!(names, vec![("b", 0), ("a", 1), ("c", 2)]);
    }

    #[test]
    fn test_unmatched_braces_are_literal() {
        assert!(extract_variables("{{open and never closed").is_empty());
        assert!(extract_variables("{single} }} {{").is_empty());
        assert!(extract_variables("{{}}").is_empty());
    }

    #[test]
    fn test_long_unclosed_input_terminates() {
        let adversarial = "{{".repeat(5_000);
        assert!(extract_variables(&adversarial).is_empty());
    }

    #[test]
    fn test_type_inference_examples() {
        assert_eq!(extract_variables("{{userEmail}}")[0].variable_type, VariableType::Email);
        assert_eq!(extract_variables("{{bio}}")[0].variable_type, VariableType::Textarea);
        assert_eq!(extract_variables("{{firstName}}")[0].variable_type, VariableType::Text);
        assert_eq!(
            extract_variables("{{resumeFile}}")[0].variable_type,
            VariableType::ResumeSelect
        );
    }

    #[test]
    fn test_type_inference_priority() {
        // email beats url, phone beats date
        assert_eq!(infer_variable_type("emailLink"), VariableType::Email);
        assert_eq!(infer_variable_type("phoneUpdateDate"), VariableType::Phone);
        assert_eq!(infer_variable_type("LinkedInProfile"), VariableType::Url);
        assert_eq!(infer_variable_type("companyWebsite"), VariableType::Url);
        assert_eq!(infer_variable_type("startDate"), VariableType::Date);
        assert_eq!(infer_variable_type("resume_summary"), VariableType::ResumeSelect);
        assert_eq!(infer_variable_type("jobDescription"), VariableType::Textarea);
        assert_eq!(infer_variable_type("SUMMARY"), VariableType::Textarea);
    }

    #[test]
    fn test_display_name_examples() {
        assert_eq!(name_to_display_name("firstName"), "First Name");
        assert_eq!(name_to_display_name("company_name"), "Company Name");
        assert_eq!(name_to_display_name("hiring-manager"), "Hiring Manager");
        assert_eq!(name_to_display_name("URL"), "U R L");
        assert_eq!(name_to_display_name("__weird__NAME"), "Weird N A M E");
        assert_eq!(name_to_display_name("ROLE"), "R O L E");
        assert_eq!(name_to_display_name("already spaced"), "Already Spaced");
    }

    #[test]
    fn test_display_name_attached_to_variable() {
        let vars = extract_variables("{{hiringManager}}");
        assert_eq!(vars[0].display_name, "Hiring Manager");
    }

    #[test]
    fn test_variable_serializes_type_field() {
        let vars = extract_variables("{{resumeLink:Your resume|see attached}}");
        let json = serde_json::to_value(&vars[0]).unwrap();
        assert_eq!(json["type"], "URL");
        assert_eq!(json["is_required"], false);
        assert_eq!(json["default_value"], "see attached");
        assert_eq!(json["display_name"], "Resume Link");

        let json = serde_json::to_value(&extract_variables("{{resume}}")[0]).unwrap();
        assert_eq!(json["type"], "RESUME_SELECT");
    }
}
