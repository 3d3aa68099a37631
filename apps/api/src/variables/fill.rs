//! Directive filler — substitutes supplied values back into template content.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use regex::Captures;

use crate::variables::DIRECTIVE_RE;

/// Canonical name of a directive body: text before the first `:` and `|`, trimmed.
fn directive_name(body: &str) -> &str {
    let name_part = body.split(':').next().unwrap_or_default();
    name_part.split('|').next().unwrap_or_default().trim()
}

fn supplied<'v>(values: &'v HashMap<String, String>, name: &str) -> Option<&'v str> {
    values
        .get(name)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
}

/// Replaces every `{{...}}` whose name has a non-empty value in `values`.
///
/// Directives without a value (absent or empty string) are left verbatim,
/// annotations included, so the result can be filled again later.
/// Returns `Cow::Borrowed` when the content has no directives.
pub fn fill_template<'a>(content: &'a str, values: &HashMap<String, String>) -> Cow<'a, str> {
    DIRECTIVE_RE.replace_all(content, |caps: &Captures| {
        let name = directive_name(&caps[1]);
        match supplied(values, name) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        }
    })
}

/// Names of directives in `content` that `values` does not fill, in first-seen order.
pub fn unfilled_variables(content: &str, values: &HashMap<String, String>) -> Vec<String> {
    let mut seen = HashSet::new();
    DIRECTIVE_RE
        .captures_iter(content)
        .filter_map(|cap| cap.get(1).map(|m| directive_name(m.as_str())))
        .filter(|name| supplied(values, name).is_none() && seen.insert(*name))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    const GREETING: &str = "Hi {{name}}, I am {{myName}}.";

    #[test]
    fn test_fill_all_values() {
        let out = fill_template(GREETING, &values(&[("name", "Alice"), ("myName", "Bob")]));
        assert_eq!(out, "Hi Alice, I am Bob.");
    }

    #[test]
    fn test_fill_partial_keeps_unmatched() {
        let out = fill_template(GREETING, &values(&[("name", "Alice")]));
        assert_eq!(out, "Hi Alice, I am {{myName}}.");
    }

    #[test]
    fn test_empty_value_leaves_directive() {
        let out = fill_template(GREETING, &values(&[("name", "")]));
        assert_eq!(out, GREETING);
    }

    #[test]
    fn test_no_directives_is_borrowed_and_unchanged() {
        let text = "Plain text with { single } braces";
        let out = fill_template(text, &HashMap::new());
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out, text);
    }

    #[test]
    fn test_annotations_preserved_when_unfilled() {
        let content = "Role: {{role:Job title|Engineer}} at {{company:Target company}}";
        let out = fill_template(content, &values(&[("company", "Acme")]));
        assert_eq!(out, "Role: {{role:Job title|Engineer}} at Acme");
    }

    #[test]
    fn test_annotated_directive_filled_by_name() {
        let out = fill_template(
            "{{ years | 3 }} years, {{stack:Tech stack}}",
            &values(&[("years", "5"), ("stack", "Rust")]),
        );
        assert_eq!(out, "5 years, Rust");
    }

    #[test]
    fn test_repeated_directive_filled_everywhere() {
        let out = fill_template("{{a}}-{{a:again}}-{{a}}", &values(&[("a", "x")]));
        assert_eq!(out, "x-x-x");
    }

    #[test]
    fn test_staged_filling() {
        let first = fill_template(GREETING, &values(&[("name", "Alice")])).into_owned();
        let second = fill_template(&first, &values(&[("myName", "Bob")]));
        assert_eq!(second, "Hi Alice, I am Bob.");
    }

    #[test]
    fn test_refill_is_noop_for_consumed_directives() {
        let vals = values(&[("name", "Alice"), ("myName", "Bob")]);
        let once = fill_template(GREETING, &vals).into_owned();
        let twice = fill_template(&once, &vals);
        assert_eq!(twice, once);
    }

    #[test]
    fn test_unfilled_lists_missing_names_once() {
        let content = "{{a}} {{b:desc}} {{a}} {{c|1}}";
        let missing = unfilled_variables(content, &values(&[("b", "x"), ("c", "")]));
        assert_eq!(missing, vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_unfilled_empty_without_directives() {
        assert!(unfilled_variables("nothing here", &HashMap::new()).is_empty());
    }
}
