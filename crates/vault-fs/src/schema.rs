//! Template schema extraction.
//!
//! A template document's frontmatter defines the schema that target
//! documents are reconciled against: the set of top-level keys, the order
//! they appear in, and a default value per key where the template provides
//! one.
//!
//! Extraction is deliberately line-based rather than a full YAML parse:
//! YAML mappings have no native ordering guarantee once parsed, and the
//! key order in the template text is exactly what reconciliation must
//! reproduce.

use std::collections::HashMap;

use serde_yaml::Value;

use crate::frontmatter::split_frontmatter;

/// Schema derived from a template document's frontmatter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    /// Top-level keys in the order they appear in the template.
    pub ordered_keys: Vec<String>,
    /// Default value per key, where the template line carries one.
    ///
    /// A key may have no default. Reconciliation then materializes no
    /// value for it rather than inventing one.
    pub defaults: HashMap<String, Value>,
}

impl Schema {
    /// A schema with no keys enforces nothing.
    pub fn is_empty(&self) -> bool {
        self.ordered_keys.is_empty()
    }
}

/// Extract a schema from a template document's raw text.
///
/// Returns an empty schema when the text has no frontmatter block. Callers
/// must treat that as "nothing to enforce", not an error.
///
/// Within the block, a line contributes a top-level key iff it is
/// non-empty, not indented, not a list-item line, and contains a `:`
/// separator. Nested and multi-line values are unsupported; such lines are
/// skipped.
pub fn extract_schema(template_text: &str) -> Schema {
    let (yaml, _body) = split_frontmatter(template_text);
    let Some(yaml) = yaml else {
        return Schema::default();
    };

    let mut ordered_keys = Vec::new();
    let mut defaults = HashMap::new();

    for line in yaml.lines() {
        // Skip empty lines and list items
        if line.is_empty() || line.starts_with("  -") {
            continue;
        }

        // Top-level keys only (not indented)
        if line.starts_with(' ') {
            continue;
        }

        let Some(idx) = line.find(':') else {
            continue;
        };

        let key = line[..idx].trim().to_string();

        // First appearance wins for duplicate keys
        if defaults.contains_key(&key) {
            continue;
        }

        let value = parse_scalar(line[idx + 1..].trim());
        defaults.insert(key.clone(), value);
        ordered_keys.push(key);
    }

    Schema {
        ordered_keys,
        defaults,
    }
}

/// Best-effort scalar parse for a template default.
///
/// Empty value becomes an empty string, a fully double-quoted value is
/// unwrapped, a numeric literal becomes a number, anything else stays a
/// raw trimmed string.
fn parse_scalar(value: &str) -> Value {
    if value.is_empty() {
        return Value::String(String::new());
    }

    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        return Value::String(value[1..value.len() - 1].to_string());
    }

    if let Ok(n) = value.parse::<i64>() {
        return Value::from(n);
    }
    if let Ok(f) = value.parse::<f64>() {
        return Value::from(f);
    }

    Value::String(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markerless_text_yields_empty_schema() {
        let schema = extract_schema("no marker here");
        assert!(schema.ordered_keys.is_empty());
        assert!(schema.defaults.is_empty());
    }

    #[test]
    fn unclosed_block_yields_empty_schema() {
        let schema = extract_schema("---\ntitle: x\nno closing marker");
        assert!(schema.is_empty());
    }

    #[test]
    fn keys_come_out_in_template_order() {
        let text = "---\ntitle: \nstatus: draft\nrating: 5\n---\nBody";
        let schema = extract_schema(text);
        assert_eq!(schema.ordered_keys, vec!["title", "status", "rating"]);
    }

    #[test]
    fn indented_and_list_lines_are_skipped() {
        let text = "---\ntags:\n  - one\n  - two\n  nested: value\nstatus: draft\n---\n";
        let schema = extract_schema(text);
        assert_eq!(schema.ordered_keys, vec!["tags", "status"]);
    }

    #[test]
    fn lines_without_separator_are_skipped() {
        let text = "---\ntitle: x\nnot a key line\n---\n";
        let schema = extract_schema(text);
        assert_eq!(schema.ordered_keys, vec!["title"]);
    }

    #[test]
    fn empty_value_defaults_to_empty_string() {
        let schema = extract_schema("---\ntitle:\n---\n");
        assert_eq!(
            schema.defaults.get("title"),
            Some(&Value::String(String::new()))
        );
    }

    #[test]
    fn quoted_value_is_unwrapped() {
        let schema = extract_schema("---\nstatus: \"draft\"\n---\n");
        assert_eq!(
            schema.defaults.get("status"),
            Some(&Value::String("draft".to_string()))
        );
    }

    #[test]
    fn numeric_values_parse_as_numbers() {
        let schema = extract_schema("---\nrating: 5\nweight: 2.5\n---\n");
        assert_eq!(schema.defaults.get("rating"), Some(&Value::from(5)));
        assert_eq!(schema.defaults.get("weight"), Some(&Value::from(2.5)));
    }

    #[test]
    fn other_values_stay_raw_strings() {
        let schema = extract_schema("---\nkind: resource link\n---\n");
        assert_eq!(
            schema.defaults.get("kind"),
            Some(&Value::String("resource link".to_string()))
        );
    }

    #[test]
    fn duplicate_keys_keep_first_appearance() {
        let schema = extract_schema("---\ntitle: first\nstatus: draft\ntitle: second\n---\n");
        assert_eq!(schema.ordered_keys, vec!["title", "status"]);
        assert_eq!(
            schema.defaults.get("title"),
            Some(&Value::String("first".to_string()))
        );
    }

    #[test]
    fn extraction_is_deterministic() {
        let text = "---\na: 1\nb: 2\n---\nBody";
        assert_eq!(extract_schema(text), extract_schema(text));
    }

    #[test]
    fn keys_keep_their_order_across_blank_lines() {
        let text = "---\nfirst: 1\n\nsecond: 2\n---\n";
        let schema = extract_schema(text);
        assert_eq!(schema.ordered_keys, vec!["first", "second"]);
    }
}
