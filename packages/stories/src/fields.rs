//! Pending field bookkeeping for the next resource a scenario creates.
//!
//! Feature files supply every value as text. The service types some fields as
//! BOOLEAN, so those are coerced when the payload is built for a normal create;
//! the raw form keeps everything as strings to exercise validation.

use std::collections::BTreeMap;

use cucumber::gherkin::Table;
use serde_json::{Map, Value};

/// Field name to string value, ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingFields {
    fields: BTreeMap<String, String>,
}

impl PendingFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(title: impl Into<String>) -> Self {
        let mut fields = Self::new();
        fields.insert("title", title);
        fields
    }

    pub fn from_title_description(
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let mut fields = Self::with_title(title);
        fields.insert("description", description);
        fields
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Add rows of a `| field | value |` table.
    ///
    /// The first row is a header naming the `field` and `value` columns. A table
    /// whose first row names neither is read as headerless key/value pairs.
    /// Returns the number of fields added.
    pub fn extend_from_rows(&mut self, rows: &[Vec<String>]) -> usize {
        let Some(first) = rows.first() else {
            return 0;
        };

        let column = |name: &str| first.iter().position(|c| c.trim() == name);
        let (key_col, value_col, data) = match (column("field"), column("value")) {
            (Some(k), Some(v)) => (k, v, &rows[1..]),
            _ => (0, 1, rows),
        };

        let mut added = 0;
        for row in data {
            if let (Some(key), Some(value)) = (row.get(key_col), row.get(value_col)) {
                self.insert(key.trim(), value.trim());
                added += 1;
            }
        }
        added
    }

    pub fn extend_from_table(&mut self, table: &Table) -> usize {
        self.extend_from_rows(&table.rows)
    }

    /// JSON object with the named fields coerced to booleans.
    pub fn to_json(&self, boolean_fields: &[&str]) -> Value {
        let object: Map<String, Value> = self
            .fields
            .iter()
            .map(|(k, v)| {
                let value = if boolean_fields.contains(&k.as_str()) {
                    Value::Bool(parse_permissive_bool(v))
                } else {
                    Value::String(v.clone())
                };
                (k.clone(), value)
            })
            .collect();
        Value::Object(object)
    }

    /// JSON object with every value left as a string.
    pub fn to_raw_json(&self) -> Value {
        self.to_json(&[])
    }
}

/// `true` only for a case-insensitive `"true"`; anything else is `false`.
pub fn parse_permissive_bool(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::panic, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn rows(cells: &[&[&str]]) -> Vec<Vec<String>> {
        cells
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_title_and_description() {
        let fields = PendingFields::from_title_description("Office Work", "Paperwork");
        assert_eq!(fields.get("title"), Some("Office Work"));
        assert_eq!(fields.get("description"), Some("Paperwork"));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_extend_from_table_with_header() {
        let mut fields = PendingFields::with_title("Home");
        let added = fields.extend_from_rows(&rows(&[
            &["field", "value"],
            &["completed", "false"],
            &["active", "true"],
        ]));
        assert_eq!(added, 2);
        assert_eq!(fields.get("completed"), Some("false"));
        assert_eq!(fields.get("active"), Some("true"));
    }

    #[test]
    fn test_extend_from_table_with_swapped_header() {
        let mut fields = PendingFields::new();
        fields.extend_from_rows(&rows(&[&["value", "field"], &["x", "description"]]));
        assert_eq!(fields.get("description"), Some("x"));
    }

    #[test]
    fn test_extend_from_headerless_table() {
        let mut fields = PendingFields::new();
        let added = fields.extend_from_rows(&rows(&[&["description", " trimmed "]]));
        assert_eq!(added, 1);
        assert_eq!(fields.get("description"), Some("trimmed"));
    }

    #[test]
    fn test_extend_from_empty_table() {
        let mut fields = PendingFields::new();
        assert_eq!(fields.extend_from_rows(&[]), 0);
        assert!(fields.is_empty());
    }

    #[test]
    fn test_to_json_coerces_named_fields() {
        let mut fields = PendingFields::with_title("Home");
        fields.insert("completed", "TRUE");
        fields.insert("active", "yes");
        fields.insert("description", "true");

        let json = fields.to_json(&["completed", "active"]);
        assert_eq!(
            json,
            json!({
                "title": "Home",
                "completed": true,
                "active": false,
                "description": "true"
            })
        );
    }

    #[test]
    fn test_to_raw_json_keeps_strings() {
        let mut fields = PendingFields::with_title("Home");
        fields.insert("completed", "false");
        assert_eq!(
            fields.to_raw_json(),
            json!({"title": "Home", "completed": "false"})
        );
    }

    #[test]
    fn test_empty_fields_make_empty_object() {
        assert_eq!(PendingFields::new().to_raw_json(), json!({}));
    }

    #[test]
    fn test_parse_permissive_bool() {
        assert!(parse_permissive_bool("true"));
        assert!(parse_permissive_bool("True"));
        assert!(!parse_permissive_bool("false"));
        assert!(!parse_permissive_bool("1"));
        assert!(!parse_permissive_bool(""));
    }
}
