use std::collections::HashMap;
use std::fmt::Display;

/// A field value bound into the upsert statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl Value {
    /// Returns true for empty or whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Text(value) => write!(f, "{}", value),
            Value::Integer(value) => write!(f, "{}", value),
            Value::Float(value) => write!(f, "{}", value),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

/// One transformed record keyed by target field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    /// 1-based spreadsheet line the row came from
    line: usize,
    fields: HashMap<String, Value>,
}

impl Row {
    pub fn new(line: usize) -> Self {
        Self {
            line,
            fields: HashMap::new(),
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub(crate) fn set_line(&mut self, line: usize) {
        self.line = line;
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn set<V: Into<Value>>(&mut self, field: &str, value: V) {
        self.fields.insert(field.to_owned(), value.into());
    }

    /// Text form of a field, empty when absent.
    pub fn text(&self, field: &str) -> String {
        self.get(field).map(Value::to_string).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_fields() {
        let mut row = Row::new(4);
        row.set("drug_name", "阿莫西林");
        row.set("status", 1i64);
        row.set("price", 2.5);

        assert_eq!(row.line(), 4);
        assert_eq!(row.len(), 3);
        assert_eq!(row.get("status"), Some(&Value::Integer(1)));
        assert_eq!(row.text("price"), "2.5");
        assert_eq!(row.text("remark"), "");
        assert!(!row.contains("remark"));
    }

    #[test]
    fn value_blank() {
        assert!(Value::from("  ").is_blank());
        assert!(!Value::from("x").is_blank());
        assert!(!Value::Integer(0).is_blank());
    }
}
