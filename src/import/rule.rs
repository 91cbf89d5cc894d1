use crate::import::row::{Row, Value};
use once_cell::sync::Lazy;
use regex::Regex;

/// First run of digits and decimal points in a text.
static NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9.]+").expect("Hardcode regex pattern"));

/// Parses the first run of digits and dots in `text`.
///
/// Returns `None` when there is no such run, or the run is not a number (`.`, `1.2.3`).
pub fn parse_number(text: &str) -> Option<f64> {
    NUMBER_PATTERN
        .find(text)
        .and_then(|matcher| matcher.as_str().parse::<f64>().ok())
}

/// Numeric extraction with `0.0` as the fallback, e.g. `"123.45元"` gives `123.45`.
pub fn extract_number(text: &str) -> f64 {
    parse_number(text).unwrap_or(0.0)
}

/// True when the text is not represented by its extracted number alone:
/// no number could be parsed, or further digits follow it (`"10-20"`).
fn loses_information(text: &str) -> bool {
    let mut runs = NUMBER_PATTERN
        .find_iter(text)
        .filter(|matcher| matcher.as_str().bytes().any(|byte| byte.is_ascii_digit()));
    match runs.next() {
        Some(first) => first.as_str().parse::<f64>().is_err() || runs.next().is_some(),
        None => true,
    }
}

/// Where to record raw text that its extracted number does not capture.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Field receiving the note, usually `remark`
    pub field: String,
    /// Label written before the raw value
    pub label: String,
}

/// A field computed after column mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum DerivedRule {
    /// Always set the field.
    Constant { field: String, value: Value },
    /// Set the field only when the sheet did not provide it.
    Default { field: String, value: Value },
    /// Generate `{prefix}{position:0width}` when the field is absent or blank.
    Sequence { field: String, prefix: String, width: usize },
    /// Replace raw text with the first number found in it.
    NumericExtraction {
        field: String,
        annotation: Option<Annotation>,
    },
}

impl DerivedRule {
    pub fn constant<V: Into<Value>>(field: &str, value: V) -> Self {
        Self::Constant {
            field: field.to_owned(),
            value: value.into(),
        }
    }

    pub fn default_value<V: Into<Value>>(field: &str, value: V) -> Self {
        Self::Default {
            field: field.to_owned(),
            value: value.into(),
        }
    }

    pub fn sequence(field: &str, prefix: &str, width: usize) -> Self {
        Self::Sequence {
            field: field.to_owned(),
            prefix: prefix.to_owned(),
            width,
        }
    }

    /// Numeric extraction that keeps unparseable raw text in `annotation_field`.
    pub fn numeric_annotated(field: &str, annotation_field: &str, label: &str) -> Self {
        Self::NumericExtraction {
            field: field.to_owned(),
            annotation: Some(Annotation {
                field: annotation_field.to_owned(),
                label: label.to_owned(),
            }),
        }
    }

    /// Applies the rule to a row; `position` is the 1-based row position in the import.
    pub fn apply(&self, row: &mut Row, position: usize) {
        match self {
            Self::Constant { field, value } => row.set(field, value.clone()),
            Self::Default { field, value } => {
                if !row.contains(field) {
                    row.set(field, value.clone());
                }
            }
            Self::Sequence {
                field,
                prefix,
                width,
            } => {
                if row.get(field).map(Value::is_blank).unwrap_or(true) {
                    row.set(field, format!("{}{:0width$}", prefix, position, width = *width));
                }
            }
            Self::NumericExtraction { field, annotation } => {
                let number = match row.get(field).cloned() {
                    Some(Value::Integer(value)) => value as f64,
                    Some(Value::Float(value)) => value,
                    Some(Value::Text(raw)) => {
                        if let Some(annotation) = annotation {
                            if !raw.trim().is_empty() && loses_information(&raw) {
                                annotate(row, annotation, &raw);
                            }
                        }
                        extract_number(&raw)
                    }
                    None => 0.0,
                };
                row.set(field, number);
            }
        }
    }
}

fn annotate(row: &mut Row, annotation: &Annotation, raw: &str) {
    let note = format!("{}（{}：{}）", row.text(&annotation.field), annotation.label, raw);
    log::warn!(
        "Line {}: '{}' is not a single number, kept in '{}'",
        row.line(),
        raw,
        annotation.field
    );
    row.set(&annotation.field, note);
}
