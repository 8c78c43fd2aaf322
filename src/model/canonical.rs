//! Unambiguous building blocks for canonical `flat_string` forms.
//!
//! Every free-text value is written as a JSON string literal, so separators
//! inside ids or names can never be confused with the ones between fields.

use serde_json::Value;

/// `text` as a JSON string literal
pub(crate) fn quote(text: &str) -> String {
    Value::from(text).to_string()
}

/// `items` as a JSON array of string literals
pub(crate) fn quote_list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Value::Array(items.into_iter().map(|s| Value::String(s.into())).collect()).to_string()
}
