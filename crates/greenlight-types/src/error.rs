use std::collections::BTreeMap;

use serde::Serialize;

/// Field level validation failures, at most one message per field.
///
/// Serializes as a plain JSON object mapping field name to message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(transparent)]
#[error("Validation failed for: {}", field_list(.errors))]
pub struct ValidationError {
    errors: BTreeMap<String, String>,
}

fn field_list(errors: &BTreeMap<String, String>) -> String {
    errors.keys().map(String::as_str).collect::<Vec<_>>().join(", ")
}

impl ValidationError {
    pub(crate) fn new(errors: BTreeMap<String, String>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn into_errors(self) -> BTreeMap<String, String> {
        self.errors
    }
}
