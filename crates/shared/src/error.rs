use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::FormField;

/// Key of the slot for messages not attached to a single input.
pub const GENERAL_ERROR_KEY: &str = "general";

/// Validation messages keyed by field, as sent by the server on rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn general(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(GENERAL_ERROR_KEY, message);
        errors
    }

    pub fn push(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(message.into());
    }

    pub fn for_key(&self, key: &str) -> &[String] {
        self.0.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn for_field(&self, field: FormField) -> &[String] {
        self.for_key(field.key())
    }

    pub fn clear_field(&mut self, field: FormField) -> Option<Vec<String>> {
        self.0.remove(field.key())
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Splits into messages for the known inputs and everything else,
    /// which is folded into the general slot.
    pub fn partition(self) -> (Self, Vec<String>) {
        let mut fields = Self::new();
        let mut general = Vec::new();
        for (key, messages) in self.0 {
            if FormField::from_key(&key).is_some() {
                fields.0.insert(key, messages);
            } else {
                general.extend(messages);
            }
        }
        (fields, general)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut errors = Self::new();
        for (key, message) in iter {
            errors.push(key, message);
        }
        errors
    }
}
