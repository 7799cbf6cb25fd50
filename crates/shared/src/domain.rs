use std::fmt;

use serde::{Deserialize, Serialize};

/// Inputs of the submission form, keyed the same way the server keys its
/// validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Date,
    FirstName,
    LastName,
}

impl FormField {
    pub const ALL: [FormField; 3] = [FormField::Date, FormField::FirstName, FormField::LastName];

    pub fn key(self) -> &'static str {
        match self {
            FormField::Date => "date",
            FormField::FirstName => "first_name",
            FormField::LastName => "last_name",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "date" => Some(FormField::Date),
            "first_name" => Some(FormField::FirstName),
            "last_name" => Some(FormField::LastName),
            _ => None,
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub date: String,
    pub first_name: String,
    pub last_name: String,
}

impl SubmissionRecord {
    pub fn new(
        date: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Date => &self.date,
            FormField::FirstName => &self.first_name,
            FormField::LastName => &self.last_name,
        }
    }

    pub fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Date => &mut self.date,
            FormField::FirstName => &mut self.first_name,
            FormField::LastName => &mut self.last_name,
        }
    }

    /// Required fields that are still empty, in form order.
    pub fn missing_fields(&self) -> Vec<FormField> {
        FormField::ALL
            .into_iter()
            .filter(|field| self.value(*field).is_empty())
            .collect()
    }
}

/// Filter for the history query. Empty name strings mean "any name".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryFilter {
    pub date: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl HistoryFilter {
    pub fn for_date(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            ..Self::default()
        }
    }

    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self
    }

    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = last_name.into();
        self
    }

    pub fn has_date(&self) -> bool {
        !self.date.is_empty()
    }

    pub fn first_name(&self) -> Option<&str> {
        non_empty(&self.first_name)
    }

    pub fn last_name(&self) -> Option<&str> {
        non_empty(&self.last_name)
    }
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub date: String,
    pub first_name: String,
    pub last_name: String,
    /// Number of earlier submissions for the same person, computed server-side.
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameOptions {
    pub first_names: Vec<String>,
    pub last_names: Vec<String>,
}

impl NameOptions {
    pub fn is_empty(&self) -> bool {
        self.first_names.is_empty() && self.last_names.is_empty()
    }
}
