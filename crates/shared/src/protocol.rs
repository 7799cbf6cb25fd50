//! JSON bodies exchanged with the form API.

use serde::{Deserialize, Serialize};

use crate::{
    domain::{HistoryItem, NameOptions, SubmissionRecord},
    error::FieldErrors,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmitFormRequest {
    pub date: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&SubmissionRecord> for SubmitFormRequest {
    fn from(record: &SubmissionRecord) -> Self {
        Self {
            date: record.date.clone(),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmitFormResponse {
    pub success: bool,
}

/// Rejection body. The server sends it with a 4xx/5xx status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmitFormErrorResponse {
    #[serde(default)]
    pub success: bool,
    pub error: FieldErrors,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryResponse {
    #[serde(default)]
    pub items: Vec<HistoryItem>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UniqueNamesResponse {
    #[serde(default)]
    pub first_names: Vec<String>,
    #[serde(default)]
    pub last_names: Vec<String>,
}

impl From<UniqueNamesResponse> for NameOptions {
    fn from(value: UniqueNamesResponse) -> Self {
        Self {
            first_names: value.first_names,
            last_names: value.last_names,
        }
    }
}
