//! Submit-form page: field state, request dispatch and per-field error display.

use std::sync::Arc;

use client_core::{FormApi, SubmitError, SubmitOutcome};
use shared::{
    domain::{FormField, SubmissionRecord},
    error::{FieldErrors, GENERAL_ERROR_KEY},
};
use tracing::{info, warn};

use crate::controller::{
    events::{classify_submit_error, SUBMIT_FAILED},
    navigation::{Page, PageLocation},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStatus {
    Idle,
    Submitting,
    Succeeded,
    FieldErrors,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAttempt {
    /// Refused locally; no request was issued.
    MissingFields(Vec<FormField>),
    /// A submission is already in flight.
    Busy,
    Accepted,
    NotAccepted,
    Rejected,
    Failed,
}

pub struct SubmitFormPage {
    api: Arc<dyn FormApi>,
    form: SubmissionRecord,
    errors: FieldErrors,
    status: SubmissionStatus,
}

impl SubmitFormPage {
    pub fn new(api: Arc<dyn FormApi>) -> Self {
        Self {
            api,
            form: SubmissionRecord::default(),
            errors: FieldErrors::new(),
            status: SubmissionStatus::Idle,
        }
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn is_busy(&self) -> bool {
        self.status == SubmissionStatus::Submitting
    }

    pub fn value(&self, field: FormField) -> &str {
        self.form.value(field)
    }

    pub fn field_errors(&self, field: FormField) -> &[String] {
        self.errors.for_field(field)
    }

    pub fn general_errors(&self) -> &[String] {
        self.errors.for_key(GENERAL_ERROR_KEY)
    }

    /// Link to the history page, offered once a submission went through.
    pub fn history_link(&self) -> Option<PageLocation> {
        (self.status == SubmissionStatus::Succeeded).then(|| PageLocation::new(Page::History))
    }

    /// Editing a field drops that field's errors and nothing else.
    pub fn edit(&mut self, field: FormField, value: impl Into<String>) {
        *self.form.value_mut(field) = value.into();
        self.errors.clear_field(field);
        if self.status == SubmissionStatus::FieldErrors && self.errors.is_empty() {
            self.status = SubmissionStatus::Idle;
        }
    }

    pub async fn submit(&mut self) -> SubmitAttempt {
        let record = match self.begin_submit() {
            Ok(record) => record,
            Err(refused) => return refused,
        };
        let result = self.api.submit(&record).await;
        self.complete_submit(result)
    }

    /// Clears previous errors and success before handing out the record to send.
    pub fn begin_submit(&mut self) -> Result<SubmissionRecord, SubmitAttempt> {
        if self.is_busy() {
            return Err(SubmitAttempt::Busy);
        }
        let missing = self.form.missing_fields();
        if !missing.is_empty() {
            return Err(SubmitAttempt::MissingFields(missing));
        }

        self.errors.clear();
        self.status = SubmissionStatus::Submitting;
        info!(date = %self.form.date, "submitting form");
        Ok(self.form.clone())
    }

    pub fn complete_submit(&mut self, result: Result<SubmitOutcome, SubmitError>) -> SubmitAttempt {
        match result {
            Ok(SubmitOutcome::Accepted) => {
                info!("form submission accepted");
                self.form = SubmissionRecord::default();
                self.status = SubmissionStatus::Succeeded;
                SubmitAttempt::Accepted
            }
            Ok(SubmitOutcome::NotAccepted) => {
                warn!("server answered without accepting the submission");
                self.status = SubmissionStatus::Idle;
                SubmitAttempt::NotAccepted
            }
            Err(SubmitError::Rejected { status, errors }) => {
                let (mut fields, general) = errors.partition();
                for message in general {
                    fields.push(GENERAL_ERROR_KEY, message);
                }
                if fields.is_empty() {
                    fields = FieldErrors::general(SUBMIT_FAILED);
                }
                info!(
                    status,
                    fields = ?fields.keys().collect::<Vec<_>>(),
                    "form submission rejected"
                );
                self.errors = fields;
                self.status = SubmissionStatus::FieldErrors;
                SubmitAttempt::Rejected
            }
            Err(err) => {
                warn!(
                    error = %err,
                    category = ?classify_submit_error(&err),
                    "form submission failed"
                );
                self.errors = FieldErrors::general(SUBMIT_FAILED);
                self.status = SubmissionStatus::FieldErrors;
                SubmitAttempt::Failed
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/submission_tests.rs"]
mod tests;
