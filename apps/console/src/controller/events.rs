//! User-facing notices and failure classification for the page controllers.

use client_core::{ApiClientError, SubmitError};

pub const DATE_REQUIRED_PROMPT: &str = "Please select a date";
pub const HISTORY_LOAD_FAILED: &str = "Failed to load history";
pub const SUBMIT_FAILED: &str = "An error occurred while submitting the form";
pub const SUBMIT_SUCCEEDED: &str = "Data saved";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// The action needs more input before it can run.
    Prompt,
    Failure,
}

/// Blocking message shown to the user, the terminal equivalent of an alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    kind: NoticeKind,
    message: String,
}

impl Notice {
    pub fn prompt(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Prompt,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Failure,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> NoticeKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Validation,
    Transport,
    Server,
    Unknown,
}

pub fn classify_submit_error(err: &SubmitError) -> UiErrorCategory {
    match err {
        SubmitError::Rejected { .. } => UiErrorCategory::Validation,
        SubmitError::Status { .. } | SubmitError::Decode(_) => UiErrorCategory::Server,
        SubmitError::Transport(source) => classify_reqwest_error(source),
    }
}

pub fn classify_api_error(err: &ApiClientError) -> UiErrorCategory {
    match err {
        ApiClientError::Build(_) => UiErrorCategory::Unknown,
        ApiClientError::Http(source) => classify_reqwest_error(source),
    }
}

fn classify_reqwest_error(err: &reqwest::Error) -> UiErrorCategory {
    if err.is_status() || err.is_decode() {
        UiErrorCategory::Server
    } else if err.is_connect() || err.is_timeout() || err.is_request() {
        UiErrorCategory::Transport
    } else {
        UiErrorCategory::Unknown
    }
}
