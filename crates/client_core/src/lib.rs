use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::{HistoryFilter, NameOptions, SubmissionRecord},
    protocol::{
        HistoryResponse, SubmitFormErrorResponse, SubmitFormRequest, SubmitFormResponse,
        UniqueNamesResponse,
    },
};
use tracing::{debug, error};

pub mod error;

pub use error::{ApiClientError, SubmitError};

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    /// 2xx answer with `success: false` and nothing to show for it.
    NotAccepted,
}

/// Operations the pages need from the form API.
#[async_trait]
pub trait FormApi: Send + Sync {
    async fn submit(&self, record: &SubmissionRecord) -> Result<SubmitOutcome, SubmitError>;
    async fn fetch_history(&self, filter: &HistoryFilter)
        -> Result<HistoryResponse, ApiClientError>;
    /// Never fails: lookup errors are logged and yield empty lists.
    async fn fetch_distinct_names(&self) -> NameOptions;
}

/// Query pairs for `GET /history`: `date` always, then each name only when set.
pub fn history_query(filter: &HistoryFilter) -> Vec<(&'static str, &str)> {
    let mut query = vec![("date", filter.date.as_str())];
    if let Some(first_name) = filter.first_name() {
        query.push(("first_name", first_name));
    }
    if let Some(last_name) = filter.last_name() {
        query.push(("last_name", last_name));
    }
    query
}

pub struct HttpFormApi {
    http: Client,
    base_url: String,
}

impl HttpFormApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: normalize_base_url(base_url.into()),
        }
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ApiClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build().map_err(ApiClientError::Build)?,
            base_url: normalize_base_url(base_url.into()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn fetch_distinct_names_impl(&self) -> Result<NameOptions, ApiClientError> {
        let body: UniqueNamesResponse = self
            .http
            .get(self.endpoint("unique-names"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(body.into())
    }
}

fn normalize_base_url(raw: String) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

#[async_trait]
impl FormApi for HttpFormApi {
    async fn submit(&self, record: &SubmissionRecord) -> Result<SubmitOutcome, SubmitError> {
        let response = self
            .http
            .post(self.endpoint("submit"))
            .json(&SubmitFormRequest::from(record))
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!(status = status.as_u16(), "submit response received");

        // Rejections carry their field errors regardless of the status code.
        if let Ok(rejection) = serde_json::from_slice::<SubmitFormErrorResponse>(&body) {
            if !rejection.success {
                return Err(SubmitError::Rejected {
                    status: status.as_u16(),
                    errors: rejection.error,
                });
            }
        }
        if !status.is_success() {
            return Err(SubmitError::Status {
                status: status.as_u16(),
            });
        }

        let accepted: SubmitFormResponse =
            serde_json::from_slice(&body).map_err(SubmitError::Decode)?;
        Ok(if accepted.success {
            SubmitOutcome::Accepted
        } else {
            SubmitOutcome::NotAccepted
        })
    }

    async fn fetch_history(
        &self,
        filter: &HistoryFilter,
    ) -> Result<HistoryResponse, ApiClientError> {
        let query = history_query(filter);
        debug!(?query, "fetching history");
        let body = self
            .http
            .get(self.endpoint("history"))
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(body)
    }

    async fn fetch_distinct_names(&self) -> NameOptions {
        match self.fetch_distinct_names_impl().await {
            Ok(names) => names,
            Err(err) => {
                error!(error = %err, "failed to load distinct names");
                NameOptions::default()
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
