//! History page: filter state mirrored into the location, distinct-name
//! options, and sequenced history queries.

use std::sync::Arc;

use client_core::{ApiClientError, FormApi};
use shared::{
    domain::{HistoryFilter, HistoryItem, NameOptions},
    protocol::HistoryResponse,
};
use tracing::{debug, error, info};

use crate::controller::{
    events::{classify_api_error, Notice, DATE_REQUIRED_PROMPT, HISTORY_LOAD_FAILED},
    navigation::PageLocation,
};

/// Location keys. The first name is written as `name` and read from either.
pub const DATE_PARAM: &str = "date";
pub const NAME_PARAM: &str = "name";
pub const FIRST_NAME_PARAM: &str = "first_name";
pub const LAST_NAME_PARAM: &str = "last_name";

/// Filter as encoded in the page location after a successful show.
pub fn location_query(filter: &HistoryFilter) -> Vec<(&'static str, &str)> {
    let mut query = vec![(DATE_PARAM, filter.date.as_str())];
    if let Some(first_name) = filter.first_name() {
        query.push((NAME_PARAM, first_name));
    }
    if let Some(last_name) = filter.last_name() {
        query.push((LAST_NAME_PARAM, last_name));
    }
    query
}

pub fn filter_from_location(location: &PageLocation) -> HistoryFilter {
    let first_name = location
        .query_value(NAME_PARAM)
        .filter(|value| !value.is_empty())
        .or_else(|| location.query_value(FIRST_NAME_PARAM))
        .unwrap_or_default();
    HistoryFilter {
        date: location.query_value(DATE_PARAM).unwrap_or_default().to_string(),
        first_name: first_name.to_string(),
        last_name: location
            .query_value(LAST_NAME_PARAM)
            .unwrap_or_default()
            .to_string(),
    }
}

/// Handle for one in-flight history request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryTicket {
    seq: u64,
    filter: HistoryFilter,
    rewrite_location: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    DateRequired,
    Loaded { total: u64 },
    Failed,
    /// A newer request was issued meanwhile; this result was dropped.
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryView<'a> {
    NotQueried,
    Loading,
    /// A query finished with no rows for the selected date.
    Empty,
    Table {
        items: &'a [HistoryItem],
        total: u64,
    },
}

pub struct HistoryPage {
    api: Arc<dyn FormApi>,
    location: PageLocation,
    filter: HistoryFilter,
    names: NameOptions,
    items: Vec<HistoryItem>,
    total: u64,
    queried: bool,
    auto_query_done: bool,
    last_issued: u64,
    in_flight: Option<u64>,
    notice: Option<Notice>,
}

impl HistoryPage {
    /// Seeds the filter from the location without touching the network.
    pub fn from_location(api: Arc<dyn FormApi>, location: PageLocation) -> Self {
        let filter = filter_from_location(&location);
        Self {
            api,
            location,
            filter,
            names: NameOptions::default(),
            items: Vec::new(),
            total: 0,
            queried: false,
            auto_query_done: false,
            last_issued: 0,
            in_flight: None,
            notice: None,
        }
    }

    /// Opens the page: loads name options and, if the location carried a
    /// date, runs the one automatic query.
    pub async fn mount(api: Arc<dyn FormApi>, location: PageLocation) -> Self {
        let mut page = Self::from_location(Arc::clone(&api), location);
        let (names, _) = tokio::join!(api.fetch_distinct_names(), page.run_mount_query());
        debug!(
            first_names = names.first_names.len(),
            last_names = names.last_names.len(),
            "name options loaded"
        );
        page.names = names;
        page
    }

    /// Runs at most once per page; later calls are no-ops.
    pub async fn run_mount_query(&mut self) -> Option<QueryOutcome> {
        if std::mem::replace(&mut self.auto_query_done, true) {
            return None;
        }
        if !self.filter.has_date() {
            return None;
        }
        let ticket = self.begin_query(false);
        let result = self.api.fetch_history(&ticket.filter).await;
        Some(self.complete_query(ticket, result))
    }

    pub fn filter(&self) -> &HistoryFilter {
        &self.filter
    }

    pub fn set_date(&mut self, date: impl Into<String>) {
        self.filter.date = date.into();
    }

    pub fn set_first_name(&mut self, first_name: impl Into<String>) {
        self.filter.first_name = first_name.into();
    }

    pub fn set_last_name(&mut self, last_name: impl Into<String>) {
        self.filter.last_name = last_name.into();
    }

    pub fn location(&self) -> &PageLocation {
        &self.location
    }

    pub fn names(&self) -> &NameOptions {
        &self.names
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The show button is disabled while loading or without a date.
    pub fn can_show(&self) -> bool {
        !self.is_loading() && self.filter.has_date()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn view(&self) -> HistoryView<'_> {
        if !self.items.is_empty() {
            HistoryView::Table {
                items: &self.items,
                total: self.total,
            }
        } else if self.is_loading() {
            HistoryView::Loading
        } else if self.queried && self.filter.has_date() {
            HistoryView::Empty
        } else {
            HistoryView::NotQueried
        }
    }

    pub async fn show(&mut self) -> QueryOutcome {
        let ticket = match self.begin_show() {
            Ok(ticket) => ticket,
            Err(outcome) => return outcome,
        };
        let result = self.api.fetch_history(&ticket.filter).await;
        self.complete_query(ticket, result)
    }

    pub fn begin_show(&mut self) -> Result<HistoryTicket, QueryOutcome> {
        if !self.filter.has_date() {
            self.notice = Some(Notice::prompt(DATE_REQUIRED_PROMPT));
            return Err(QueryOutcome::DateRequired);
        }
        Ok(self.begin_query(true))
    }

    fn begin_query(&mut self, rewrite_location: bool) -> HistoryTicket {
        self.last_issued += 1;
        self.in_flight = Some(self.last_issued);
        self.notice = None;
        info!(seq = self.last_issued, date = %self.filter.date, "loading history");
        HistoryTicket {
            seq: self.last_issued,
            filter: self.filter.clone(),
            rewrite_location,
        }
    }

    /// Applies a result unless a newer request was issued after `ticket`.
    pub fn complete_query(
        &mut self,
        ticket: HistoryTicket,
        result: Result<HistoryResponse, ApiClientError>,
    ) -> QueryOutcome {
        if ticket.seq != self.last_issued {
            debug!(
                seq = ticket.seq,
                latest = self.last_issued,
                "dropping superseded history result"
            );
            return QueryOutcome::Superseded;
        }
        self.in_flight = None;

        match result {
            Ok(response) => {
                self.items = response.items;
                self.total = response.total;
                self.queried = true;
                if ticket.rewrite_location {
                    self.location = self.location.with_query(location_query(&ticket.filter));
                }
                info!(total = self.total, rows = self.items.len(), "history loaded");
                QueryOutcome::Loaded { total: self.total }
            }
            Err(err) => {
                error!(
                    error = %err,
                    category = ?classify_api_error(&err),
                    "failed to load history"
                );
                self.notice = Some(Notice::failure(HISTORY_LOAD_FAILED));
                QueryOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/history_tests.rs"]
mod tests;
