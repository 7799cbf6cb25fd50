//! Page routes and the location (path + query) standing in for the address bar.

use std::fmt;

use thiserror::Error;
use url::{form_urlencoded, Url};

const LOCATION_ORIGIN: &str = "http://forms.local/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Submit,
    History,
}

impl Page {
    pub fn path(self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::Submit => "/submit",
            Page::History => "/history",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Submit => "Page 2 - Submit form",
            Page::History => "Page 3 - Submission history",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            "" => Some(Page::Home),
            "/submit" => Some(Page::Submit),
            "/history" => Some(Page::History),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("invalid location '{location}': {source}")]
    Invalid {
        location: String,
        source: url::ParseError,
    },
    #[error("no page is served at '{0}'")]
    UnknownPage(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    page: Page,
    query: Vec<(String, String)>,
}

impl PageLocation {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            query: Vec::new(),
        }
    }

    /// Accepts absolute URLs, paths with a query, or a bare `?query`
    /// (resolved against the history page).
    pub fn parse(raw: &str) -> Result<Self, NavigationError> {
        let raw = raw.trim();
        let relative = if raw.starts_with('?') {
            format!("{}{raw}", Page::History.path())
        } else {
            raw.to_string()
        };

        let url = Url::parse(LOCATION_ORIGIN)
            .and_then(|origin| origin.join(&relative))
            .map_err(|source| NavigationError::Invalid {
                location: raw.to_string(),
                source,
            })?;
        let page = Page::from_path(url.path())
            .ok_or_else(|| NavigationError::UnknownPage(url.path().to_string()))?;

        Ok(Self {
            page,
            query: url.query_pairs().into_owned().collect(),
        })
    }

    pub fn page(&self) -> Page {
        self.page
    }

    /// First value for `key`, as the browser's search params would report it.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Same page, query replaced wholesale.
    pub fn with_query<'a>(&self, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            page: self.page,
            query: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish()
    }
}

impl fmt::Display for PageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.page.path())?;
        if !self.query.is_empty() {
            write!(f, "?{}", self.query_string())?;
        }
        Ok(())
    }
}
