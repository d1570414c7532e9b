//! Error types for page fetching and HTML parsing
//!
//! Parse errors separate "nothing to report" (a closed dining hall) from
//! structural changes to the upstream site that no retry can fix.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    /// The tabbed meal container is missing: the hall has no menu that day
    #[error("Menu container not found; dining hall has no menu")]
    MenuContainerMissing,

    #[error("Unexpected number of meal tabs: {count}. Only 2 or 3 supported")]
    UnexpectedTabCount { count: usize },

    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("HTML parsing failed: {message}")]
    HtmlParsingFailed { message: String, url: Option<String> },
}

impl ParsingError {
    pub fn invalid_selector(selector: &str, reason: &str) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Only a missing menu container lets the run continue with the next hall
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::MenuContainerMissing => true,
            Self::UnexpectedTabCount { .. } => false,
            Self::InvalidSelector { .. } => false,
            Self::HtmlParsingFailed { .. } => false,
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;

/// Failure to retrieve a page
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed for {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP request failed with status {status}: {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("No page available at {url}")]
    NotFound { url: String },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            Self::Request { url, .. }
            | Self::HttpStatus { url, .. }
            | Self::Body { url, .. }
            | Self::NotFound { url } => url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_closed_hall_is_recoverable() {
        assert!(ParsingError::MenuContainerMissing.is_recoverable());
        assert!(!ParsingError::UnexpectedTabCount { count: 1 }.is_recoverable());
        assert!(!ParsingError::invalid_selector("div[", "unclosed").is_recoverable());
    }

    #[test]
    fn test_fetch_error_reports_url() {
        let err = FetchError::HttpStatus {
            url: "https://example.com/a".to_string(),
            status: 503,
        };
        assert_eq!(err.url(), "https://example.com/a");
        assert!(err.to_string().contains("503"));
    }
}
