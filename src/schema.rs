//! Data model: county profiles and the scrape result envelope
//!
//! The envelope is the JSON contract with the collector webhook.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A county recorder portal and the search it should run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountyProfile {
    /// Registry key, reported as `county` in envelopes (e.g. "dauphin")
    #[serde(default)]
    pub id: String,
    /// Human-readable name used in log lines
    pub name: String,
    /// Portal origin, without trailing slash
    pub base_url: String,
    /// Path of the search form that primes the session
    pub search_path: String,
    /// Path of the grid endpoint that returns JSON rows
    pub data_path: String,
    /// Free-text jurisdiction filter (may be empty)
    #[serde(default)]
    pub city_filter: String,
    /// Document-type codes to search
    pub doc_types: Vec<String>,
    /// Label the portal shows for the selected document types
    pub doc_types_display: String,
}

impl CountyProfile {
    pub fn search_url(&self) -> String {
        format!("{}{}", self.base_url, self.search_path)
    }

    pub fn data_url(&self) -> String {
        format!("{}{}", self.base_url, self.data_path)
    }

    /// Codes joined the way the portal's hidden fields expect them
    pub fn doc_types_joined(&self) -> String {
        self.doc_types.join(",")
    }
}

/// Outcome of one scrape, as delivered to the collector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ScrapeResult {
    Success {
        county: String,
        date_searched: String,
        record_count: usize,
        records: Vec<Value>,
    },
    Error {
        county: String,
        date_searched: String,
        error_type: ErrorType,
        error_message: String,
    },
}

impl ScrapeResult {
    /// Build a success envelope; `record_count` always mirrors `records`
    pub fn success(county: &str, date_searched: &str, records: Vec<Value>) -> Self {
        ScrapeResult::Success {
            county: county.to_string(),
            date_searched: date_searched.to_string(),
            record_count: records.len(),
            records,
        }
    }

    pub fn error(
        county: &str,
        date_searched: &str,
        error_type: ErrorType,
        error_message: impl Into<String>,
    ) -> Self {
        ScrapeResult::Error {
            county: county.to_string(),
            date_searched: date_searched.to_string(),
            error_type,
            error_message: error_message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ScrapeResult::Success { .. })
    }

    pub fn county(&self) -> &str {
        match self {
            ScrapeResult::Success { county, .. } | ScrapeResult::Error { county, .. } => county,
        }
    }

    pub fn date_searched(&self) -> &str {
        match self {
            ScrapeResult::Success { date_searched, .. }
            | ScrapeResult::Error { date_searched, .. } => date_searched,
        }
    }

    /// Number of records carried (0 for error envelopes)
    pub fn record_count(&self) -> usize {
        match self {
            ScrapeResult::Success { record_count, .. } => *record_count,
            ScrapeResult::Error { .. } => 0,
        }
    }
}

/// Scrape failure classification reported in error envelopes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Connect or read timeout
    Timeout,
    /// Could not establish a connection
    ConnectionError,
    /// Any other transport failure, including non-2xx status
    RequestError,
    /// Response body was not valid JSON
    ParseError,
    /// Everything else
    Unknown,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorType::Timeout => write!(f, "timeout"),
            ErrorType::ConnectionError => write!(f, "connection_error"),
            ErrorType::RequestError => write!(f, "request_error"),
            ErrorType::ParseError => write!(f, "parse_error"),
            ErrorType::Unknown => write!(f, "unknown"),
        }
    }
}
