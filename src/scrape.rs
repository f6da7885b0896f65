//! Deed fetcher: prime the portal search, then pull the results grid
//!
//! Every failure is folded into an error envelope; nothing escapes
//! [`scrape_deeds`].

use crate::schema::{CountyProfile, ErrorType, ScrapeResult};
use crate::session::PortalSession;
use chrono::NaiveDate;
use log::{debug, error, info};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Outbound date format for every portal field
pub const PORTAL_DATE_FORMAT: &str = "%m/%d/%Y";

/// Rows requested from the grid in the single page we fetch
pub const GRID_PAGE_SIZE: u32 = 500;

/// Failures inside one scrape, before they become an envelope
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Timeout connecting to {base_url}")]
    Timeout {
        base_url: String,
        source: reqwest::Error,
    },
    #[error("{0}")]
    Connection(reqwest::Error),
    #[error("{0}")]
    Request(reqwest::Error),
    #[error("{0}")]
    Parse(#[from] serde_json::Error),
    #[error("{0}")]
    Unexpected(String),
}

impl ScrapeError {
    /// Classify a transport error; timeouts win over connect failures
    fn from_transport(err: reqwest::Error, base_url: &str) -> Self {
        if err.is_timeout() {
            ScrapeError::Timeout {
                base_url: base_url.to_string(),
                source: err,
            }
        } else if err.is_connect() {
            ScrapeError::Connection(err)
        } else {
            ScrapeError::Request(err)
        }
    }

    pub fn error_type(&self) -> ErrorType {
        match self {
            ScrapeError::Timeout { .. } => ErrorType::Timeout,
            ScrapeError::Connection(_) => ErrorType::ConnectionError,
            ScrapeError::Request(_) => ErrorType::RequestError,
            ScrapeError::Parse(_) => ErrorType::ParseError,
            ScrapeError::Unexpected(_) => ErrorType::Unknown,
        }
    }
}

/// Raw value and the value the portal's UI would display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryField {
    #[serde(rename = "BE")]
    pub be: String,
    #[serde(rename = "UI")]
    pub ui: String,
}

impl HistoryField {
    fn same(value: &str) -> Self {
        Self {
            be: value.to_string(),
            ui: value.to_string(),
        }
    }
}

/// Search history blob the portal expects alongside the form fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchHistory {
    pub from_date_picker: HistoryField,
    pub to_date_picker: HistoryField,
    pub comments: HistoryField,
    pub doc_types_list: HistoryField,
}

/// Form body of the priming search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPayload {
    pub history: SearchHistory,
    pub comments: String,
    pub date: String,
    pub doc_types_group: String,
    pub doc_types: Vec<String>,
}

impl SearchPayload {
    pub fn new(profile: &CountyProfile, date: NaiveDate) -> Self {
        let date = format_portal_date(date);
        let joined = profile.doc_types_joined();

        let history = SearchHistory {
            from_date_picker: HistoryField::same(&date),
            to_date_picker: HistoryField::same(&date),
            comments: HistoryField::same(&profile.city_filter),
            doc_types_list: HistoryField {
                be: joined.clone(),
                ui: profile.doc_types_display.clone(),
            },
        };

        Self {
            history,
            comments: profile.city_filter.clone(),
            doc_types_group: format!("{}|{}", profile.doc_types_display, joined),
            doc_types: profile.doc_types.clone(),
            date,
        }
    }

    /// Ordered form pairs; `DocTypesList` repeats once per code
    pub fn form_fields(&self) -> Result<Vec<(&'static str, String)>, serde_json::Error> {
        let mut fields = vec![
            ("HistoryObject", serde_json::to_string(&self.history)?),
            ("Comments", self.comments.clone()),
            ("DateRange", "SpecificDateRange".to_string()),
            ("DateFrom", self.date.clone()),
            ("DateTo", self.date.clone()),
            ("DocTypesGroupList", self.doc_types_group.clone()),
        ];
        fields.extend(self.doc_types.iter().map(|code| ("DocTypesList", code.clone())));
        fields.push(("ctl00$ContentPlaceHolder1$btnSearch", "Search".to_string()));
        Ok(fields)
    }
}

/// Pagination request for the results grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRequest {
    pub page: u32,
    pub page_size: u32,
    pub group: String,
    pub filter: String,
}

impl Default for GridRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: GRID_PAGE_SIZE,
            group: String::new(),
            filter: String::new(),
        }
    }
}

pub fn format_portal_date(date: NaiveDate) -> String {
    date.format(PORTAL_DATE_FORMAT).to_string()
}

/// Scrape one county for one day and wrap the outcome in an envelope
pub async fn scrape_deeds(
    profile: &CountyProfile,
    target_date: NaiveDate,
    timeout: Duration,
) -> ScrapeResult {
    let date_str = format_portal_date(target_date);
    info!("Scraping {} deeds for {}", profile.name, date_str);

    match fetch_records(profile, target_date, timeout).await {
        Ok(records) => {
            info!("Found {} records", records.len());
            ScrapeResult::success(&profile.id, &date_str, records)
        }
        Err(e) => {
            let error_type = e.error_type();
            match &e {
                ScrapeError::Timeout { .. } => error!("{}", e),
                ScrapeError::Connection(_) => error!("Connection error: {}", e),
                ScrapeError::Request(_) => error!("Request failed: {}", e),
                ScrapeError::Parse(_) => error!("Failed to parse response as JSON: {}", e),
                ScrapeError::Unexpected(_) => error!("Unexpected error: {:?}", e),
            }
            ScrapeResult::error(&profile.id, &date_str, error_type, e.to_string())
        }
    }
}

async fn fetch_records(
    profile: &CountyProfile,
    target_date: NaiveDate,
    timeout: Duration,
) -> Result<Vec<Value>, ScrapeError> {
    let session = PortalSession::new(timeout)
        .map_err(|e| ScrapeError::Unexpected(format!("Failed to build HTTP client: {}", e)))?;
    let transport = |e: reqwest::Error| ScrapeError::from_transport(e, &profile.base_url);

    // Step 1: prime the session; the response only matters for its cookies
    let search_url = profile.search_url();
    let form = SearchPayload::new(profile, target_date)
        .form_fields()
        .map_err(|e| ScrapeError::Unexpected(format!("Failed to encode search history: {}", e)))?;
    debug!("Priming session at {}", search_url);
    session
        .post_form(&search_url, &form)
        .await
        .map_err(transport)?;

    // Step 2: fetch the grid
    let data_url = profile.data_url();
    debug!("Fetching data from {}", data_url);
    let response = session
        .post_form(&data_url, &GridRequest::default())
        .await
        .map_err(transport)?
        .error_for_status()
        .map_err(transport)?;
    let body = response.text().await.map_err(transport)?;

    let json: Value = serde_json::from_str(&body)?;
    extract_records(json)
}

/// Pull the `Data` rows out of a grid response
fn extract_records(json: Value) -> Result<Vec<Value>, ScrapeError> {
    let Value::Object(mut map) = json else {
        return Err(ScrapeError::Unexpected(format!(
            "Expected a JSON object from grid endpoint, got {}",
            json_kind(&json)
        )));
    };

    match map.remove("Data") {
        None => Ok(Vec::new()),
        Some(Value::Array(records)) => Ok(records),
        Some(other) => Err(ScrapeError::Unexpected(format!(
            "Expected 'Data' to be an array, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
