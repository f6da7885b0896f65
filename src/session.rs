//! Browser-like HTTP session for recorder portals
//!
//! The portal only answers grid requests that look like AJAX calls from a
//! page it has already served, so every request carries desktop-browser
//! headers and shares one cookie jar.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde::Serialize;
use std::time::Duration;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const AJAX_ACCEPT: &str = "application/json, text/javascript, */*; q=0.01";

/// One scrape's worth of portal state (cookies live here)
pub struct PortalSession {
    client: reqwest::Client,
}

impl PortalSession {
    /// Create a session whose requests each time out after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .default_headers(browser_headers())
            .cookie_store(true)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    /// POST a form-encoded body; status is not checked here
    pub async fn post_form<T: Serialize + ?Sized>(
        &self,
        url: &str,
        form: &T,
    ) -> Result<reqwest::Response, reqwest::Error> {
        self.client.post(url).form(form).send().await
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static(AJAX_ACCEPT));
    headers.insert("x-requested-with", HeaderValue::from_static("XMLHttpRequest"));
    headers
}
