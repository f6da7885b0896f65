//! Delivery client: post envelopes to the collector webhook
//!
//! Failures are logged and reported as `false`; nothing is persisted.

use crate::schema::ScrapeResult;
use log::{error, info};
use std::time::Duration;

/// Header carrying the shared secret
pub const SECRET_HEADER: &str = "X-Webhook-Secret";

/// Where and how to deliver
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub url: String,
    pub secret: String,
    pub timeout: Duration,
}

/// Send one envelope; true only on a 2xx response
pub async fn send_to_webhook(result: &ScrapeResult, config: &WebhookConfig) -> bool {
    info!(
        "Sending {} records to webhook: {}",
        result.record_count(),
        config.url
    );

    let client = match reqwest::Client::builder().timeout(config.timeout).build() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to send to webhook: {}", e);
            return false;
        }
    };

    let response = match client
        .post(&config.url)
        .header(SECRET_HEADER, &config.secret)
        .json(result)
        .send()
        .await
    {
        Ok(r) => r,
        Err(e) if e.is_timeout() => {
            error!("Webhook request timed out");
            return false;
        }
        Err(e) if e.is_connect() => {
            error!("Failed to connect to webhook: {}", e);
            return false;
        }
        Err(e) => {
            error!("Failed to send to webhook: {}", e);
            return false;
        }
    };

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        error!("Webhook returned error: {} - {}", status.as_u16(), body);
        return false;
    }

    info!("Webhook response: {}", status.as_u16());
    true
}
