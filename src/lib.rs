//! deed-scraper: County recorder deed index scraper
//!
//! Primes a search on a recorder portal, pulls the results grid as JSON, and
//! forwards a success/error envelope to a collector webhook.

pub mod counties;
pub mod logging;
pub mod run;
pub mod schema;
pub mod scrape;
pub mod session;
pub mod webhook;

pub use counties::{CountyRegistry, RegistryError};
pub use run::{parse_target_date, run_scraper, ScrapeArgs};
pub use schema::{CountyProfile, ErrorType, ScrapeResult};
pub use scrape::{scrape_deeds, GridRequest, ScrapeError, SearchPayload};
pub use webhook::{send_to_webhook, WebhookConfig};
