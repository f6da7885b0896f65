//! Scraper entry point: resolve the run, scrape, then deliver or print
//!
//! Pre-flight failures (bad date, unknown county, missing webhook settings)
//! return an error before any request is made.

use crate::counties::CountyRegistry;
use crate::logging;
use crate::schema::ScrapeResult;
use crate::scrape::{scrape_deeds, PORTAL_DATE_FORMAT};
use crate::webhook::{send_to_webhook, WebhookConfig};
use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::Args;
use log::{error, info};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Args, Debug, Clone)]
pub struct ScrapeArgs {
    /// Date to scrape (MM/DD/YYYY). Defaults to yesterday.
    #[arg(long)]
    pub date: Option<String>,

    /// Scrape but don't send to the webhook; print the result instead
    #[arg(long)]
    pub dry_run: bool,

    /// County key from the counties file
    #[arg(long, default_value = "dauphin")]
    pub county: String,

    /// County profiles file (YAML)
    #[arg(long, env = "COUNTIES_FILE", default_value = "counties.yaml")]
    pub counties: PathBuf,

    /// Collector webhook URL
    #[arg(long, env = "WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    /// Shared secret sent in the X-Webhook-Secret header
    #[arg(long, env = "WEBHOOK_SECRET", hide_env_values = true)]
    pub webhook_secret: Option<String>,

    /// Timeout per portal request in seconds
    #[arg(long, env = "REQUEST_TIMEOUT", default_value = "30")]
    pub timeout: u64,

    /// Timeout for the webhook delivery in seconds
    #[arg(long, default_value = "30")]
    pub webhook_timeout: u64,

    /// Directory for the per-county log file
    #[arg(long, env = "LOG_DIR", default_value = "logs")]
    pub log_dir: PathBuf,

    /// Log request-level detail
    #[arg(short, long)]
    pub verbose: bool,
}

/// Resolve `--date`, falling back to the day before `today`
pub fn parse_target_date(date: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    match date {
        Some(s) => {
            let invalid = || format!("Invalid date format: {}. Use MM/DD/YYYY.", s);
            // chrono tolerates whitespace, signs, and any year width; the portal
            // format is digits and slashes with a four-digit year
            let year = s.rsplit('/').next().unwrap_or_default();
            if !s.bytes().all(|b| b.is_ascii_digit() || b == b'/') || year.len() != 4 {
                bail!(invalid());
            }
            NaiveDate::parse_from_str(s, PORTAL_DATE_FORMAT).with_context(invalid)
        }
        None => today.pred_opt().context("No day before today"),
    }
}

fn webhook_config(args: &ScrapeArgs) -> Result<WebhookConfig> {
    let url = args
        .webhook_url
        .clone()
        .filter(|u| !u.is_empty())
        .context("Webhook URL not set (use --webhook-url or WEBHOOK_URL)")?;
    let secret = args
        .webhook_secret
        .clone()
        .context("Webhook secret not set (use --webhook-secret or WEBHOOK_SECRET)")?;

    Ok(WebhookConfig {
        url,
        secret,
        timeout: Duration::from_secs(args.webhook_timeout),
    })
}

/// Run one scrape; `Err` means the process should exit non-zero.
///
/// The error has already been logged when this returns.
pub async fn run_scraper(args: ScrapeArgs) -> Result<()> {
    logging::initialize(&args.log_dir, &args.county, args.verbose);

    info!("{}", "=".repeat(60));
    info!("Starting {} deed scraper", args.county);

    let outcome = match preflight_and_scrape(&args).await {
        Ok((result, webhook)) => finish(result, webhook.as_ref()).await,
        Err(e) => Err(e),
    };

    if let Err(e) = &outcome {
        error!("{:#}", e);
    }
    info!("{}", "=".repeat(60));
    outcome
}

/// Validate the run, then scrape; webhook settings are `None` in dry-run
async fn preflight_and_scrape(
    args: &ScrapeArgs,
) -> Result<(ScrapeResult, Option<WebhookConfig>)> {
    let target_date = parse_target_date(args.date.as_deref(), Local::now().date_naive())?;
    if args.date.is_some() {
        info!("Using specified date: {}", target_date);
    }

    let registry = CountyRegistry::load(&args.counties)?;
    let profile = registry.get(&args.county)?;

    let webhook = if args.dry_run {
        None
    } else {
        Some(webhook_config(args)?)
    };

    let result = scrape_deeds(profile, target_date, Duration::from_secs(args.timeout)).await;
    Ok((result, webhook))
}

async fn finish(result: ScrapeResult, webhook: Option<&WebhookConfig>) -> Result<()> {
    let Some(config) = webhook else {
        info!("DRY RUN - Not sending to webhook");
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    };

    // Deliver even on scrape error; the collector tracks failures too
    if !send_to_webhook(&result, config).await {
        bail!("Failed to deliver results to webhook");
    }

    info!("Scraper completed successfully");
    Ok(())
}
