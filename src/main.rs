//! deed-scraper CLI
//!
//! Scrapes one day of deed recordings from a county recorder portal and
//! sends them to the collector webhook.
//!
//! Cron example (7:30 AM daily):
//!   30 7 * * * deed-scraper --county dauphin >> logs/cron.log 2>&1

use clap::Parser;
use deed_scraper::{run_scraper, ScrapeArgs};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "deed-scraper")]
#[command(author = "Laeder Data")]
#[command(version)]
#[command(about = "Scrape county deed records and send them to the collector webhook")]
#[command(long_about = "Scrapes one day of deed recordings from a county recorder portal.\n\nExamples:\n  deed-scraper                     Scrape yesterday's deeds\n  deed-scraper --date 12/31/2025   Scrape a specific date\n  deed-scraper --dry-run           Scrape but print instead of sending")]
struct Cli {
    #[command(flatten)]
    args: ScrapeArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // run_scraper has already logged the failure
    match run_scraper(cli.args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
