//! Reports fetched from a running server
//!
//! Goes through `PeriodView` so failures behave the way a front end would
//! show them: the view falls back to "no data" and the error is reported.

use anyhow::Result;
use kharcha_core::client::{AnalysisClient, PeriodView};
use kharcha_core::config::Settings;
use kharcha_core::models::Period;

use super::print_analysis;

pub async fn cmd_fetch(
    url: &str,
    period: Period,
    settings: &Settings,
    json: bool,
    show_tags: bool,
) -> Result<()> {
    let client = AnalysisClient::new(url)?;
    let mut view = PeriodView::new();

    tracing::debug!(url = client.base_url(), period = %period, "Fetching analysis");
    view.load(&client, period).await;

    print_analysis(view.data(), &period, &settings.currency, json, show_tags)?;

    if let Some(err) = view.last_error() {
        anyhow::bail!("❌ {}", err);
    }
    Ok(())
}
