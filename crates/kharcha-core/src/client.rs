//! HTTP client for the analysis endpoints
//!
//! [`AnalysisClient`] talks to a running `kharcha serve`. A 204 response is
//! "no data for the period" and comes back as `Ok(None)`; anything else
//! outside 2xx becomes [`Error::Api`].
//!
//! [`PeriodView`] holds what a front end shows for the selected period. Each
//! selection takes a ticket from a [`RequestSequencer`]; a response is applied
//! only if its ticket is still the latest, so switching periods quickly never
//! lets an older response overwrite a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{AnalysisData, MonthlyAnalysisRequest, Period, YearlyAnalysisRequest};

/// Request timeout for analysis calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for `POST /api/expenses/{monthly,yearly}-analysis`
#[derive(Clone)]
pub struct AnalysisClient {
    http_client: Client,
    base_url: String,
}

impl AnalysisClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http_client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Analysis for one month
    pub async fn monthly(&self, month: u32, year: i32) -> Result<Option<AnalysisData>> {
        self.post(
            "/api/expenses/monthly-analysis",
            &MonthlyAnalysisRequest { month, year },
        )
        .await
    }

    /// Analysis for a whole year
    pub async fn yearly(&self, year: i32) -> Result<Option<AnalysisData>> {
        self.post("/api/expenses/yearly-analysis", &YearlyAnalysisRequest { year })
            .await
    }

    /// Dispatch on the period granularity
    pub async fn analyze(&self, period: &Period) -> Result<Option<AnalysisData>> {
        match *period {
            Period::Month { year, month } => self.monthly(month, year).await,
            Period::Year { year } => self.yearly(year).await,
        }
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<Option<AnalysisData>> {
        let response = self
            .http_client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            debug!(path, "No analysis data for period");
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body: error_detail(&body),
            });
        }

        let data: AnalysisData = response.json().await?;
        data.check_consistency()?;
        Ok(Some(data))
    }
}

/// Pull `error` out of a `{"error": ...}` body, else return the body as-is
fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

/// Issues monotonically increasing request tickets
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding every earlier ticket
    pub fn next(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// True only for the most recently issued ticket
    pub fn accept(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }

    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }
}

/// What is on screen for the selected period
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// Nothing selected yet
    Idle,
    Loading,
    Loaded(AnalysisData),
    /// No expenses in the period, or the last request failed
    NoData,
}

/// Selected period plus the response currently displayed for it
#[derive(Debug)]
pub struct PeriodView {
    sequencer: RequestSequencer,
    period: Option<Period>,
    state: ViewState,
    last_error: Option<String>,
}

impl Default for PeriodView {
    fn default() -> Self {
        Self {
            sequencer: RequestSequencer::new(),
            period: None,
            state: ViewState::Idle,
            last_error: None,
        }
    }
}

impl PeriodView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a period and begin a request for it
    pub fn select(&mut self, period: Period) -> u64 {
        self.period = Some(period);
        self.state = ViewState::Loading;
        self.last_error = None;
        self.sequencer.next()
    }

    /// Apply a response. Returns false when the ticket was superseded and the
    /// response was dropped.
    pub fn resolve(&mut self, ticket: u64, result: Result<Option<AnalysisData>>) -> bool {
        if !self.sequencer.accept(ticket) {
            debug!(ticket, latest = self.sequencer.latest(), "Dropping stale response");
            return false;
        }

        match result {
            Ok(Some(data)) if !data.categories.is_empty() => {
                self.state = ViewState::Loaded(data);
            }
            Ok(_) => self.state = ViewState::NoData,
            Err(e) => {
                warn!("Analysis request failed: {}", e);
                self.state = ViewState::NoData;
                self.last_error = Some(e.to_string());
            }
        }
        true
    }

    /// Select `period`, fetch it, and apply the response
    pub async fn load(&mut self, client: &AnalysisClient, period: Period) -> &ViewState {
        let ticket = self.select(period);
        let result = client.analyze(&period).await;
        self.resolve(ticket, result);
        &self.state
    }

    pub fn period(&self) -> Option<&Period> {
        self.period.as_ref()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn data(&self) -> Option<&AnalysisData> {
        match &self.state {
            ViewState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    /// Message from the last failed request, if any
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
