//! CoinGecko price fetching with a guaranteed-fallback contract
//!
//! By the time a fetch happens, the schedule has already committed to "this
//! hour runs", so an upstream failure must not erase that commitment. The
//! fetcher therefore never surfaces an error: every failure path collapses
//! into `FetchOutcome::Fallback`, and the store still appends a sentinel row
//! for the planned hour.
use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;

use crate::config::Config;
use crate::logger::{self, LogTag};

/// Sentinel written to the CSV when a price could not be fetched
pub const PRICE_UNAVAILABLE: &str = "N/A";

/// Response shape of `/simple/price`: asset id -> quote currency -> price
type PriceMap = HashMap<String, HashMap<String, f64>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSnapshot(PriceMap);

impl PriceSnapshot {
    pub fn price(&self, asset_id: &str, quote: &str) -> Option<f64> {
        self.0.get(asset_id).and_then(|quotes| quotes.get(quote)).copied()
    }
}

impl From<PriceMap> for PriceSnapshot {
    fn from(map: PriceMap) -> Self {
        Self(map)
    }
}

/// Which path the fetch took. `Fallback` still produces a CSV row, just with
/// sentinel prices, so callers and tests can observe the failure path
/// directly instead of sniffing sentinel values.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Live(PriceSnapshot),
    Fallback,
}

impl FetchOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self, FetchOutcome::Fallback)
    }

    /// Price lookup that treats the fallback path as "no price"
    pub fn price(&self, asset_id: &str, quote: &str) -> Option<f64> {
        match self {
            FetchOutcome::Live(snapshot) => snapshot.price(asset_id, quote),
            FetchOutcome::Fallback => None,
        }
    }
}

/// Price API client, one bounded-time GET per invocation
pub struct PriceFetcher {
    client: Client,
    api_url: String,
    ids: String,
    quote: String,
}

impl PriceFetcher {
    pub fn new(cfg: &Config) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(cfg.request_timeout_secs))
                .user_agent("pricetracker/0.1")
                .build()
                .expect("Failed to create HTTP client"),
            api_url: cfg.api_url.clone(),
            ids: format!("{},{}", cfg.primary.id, cfg.secondary.id),
            quote: cfg.quote_currency.clone(),
        }
    }

    /// Fetches spot prices for both assets. Never errors: any failure is
    /// logged as a warning and mapped to `FetchOutcome::Fallback`. No retry
    /// within an invocation; the next planned hour is the retry.
    pub async fn fetch(&self) -> FetchOutcome {
        let url = format!(
            "{}?ids={}&vs_currencies={}",
            self.api_url, self.ids, self.quote
        );
        logger::debug(LogTag::Api, &format!("GET {}", url));

        match self.request(&url).await {
            Ok(snapshot) => {
                logger::debug(
                    LogTag::Api,
                    &format!("Price API returned {} asset(s)", snapshot.0.len()),
                );
                FetchOutcome::Live(snapshot)
            }
            Err(e) => {
                logger::warning(
                    LogTag::Api,
                    &format!("Price API unavailable: {}. Recording {}.", e, PRICE_UNAVAILABLE),
                );
                FetchOutcome::Fallback
            }
        }
    }

    async fn request(&self, url: &str) -> Result<PriceSnapshot, String> {
        let response = self.client
            .get(url)
            .header("accept", "application/json")
            .send().await
            .map_err(|e| format!("request failed: {}", e))?;

        let response = response
            .error_for_status()
            .map_err(|e| format!("non-success status: {}", e))?;

        // Anything that is not an object-of-objects-of-numbers is a failure
        let parsed: PriceMap = response
            .json().await
            .map_err(|e| format!("unexpected response shape: {}", e))?;

        Ok(PriceSnapshot(parsed))
    }
}
