use super::util::with_retry;
use crate::core::currency::CurrencyRateProvider;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

const RETRY_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    rates: HashMap<String, Value>,
}

fn round_rate(rate: f64) -> f64 {
    (rate * 10_000.0).round() / 10_000.0
}

/// Fetches latest rates from an exchangerate-api.com compatible endpoint
/// (`GET {base_url}/v4/latest/{from}`).
pub struct ExchangeRateApiProvider {
    base_url: String,
    client: reqwest::Client,
    retries: usize,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("mindbank/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            retries: 0,
        })
    }

    pub fn with_retries(mut self, retries: usize) -> Self {
        self.retries = retries;
        self
    }
}

#[async_trait]
impl CurrencyRateProvider for ExchangeRateApiProvider {
    #[instrument(name = "ExchangeRateFetch", skip(self))]
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64> {
        let url = format!("{}/v4/latest/{}", self.base_url, from);
        debug!("Requesting exchange rates from {}", url);

        let response = with_retry(|| self.client.get(&url).send(), self.retries, RETRY_DELAY)
            .await
            .map_err(|e| anyhow!("Request error: {} for currency pair: {}{}", e, from, to))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for currency pair: {}{}",
                response.status(),
                from,
                to
            ));
        }

        let text = response.text().await?;
        let data: LatestRatesResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}{}: {}", from, to, e))?;

        let rate = data
            .rates
            .get(to)
            .ok_or_else(|| anyhow!("No rate found for currency pair: {}{}", from, to))?
            .as_f64()
            .ok_or_else(|| anyhow!("Non-numeric rate for currency pair: {}{}", from, to))?;

        if !rate.is_finite() || rate <= 0.0 {
            return Err(anyhow!(
                "Invalid rate {} for currency pair: {}{}",
                rate,
                from,
                to
            ));
        }

        Ok(round_rate(rate))
    }
}
