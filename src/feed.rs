//! Client for the DSE latest-share-price feed.
//!
//! The feed is a JSON array of per-company rows; the index value we care
//! about rides along as a pseudo-company named `DSEX` whose `ClosePrice`
//! is a comma-grouped decimal string. Failures are returned as a typed
//! [`FeedError`] so the caller decides what to substitute.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use crate::config::Config;

pub const INDEX_NAME: &str = "DSEX";

const FEED_PATH: &str = "latest_share_price_all.json";

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("feed returned HTTP {0}")]
    HttpStatus(StatusCode),
    #[error("feed parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct SharePriceRow {
    #[serde(rename = "CompanyName", default)]
    pub company_name: String,
    #[serde(rename = "ClosePrice", default)]
    pub close_price: String,
}

/// Seam for the index source so handlers can be driven by stubs in tests.
#[async_trait]
pub trait IndexFeed: Send + Sync {
    async fn latest_close(&self) -> Result<f64, FeedError>;
}

pub struct DseFeed {
    client: Client,
    base: String,
}

impl DseFeed {
    pub fn new(cfg: &Config) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(cfg.feed_timeout_secs))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base: cfg.dse_base.clone(),
        }
    }
}

#[async_trait]
impl IndexFeed for DseFeed {
    async fn latest_close(&self) -> Result<f64, FeedError> {
        let url = format!("{}/{}", self.base.trim_end_matches('/'), FEED_PATH);
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::HttpStatus(status));
        }
        let body = resp.text().await?;
        let rows: Vec<SharePriceRow> = serde_json::from_str(&body)
            .map_err(|e| FeedError::Parse(format!("bad feed json: {}", e)))?;
        index_close_from_rows(&rows)
    }
}

/// Pick the index row out of the feed and parse its closing price.
/// Order-independent, first match wins.
pub fn index_close_from_rows(rows: &[SharePriceRow]) -> Result<f64, FeedError> {
    let row = rows
        .iter()
        .find(|r| r.company_name == INDEX_NAME)
        .ok_or_else(|| FeedError::Parse(format!("no {} row in feed", INDEX_NAME)))?;
    parse_grouped_decimal(&row.close_price)
}

/// Parse a decimal that may carry thousands-separator commas ("6,750.25").
pub fn parse_grouped_decimal(raw: &str) -> Result<f64, FeedError> {
    raw.replace(',', "")
        .trim()
        .parse::<f64>()
        .map_err(|_| FeedError::Parse(format!("bad decimal {:?}", raw)))
}
