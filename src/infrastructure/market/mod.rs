// src/infrastructure/market/mod.rs
// Daily price history from the Yahoo Finance chart endpoint

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use hyper::client::HttpConnector;
use hyper::header::{ACCEPT, USER_AGENT};
use hyper::{Body, Client, Request, StatusCode};
use hyper_tls::HttpsConnector;
use std::time::Duration;

use crate::application::dto::parser::parse_chart;
use crate::config::ProviderConfig;
use crate::domain::errors::{ProviderError, ProviderResult};
use crate::domain::models::PriceSeries;
use crate::domain::repository::PriceProvider;

/// Longest error body, in characters, kept in an `Http` error.
const MAX_ERROR_BODY: usize = 256;

pub struct YahooPriceProvider {
    client: Client<HttpsConnector<HttpConnector>, Body>,
    base_url: String,
    user_agent: String,
    timeout: Duration,
    adjusted: bool,
}

impl YahooPriceProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        let client = Client::builder().build::<_, Body>(HttpsConnector::new());

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            adjusted: config.adjusted,
        }
    }

    /// Chart URL for daily bars from `start` 00:00 UTC up to, not including,
    /// `end` 00:00 UTC.
    pub fn chart_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d&includeAdjustedClose=true&events=div%2Csplits",
            self.base_url,
            encode_symbol(symbol),
            midnight_utc(start),
            midnight_utc(end),
        )
    }

    async fn get(&self, url: &str) -> ProviderResult<(StatusCode, Vec<u8>)> {
        let request = Request::get(url)
            .header(USER_AGENT, self.user_agent.as_str())
            .header(ACCEPT, "application/json")
            .body(Body::empty())
            .map_err(|e| ProviderError::Request(format!("Invalid request: {}", e)))?;

        let response = self.client.request(request).await?;
        let status = response.status();
        let body = hyper::body::to_bytes(response.into_body()).await?;

        Ok((status, body.to_vec()))
    }
}

#[async_trait]
impl PriceProvider for YahooPriceProvider {
    fn name(&self) -> &str {
        "yahoo"
    }

    async fn daily_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ProviderResult<PriceSeries> {
        if symbol.trim().is_empty() {
            return Err(ProviderError::InvalidSymbol(symbol.to_string()));
        }

        let url = self.chart_url(symbol, start, end);
        log::debug!("GET {}", url);

        let (status, body) = tokio::time::timeout(self.timeout, self.get(&url))
            .await
            .map_err(|_| ProviderError::Timeout(self.timeout.as_secs()))??;

        let bars = match status {
            s if s.is_success() => parse_chart(symbol, &body, self.adjusted)?,
            StatusCode::NOT_FOUND => {
                log::debug!("{} returned 404; treating as unknown symbol", symbol);
                Vec::new()
            }
            s => {
                return Err(ProviderError::Http {
                    status: s.as_u16(),
                    body: error_excerpt(&body),
                });
            }
        };

        let in_range: Vec<_> = bars
            .into_iter()
            .filter(|bar| bar.date >= start && bar.date < end)
            .collect();
        log::debug!("{}: {} rows in range", symbol, in_range.len());

        Ok(PriceSeries::from_bars(symbol, in_range))
    }
}

/// Start of an error body, cut on a character boundary.
fn error_excerpt(body: &[u8]) -> String {
    String::from_utf8_lossy(body).chars().take(MAX_ERROR_BODY).collect()
}

fn midnight_utc(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// Percent-encodes a ticker for use as a path segment (`^GSPC` -> `%5EGSPC`).
fn encode_symbol(symbol: &str) -> String {
    let mut out = String::with_capacity(symbol.len());
    for byte in symbol.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'=' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
