//! Unauthenticated price snapshots from the chart endpoint.
//!
//! This is the degraded path: it needs no cookie or crumb, so it keeps working when the
//! session handshake does not.

mod params;
pub(crate) mod wire;

pub use params::{Interval, Range};

use futures::future::join_all;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};

use crate::core::net::{parse_json, status_error, symbol_url};
use crate::core::transport::HttpRequest;
use crate::core::{YfClient, YfError};
use crate::fundamentals::FundamentalsResult;
use crate::fundamentals::wire::{raw, text};
use wire::{ChartEnvelope, ChartResult, MetaNode};

/// A lightweight quote derived from chart metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub symbol: String,
    pub short_name: String,
    /// `0.0` when the upstream sends no price.
    pub regular_market_price: f64,
    /// Price change against the previous close.
    pub regular_market_change: f64,
    /// Percent change against the previous close; `0.0` when there is no previous close.
    pub regular_market_change_percent: f64,
    pub currency: Option<String>,
}

/// Chart metadata for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub symbol: String,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub currency: Option<String>,
    pub exchange_name: Option<String>,
    pub regular_market_price: Option<f64>,
    pub regular_market_volume: Option<f64>,
    pub chart_previous_close: Option<f64>,
}

/// A chart response as the upstream sends it: metadata plus raw bar columns.
///
/// The columns are index-aligned with `timestamps`; gaps are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub meta: ChartMeta,
    /// Bar open times, Unix seconds.
    pub timestamps: Vec<i64>,
    pub open: Vec<Option<f64>>,
    pub high: Vec<Option<f64>>,
    pub low: Vec<Option<f64>>,
    pub close: Vec<Option<f64>>,
    pub volume: Vec<Option<f64>>,
}

impl YfClient {
    /// Fetches a price-only snapshot for `ticker` without any session.
    ///
    /// The result has the same shape as [`YfClient::get_fundamentals`] but every
    /// fundamentals field is `None` and `source` is
    /// [`DataSource::PriceOnly`](crate::DataSource::PriceOnly).
    ///
    /// # Errors
    ///
    /// Returns [`YfError::Status`] for a non-200 response, [`YfError::Api`] if the chart
    /// envelope carries an error, and [`YfError::MalformedResponse`] if the body is not
    /// JSON or has no metadata.
    #[tracing::instrument(skip(self), err)]
    pub async fn get_price_only(&self, ticker: &str) -> Result<FundamentalsResult, YfError> {
        let ticker = ticker.trim();
        if ticker.is_empty() {
            return Err(YfError::InvalidTicker);
        }
        let meta = fetch_chart_meta(self, ticker).await?;
        Ok(FundamentalsResult::price_only(
            ticker,
            raw(meta.regular_market_price),
            raw(meta.regular_market_volume),
            text(meta.currency).unwrap_or_else(|| self.default_currency().to_string()),
        ))
    }

    /// Fetches the chart for `ticker` over `range` with bars of `interval`.
    ///
    /// Unauthenticated; returns the metadata and the raw bar columns untouched.
    ///
    /// # Errors
    ///
    /// Same as [`YfClient::get_price_only`].
    #[tracing::instrument(skip(self), err)]
    pub async fn chart(
        &self,
        ticker: &str,
        range: Range,
        interval: Interval,
    ) -> Result<ChartSeries, YfError> {
        let ticker = ticker.trim();
        if ticker.is_empty() {
            return Err(YfError::InvalidTicker);
        }
        let result = fetch_chart(self, ticker, range, interval).await?;
        let meta = result
            .meta
            .ok_or_else(|| YfError::MalformedResponse("chart result has no meta".into()))?;
        let block = result
            .indicators
            .and_then(|i| i.quote.into_iter().next())
            .unwrap_or_default();

        Ok(ChartSeries {
            meta: to_chart_meta(ticker, meta),
            timestamps: result.timestamp.unwrap_or_default(),
            open: block.open,
            high: block.high,
            low: block.low,
            close: block.close,
            volume: block.volume,
        })
    }

    /// Fetches price quotes for several tickers concurrently.
    ///
    /// Tickers whose chart fails to load are logged and left out; the rest keep their
    /// input order. A chart without a price is still reported, with a price of `0.0`.
    pub async fn quotes<I, S>(&self, tickers: I) -> Vec<PriceQuote>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tickers: Vec<String> = tickers
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        let results = join_all(tickers.iter().map(|t| fetch_chart_meta(self, t))).await;

        tickers
            .iter()
            .zip(results)
            .filter_map(|(ticker, res)| match res {
                Ok(meta) => Some(to_price_quote(ticker, meta)),
                Err(e) => {
                    tracing::warn!(ticker = %ticker, error = %e, "quote unavailable");
                    None
                }
            })
            .collect()
    }
}

fn to_price_quote(ticker: &str, meta: MetaNode) -> PriceQuote {
    let price = raw(meta.regular_market_price).unwrap_or(0.0);
    let prev_close = raw(meta.chart_previous_close).unwrap_or(0.0);
    let change = price - prev_close;
    let change_percent = if prev_close > 0.0 {
        change / prev_close * 100.0
    } else {
        0.0
    };
    let symbol = text(meta.symbol).unwrap_or_else(|| ticker.to_string());

    PriceQuote {
        short_name: text(meta.short_name)
            .or_else(|| text(meta.long_name))
            .unwrap_or_else(|| symbol.clone()),
        symbol,
        regular_market_price: price,
        regular_market_change: change,
        regular_market_change_percent: change_percent,
        currency: text(meta.currency),
    }
}

fn to_chart_meta(ticker: &str, meta: MetaNode) -> ChartMeta {
    ChartMeta {
        symbol: text(meta.symbol).unwrap_or_else(|| ticker.to_string()),
        short_name: text(meta.short_name),
        long_name: text(meta.long_name),
        currency: text(meta.currency),
        exchange_name: text(meta.exchange_name),
        regular_market_price: raw(meta.regular_market_price),
        regular_market_volume: raw(meta.regular_market_volume),
        chart_previous_close: raw(meta.chart_previous_close),
    }
}

/// Today's snapshot metadata, as used by the price-only and quote paths.
async fn fetch_chart_meta(client: &YfClient, ticker: &str) -> Result<MetaNode, YfError> {
    fetch_chart(client, ticker, Range::D1, Interval::D1)
        .await?
        .meta
        .ok_or_else(|| YfError::MalformedResponse("chart result has no meta".into()))
}

async fn fetch_chart(
    client: &YfClient,
    ticker: &str,
    range: Range,
    interval: Interval,
) -> Result<ChartResult, YfError> {
    let mut url = symbol_url(client.base_chart(), ticker)?;
    url.query_pairs_mut()
        .append_pair("range", range.as_str())
        .append_pair("interval", interval.as_str());

    let req = HttpRequest::get(url.clone()).with_header(ACCEPT.as_str(), "application/json");
    let resp = client.transport().execute(req).await?;
    if resp.status != 200 {
        return Err(status_error(resp.status, &url));
    }

    let body = parse_json(&resp, "chart")?;
    let env: ChartEnvelope = serde_json::from_value(body)
        .map_err(|e| YfError::MalformedResponse(format!("chart envelope: {e}")))?;
    let chart = env
        .chart
        .ok_or_else(|| YfError::MalformedResponse("chart node missing".into()))?;

    if let Some(err) = chart.error {
        return Err(YfError::Api(
            err.description
                .or(err.code)
                .unwrap_or_else(|| "unknown chart error".into()),
        ));
    }

    chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| YfError::MalformedResponse("chart has no result".into()))
}
