//! Authenticated fundamentals snapshots.
//!
//! [`YfClient::get_fundamentals`] runs the crumb handshake when needed, fetches the
//! `defaultKeyStatistics`, `summaryDetail`, `financialData` and `price` modules from
//! quoteSummary, and flattens them into a [`FundamentalsResult`].

mod fetch;
mod normalize;
pub(crate) mod wire;

pub use normalize::normalize;
pub use wire::raw_value;

use serde::{Deserialize, Serialize};

use crate::core::client::CacheMode;
use crate::core::{YfClient, YfError};

/// Where a [`FundamentalsResult`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataSource {
    /// Full fundamentals from the crumb-authenticated quoteSummary endpoint.
    Authenticated,
    /// Price data only from the public chart endpoint; every fundamentals field is `None`.
    PriceOnly,
}

/// A flat fundamentals snapshot for one ticker.
///
/// Serializes with camelCase keys; every key is always present and absent values are
/// written as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundamentalsResult {
    pub market_cap: Option<f64>,
    /// Trailing price/earnings.
    pub pe: Option<f64>,
    pub forward_pe: Option<f64>,
    /// Price/book.
    pub pb: Option<f64>,
    /// Price/sales, trailing twelve months.
    pub ps: Option<f64>,
    pub peg: Option<f64>,

    pub eps: Option<f64>,
    /// Book value per share.
    pub book_value: Option<f64>,

    /// Dividend yield as a fraction (`0.045` is 4.5 %).
    pub dividend_yield: Option<f64>,
    pub dividend_per_share: Option<f64>,

    pub revenue: Option<f64>,
    pub ebitda: Option<f64>,
    /// Net profit margin as a fraction.
    pub profit_margin: Option<f64>,

    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,

    pub beta: Option<f64>,
    /// Current regular-market price.
    pub price: Option<f64>,
    /// Current regular-market volume.
    pub volume: Option<f64>,

    /// Display name; the ticker itself when the upstream names none.
    pub short_name: String,
    /// ISO currency code.
    pub currency: String,
    pub source: DataSource,
}

impl FundamentalsResult {
    /// A price-only result: every fundamentals field is `None`.
    #[must_use]
    pub fn price_only(
        ticker: &str,
        price: Option<f64>,
        volume: Option<f64>,
        currency: String,
    ) -> Self {
        Self {
            market_cap: None,
            pe: None,
            forward_pe: None,
            pb: None,
            ps: None,
            peg: None,
            eps: None,
            book_value: None,
            dividend_yield: None,
            dividend_per_share: None,
            revenue: None,
            ebitda: None,
            profit_margin: None,
            fifty_two_week_high: None,
            fifty_two_week_low: None,
            beta: None,
            price,
            volume,
            short_name: ticker.to_string(),
            currency,
            source: DataSource::PriceOnly,
        }
    }

    /// True when this result came from the degraded price-only path.
    #[must_use]
    pub fn is_price_only(&self) -> bool {
        self.source == DataSource::PriceOnly
    }
}

impl YfClient {
    /// Fetches a fundamentals snapshot for `ticker`.
    ///
    /// Uses the cached session when one is valid and otherwise performs the cookie and
    /// crumb handshake. If the upstream rejects the session with a 401, the session is
    /// dropped and the request is retried exactly once with a fresh one.
    ///
    /// With [`AuthFallback::PriceOnly`](crate::AuthFallback::PriceOnly), a failed
    /// handshake yields a price-only result (see [`YfClient::get_price_only`]) instead
    /// of an error.
    ///
    /// # Errors
    ///
    /// - [`YfError::InvalidTicker`] for an empty ticker.
    /// - [`YfError::Acquisition`] if no session could be established.
    /// - [`YfError::AuthExpired`] if the retry is rejected as well.
    /// - [`YfError::Status`] for any other non-200 status.
    /// - [`YfError::MalformedResponse`] if the body is not JSON.
    pub async fn get_fundamentals(&self, ticker: &str) -> Result<FundamentalsResult, YfError> {
        self.get_fundamentals_with(ticker, CacheMode::Use).await
    }

    /// Like [`YfClient::get_fundamentals`], with explicit control over the result cache
    /// (only relevant when the client was built with `cache_ttl`).
    ///
    /// # Errors
    ///
    /// See [`YfClient::get_fundamentals`].
    #[tracing::instrument(skip(self), err)]
    pub async fn get_fundamentals_with(
        &self,
        ticker: &str,
        cache_mode: CacheMode,
    ) -> Result<FundamentalsResult, YfError> {
        let ticker = ticker.trim();
        if ticker.is_empty() {
            return Err(YfError::InvalidTicker);
        }

        if cache_mode == CacheMode::Use
            && let Some(hit) = self.cache_get(ticker).await
        {
            tracing::debug!("fundamentals served from result cache");
            return Ok(hit);
        }

        let result = fetch::fetch_fundamentals(self, ticker).await?;

        // Degraded results are never cached.
        if cache_mode != CacheMode::Bypass && !result.is_price_only() {
            self.cache_put(ticker, &result).await;
        }
        Ok(result)
    }
}
