//! Symbol lookup through the public search endpoint.

pub(crate) mod wire;

use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};

use crate::core::net::{parse_json, status_error};
use crate::core::transport::HttpRequest;
use crate::core::{YfClient, YfError};
use crate::fundamentals::wire::{lenient, text};
use wire::{V1SearchEnvelope, V1SearchQuote};

/// Number of quote matches requested per search.
const QUOTES_COUNT: &str = "15";

/// One symbol matching a search query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuote {
    pub symbol: String,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    /// Exchange code, e.g. `OSL`.
    pub exchange: Option<String>,
    /// Exchange display name, e.g. `Oslo`.
    pub exchange_display: Option<String>,
    /// e.g. `EQUITY`, `ETF`, `MUTUALFUND`.
    pub quote_type: Option<String>,
    pub type_display: Option<String>,
}

impl YfClient {
    /// Searches for symbols matching `query`.
    ///
    /// A blank query returns an empty list without touching the network. Matches
    /// without a symbol are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`YfError::Status`] for a non-200 response and
    /// [`YfError::MalformedResponse`] if the body is not a search envelope.
    #[tracing::instrument(skip(self), err)]
    pub async fn search(&self, query: &str) -> Result<Vec<SearchQuote>, YfError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let mut url = self.base_search().clone();
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("quotesCount", QUOTES_COUNT)
            .append_pair("newsCount", "0");

        let req = HttpRequest::get(url.clone()).with_header(ACCEPT.as_str(), "application/json");
        let resp = self.transport().execute(req).await?;
        if resp.status != 200 {
            return Err(status_error(resp.status, &url));
        }

        let body = parse_json(&resp, "search")?;
        let env: V1SearchEnvelope = serde_json::from_value(body)
            .map_err(|e| YfError::MalformedResponse(format!("search envelope: {e}")))?;

        let quotes = env
            .quotes
            .unwrap_or_default()
            .iter()
            .filter_map(|q| to_search_quote(lenient(Some(q))))
            .collect::<Vec<_>>();
        tracing::debug!(matches = quotes.len(), "search complete");
        Ok(quotes)
    }
}

fn to_search_quote(q: V1SearchQuote) -> Option<SearchQuote> {
    Some(SearchQuote {
        symbol: text(q.symbol)?,
        short_name: text(q.shortname),
        long_name: text(q.longname),
        exchange: text(q.exchange),
        exchange_display: text(q.exch_disp),
        quote_type: text(q.quote_type),
        type_display: text(q.type_disp),
    })
}
