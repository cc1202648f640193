use reqwest::header::{ACCEPT, COOKIE};
use serde_json::Value;

use super::FundamentalsResult;
use super::normalize::normalize;
use super::wire::envelope_error;
use crate::core::client::{AuthFallback, FUNDAMENTALS_MODULES};
use crate::core::net::{parse_json, status_error, symbol_url};
use crate::core::session::Session;
use crate::core::transport::HttpRequest;
use crate::core::{YfClient, YfError};

/// Where the fetch currently stands.
enum State {
    NoSession,
    HasSession(Session),
}

/// What a single quoteSummary request produced.
enum Attempt {
    Body(Value),
    AuthExpired,
}

/// Run the fetch state machine for one call.
///
/// `NoSession -> HasSession` via the session cache (handshake on miss);
/// `HasSession -> NoSession` on an auth-expired response, at most once per call.
pub(super) async fn fetch_fundamentals(
    client: &YfClient,
    ticker: &str,
) -> Result<FundamentalsResult, YfError> {
    let mut state = State::NoSession;
    let mut refreshed = false;

    loop {
        state = match state {
            State::NoSession => match client.ensure_session().await {
                Ok(session) => State::HasSession(session),
                Err(e) if client.auth_fallback() == AuthFallback::PriceOnly => {
                    tracing::warn!(error = %e, "session unavailable, degrading to price-only");
                    return client.get_price_only(ticker).await;
                }
                Err(e) => return Err(e),
            },
            State::HasSession(session) => match attempt(client, ticker, &session).await? {
                Attempt::Body(body) => {
                    return Ok(normalize(&body, ticker, client.default_currency()));
                }
                Attempt::AuthExpired => {
                    client.invalidate_session().await;
                    if refreshed {
                        return Err(YfError::AuthExpired);
                    }
                    tracing::warn!("session rejected by upstream, refreshing once");
                    refreshed = true;
                    State::NoSession
                }
            },
        };
    }
}

async fn attempt(client: &YfClient, ticker: &str, session: &Session) -> Result<Attempt, YfError> {
    let mut url = symbol_url(client.base_quote_api(), ticker)?;
    url.query_pairs_mut()
        .append_pair("modules", FUNDAMENTALS_MODULES)
        .append_pair("crumb", session.crumb());

    let req = HttpRequest::get(url.clone())
        .with_header(ACCEPT.as_str(), "application/json")
        .with_header(COOKIE.as_str(), session.cookie());
    let resp = client.transport().execute(req).await?;

    match resp.status {
        200 => {}
        401 => return Ok(Attempt::AuthExpired),
        status => return Err(status_error(status, &url)),
    }

    let body = parse_json(&resp, "quoteSummary")?;

    if let Some(err) = envelope_error(&body) {
        let desc = err
            .description
            .or(err.code)
            .unwrap_or_else(|| "unknown error".into());
        // Yahoo sometimes reports an expired crumb in-band with a 200.
        if desc.to_ascii_lowercase().contains("invalid crumb") {
            return Ok(Attempt::AuthExpired);
        }
        return Err(YfError::Api(desc));
    }

    Ok(Attempt::Body(body))
}
