use url::Url;

use crate::core::YfError;
use crate::core::transport::HttpResponse;

/// The URL as a string with the `crumb` query value masked.
pub(crate) fn redact_url(url: &Url) -> String {
    if !url.query_pairs().any(|(k, _)| k == "crumb") {
        return url.to_string();
    }
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "crumb" { "***".into() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    let mut out = url.clone();
    out.query_pairs_mut().clear().extend_pairs(pairs);
    out.to_string()
}

/// Parse a response body as JSON; `what` names the endpoint in the error message.
pub(crate) fn parse_json(resp: &HttpResponse, what: &str) -> Result<serde_json::Value, YfError> {
    serde_json::from_str(&resp.body)
        .map_err(|e| YfError::MalformedResponse(format!("{what} json parse: {e}")))
}

/// `base` with `symbol` appended as one percent-encoded path segment.
///
/// The symbol never changes the host, the query or the fragment of `base`.
pub(crate) fn symbol_url(base: &Url, symbol: &str) -> Result<Url, YfError> {
    if symbol == "." || symbol == ".." {
        return Err(YfError::InvalidTicker);
    }
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| YfError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
        .pop_if_empty()
        .push(symbol);
    Ok(url)
}

pub(crate) fn status_error(status: u16, url: &Url) -> YfError {
    YfError::Status {
        status,
        url: redact_url(url),
    }
}
