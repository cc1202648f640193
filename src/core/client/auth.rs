//! Cookie & crumb acquisition for Yahoo endpoints.

use reqwest::header::{COOKIE, SET_COOKIE};

use super::constants::FULL_PAGE_MIN_HEADER_BYTES;
use crate::core::error::{AcquisitionFailure, YfError};
use crate::core::session::Session;
use crate::core::transport::HttpRequest;

/// Where the session cookie is obtained from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CookieStrategy {
    /// GET the Finance homepage. Reliable, but its response headers are huge.
    FullPage,
    /// GET the minimal cookie endpoint. Small headers, same cookie.
    #[default]
    Lightweight,
}

impl super::YfClient {
    /// The cached session, or a fresh one from a full cookie + crumb handshake.
    pub(crate) async fn ensure_session(&self) -> Result<Session, YfError> {
        let ttl = self.inner.session_ttl;
        self.inner
            .sessions
            .get_or_acquire(ttl, || async {
                let cookie = self.acquire_cookie().await?;
                let crumb = self.acquire_crumb(&cookie).await?;
                Ok::<_, YfError>((cookie, crumb))
            })
            .await
    }

    pub(crate) async fn invalidate_session(&self) {
        self.inner.sessions.invalidate().await;
    }

    /// Obtain the session cookie using the configured strategy.
    pub(crate) async fn acquire_cookie(&self) -> Result<String, YfError> {
        let url = match self.inner.cookie_strategy {
            CookieStrategy::FullPage => {
                let limit = self.inner.transport.max_response_header_bytes();
                if limit < FULL_PAGE_MIN_HEADER_BYTES {
                    return Err(AcquisitionFailure::HeadersTooLarge {
                        limit,
                        required: FULL_PAGE_MIN_HEADER_BYTES,
                    }
                    .into());
                }
                self.inner.full_page_url.clone()
            }
            CookieStrategy::Lightweight => self.inner.cookie_url.clone(),
        };

        tracing::debug!(strategy = ?self.inner.cookie_strategy, "requesting session cookie");
        // The status is irrelevant here: the lightweight endpoint sets the cookie on a 404.
        let resp = self.inner.transport.execute(HttpRequest::get(url)).await?;

        let cookie = join_set_cookies(resp.header_values(SET_COOKIE.as_str()))
            .ok_or(AcquisitionFailure::NoCookie)?;
        Ok(cookie)
    }

    /// Exchange a session cookie for a crumb.
    pub(crate) async fn acquire_crumb(&self, cookie: &str) -> Result<String, YfError> {
        let req = HttpRequest::get(self.inner.crumb_url.clone()).with_header(COOKIE.as_str(), cookie);
        let resp = self.inner.transport.execute(req).await?;

        if resp.status != 200 {
            tracing::debug!(status = resp.status, "crumb endpoint rejected cookie");
            return Err(AcquisitionFailure::CrumbRejected {
                status: resp.status,
            }
            .into());
        }

        let crumb = resp.body.trim();
        if crumb.is_empty() || crumb.contains("Unauthorized") || crumb.starts_with('<') {
            return Err(AcquisitionFailure::CrumbMalformed.into());
        }
        Ok(crumb.to_string())
    }
}

/// `name=value` of each `set-cookie` value joined with `"; "`; attributes are dropped.
pub(crate) fn join_set_cookies<'a>(values: impl Iterator<Item = &'a str>) -> Option<String> {
    let pairs: Vec<&str> = values
        .filter_map(|v| v.split(';').next())
        .map(str::trim)
        .filter(|p| p.contains('='))
        .collect();
    if pairs.is_empty() {
        None
    } else {
        Some(pairs.join("; "))
    }
}
