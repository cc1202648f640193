//! Public client surface + builder.
//! Internals are split into `auth` (cookie/crumb) and `constants` (UA + defaults).

pub(crate) mod auth;
mod constants;

use crate::core::YfError;
use crate::core::session::{Clock, SESSION_TTL, SessionCache, SystemClock};
use crate::core::transport::{HttpTransport, ReqwestTransport};
use crate::fundamentals::FundamentalsResult;
pub use auth::CookieStrategy;
pub(crate) use constants::FUNDAMENTALS_MODULES;
use constants::{
    DEFAULT_BASE_CHART, DEFAULT_BASE_QUOTE_API, DEFAULT_BASE_SEARCH, DEFAULT_COOKIE_URL, DEFAULT_CRUMB_URL,
    DEFAULT_CURRENCY, DEFAULT_FULL_PAGE_URL, USER_AGENT,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use url::Url;

/// What `get_fundamentals` does when no session can be established.
///
/// This is a deployment decision: it changes what callers get back, so it is fixed
/// when the client is built rather than chosen per request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthFallback {
    /// Surface the acquisition error.
    #[default]
    Fail,
    /// Serve a price-only snapshot from the unauthenticated chart endpoint.
    PriceOnly,
}

/// Defines the behavior of the in-memory result cache for a call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheMode {
    /// Read from the cache if a non-expired entry is present; otherwise, fetch from the network
    /// and write the result to the cache. (Default)
    Use,
    /// Always fetch from the network, bypassing any cached entry, and write the new result to the cache.
    Refresh,
    /// Always fetch from the network and do not read from or write to the cache.
    Bypass,
}

#[derive(Debug)]
struct CacheEntry {
    result: FundamentalsResult,
    expires_at: Instant,
}

#[derive(Debug)]
struct CacheStore {
    map: RwLock<HashMap<String, CacheEntry>>,
    default_ttl: Duration,
}

pub(crate) struct ClientInner {
    pub(crate) transport: Arc<dyn HttpTransport>,
    pub(crate) sessions: SessionCache,
    pub(crate) session_ttl: chrono::Duration,
    pub(crate) cookie_strategy: CookieStrategy,
    pub(crate) full_page_url: Url,
    pub(crate) cookie_url: Url,
    pub(crate) crumb_url: Url,
    pub(crate) base_quote_api: Url,
    pub(crate) base_chart: Url,
    pub(crate) base_search: Url,
    pub(crate) auth_fallback: AuthFallback,
    pub(crate) default_currency: String,
    cache: Option<CacheStore>,
}

/// Yahoo Finance fundamentals client.
///
/// Cheap to clone; clones share the session cache, the result cache and the transport.
#[derive(Clone)]
pub struct YfClient {
    pub(crate) inner: Arc<ClientInner>,
}

impl fmt::Debug for YfClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YfClient")
            .field("cookie_strategy", &self.inner.cookie_strategy)
            .field("auth_fallback", &self.inner.auth_fallback)
            .field("base_quote_api", &self.inner.base_quote_api.as_str())
            .field("base_chart", &self.inner.base_chart.as_str())
            .field("cache_enabled", &self.cache_enabled())
            .finish_non_exhaustive()
    }
}

impl YfClient {
    /// Create a new builder.
    pub fn builder() -> YfClientBuilder {
        YfClientBuilder::default()
    }

    /// Build a client with every setting at its default.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new() -> Result<Self, YfError> {
        Self::builder().build()
    }

    pub fn cache_enabled(&self) -> bool {
        self.inner.cache.is_some()
    }

    pub fn auth_fallback(&self) -> AuthFallback {
        self.inner.auth_fallback
    }

    pub fn cookie_strategy(&self) -> CookieStrategy {
        self.inner.cookie_strategy
    }

    /// Drop the cached session so the next request performs a fresh handshake.
    pub async fn clear_session(&self) {
        self.invalidate_session().await;
    }

    /// Whether a non-expired session is currently cached.
    pub async fn has_session(&self) -> bool {
        self.inner.sessions.get().await.is_some()
    }

    /* -------- internal getters used by other modules -------- */

    pub(crate) fn transport(&self) -> &dyn HttpTransport {
        self.inner.transport.as_ref()
    }
    pub(crate) fn base_quote_api(&self) -> &Url {
        &self.inner.base_quote_api
    }
    pub(crate) fn base_chart(&self) -> &Url {
        &self.inner.base_chart
    }
    pub(crate) fn base_search(&self) -> &Url {
        &self.inner.base_search
    }
    pub(crate) fn default_currency(&self) -> &str {
        &self.inner.default_currency
    }

    /// Number of entries held by the result cache, expired ones included until evicted.
    pub async fn cache_len(&self) -> usize {
        match self.inner.cache.as_ref() {
            Some(store) => store.map.read().await.len(),
            None => 0,
        }
    }

    pub(crate) async fn cache_get(&self, ticker: &str) -> Option<FundamentalsResult> {
        let store = self.inner.cache.as_ref()?;
        {
            let guard = store.map.read().await;
            match guard.get(ticker) {
                Some(entry) if Instant::now() <= entry.expires_at => {
                    return Some(entry.result.clone());
                }
                None => return None,
                Some(_) => {}
            }
        }

        let mut guard = store.map.write().await;
        if guard
            .get(ticker)
            .is_some_and(|e| Instant::now() > e.expires_at)
        {
            guard.remove(ticker);
        }
        None
    }

    pub(crate) async fn cache_put(&self, ticker: &str, result: &FundamentalsResult) {
        let Some(store) = self.inner.cache.as_ref() else {
            return;
        };
        let entry = CacheEntry {
            result: result.clone(),
            expires_at: Instant::now() + store.default_ttl,
        };
        let now = Instant::now();
        let mut guard = store.map.write().await;
        guard.retain(|_, e| now <= e.expires_at);
        guard.insert(ticker.to_string(), entry);
    }
}

/* ----------------------- Builder ----------------------- */

#[derive(Default)]
pub struct YfClientBuilder {
    user_agent: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,

    cookie_strategy: Option<CookieStrategy>,
    full_page_url: Option<Url>,
    cookie_url: Option<Url>,
    crumb_url: Option<Url>,
    base_quote_api: Option<Url>,
    base_chart: Option<Url>,
    base_search: Option<Url>,

    auth_fallback: Option<AuthFallback>,
    default_currency: Option<String>,
    session_ttl: Option<chrono::Duration>,
    cache_ttl: Option<Duration>,

    transport: Option<Arc<dyn HttpTransport>>,
    clock: Option<Arc<dyn Clock>>,
}

impl YfClientBuilder {
    /// Override the User-Agent. Ignored when a custom transport is supplied.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Set a global request timeout (overall). Default: none.
    pub fn timeout(mut self, dur: Duration) -> Self {
        self.timeout = Some(dur);
        self
    }

    /// Set a connect timeout. Default: none.
    pub fn connect_timeout(mut self, dur: Duration) -> Self {
        self.connect_timeout = Some(dur);
        self
    }

    /// Choose how the session cookie is obtained. Default: [`CookieStrategy::Lightweight`].
    pub fn cookie_strategy(mut self, strategy: CookieStrategy) -> Self {
        self.cookie_strategy = Some(strategy);
        self
    }

    /// Override the homepage used by [`CookieStrategy::FullPage`].
    pub fn full_page_url(mut self, url: Url) -> Self {
        self.full_page_url = Some(url);
        self
    }

    /// Override the cookie endpoint used by [`CookieStrategy::Lightweight`].
    pub fn cookie_url(mut self, url: Url) -> Self {
        self.cookie_url = Some(url);
        self
    }

    /// Override the crumb URL.
    pub fn crumb_url(mut self, url: Url) -> Self {
        self.crumb_url = Some(url);
        self
    }

    /// Override the quoteSummary API base (e.g., `https://query2.finance.yahoo.com/v10/finance/quoteSummary/`).
    pub fn base_quote_api(mut self, url: Url) -> Self {
        self.base_quote_api = Some(url);
        self
    }

    /// Override the chart API base (e.g., `https://query1.finance.yahoo.com/v8/finance/chart/`).
    pub fn base_chart(mut self, url: Url) -> Self {
        self.base_chart = Some(url);
        self
    }

    /// Override the search endpoint (e.g., `https://query2.finance.yahoo.com/v1/finance/search`).
    pub fn base_search(mut self, url: Url) -> Self {
        self.base_search = Some(url);
        self
    }

    /// What to do when no session can be established. Default: [`AuthFallback::Fail`].
    pub fn auth_fallback(mut self, fallback: AuthFallback) -> Self {
        self.auth_fallback = Some(fallback);
        self
    }

    /// Currency reported when the upstream names none. Default: `NOK`.
    pub fn default_currency(mut self, code: impl Into<String>) -> Self {
        self.default_currency = Some(code.into());
        self
    }

    /// How long an acquired session is reused. Default: five minutes.
    pub fn session_ttl(mut self, ttl: chrono::Duration) -> Self {
        self.session_ttl = Some(ttl);
        self
    }

    /// Enable the per-ticker result cache with the given freshness window.
    /// If not set, every call goes to the upstream.
    pub fn cache_ttl(mut self, dur: Duration) -> Self {
        self.cache_ttl = Some(dur);
        self
    }

    /// Use a custom HTTP transport instead of the built-in `reqwest` one.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a custom clock for session expiry.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if a default URL fails to parse or the HTTP client cannot be built.
    pub fn build(self) -> Result<YfClient, YfError> {
        let full_page_url = self
            .full_page_url
            .map_or_else(|| Url::parse(DEFAULT_FULL_PAGE_URL), Ok)?;
        let cookie_url = self
            .cookie_url
            .map_or_else(|| Url::parse(DEFAULT_COOKIE_URL), Ok)?;
        let crumb_url = self
            .crumb_url
            .map_or_else(|| Url::parse(DEFAULT_CRUMB_URL), Ok)?;
        let base_quote_api = self
            .base_quote_api
            .map_or_else(|| Url::parse(DEFAULT_BASE_QUOTE_API), Ok)?;
        let base_chart = self
            .base_chart
            .map_or_else(|| Url::parse(DEFAULT_BASE_CHART), Ok)?;
        let base_search = self
            .base_search
            .map_or_else(|| Url::parse(DEFAULT_BASE_SEARCH), Ok)?;

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(t) => t,
            None => Arc::new(ReqwestTransport::new(
                self.user_agent.as_deref().unwrap_or(USER_AGENT),
                self.timeout,
                self.connect_timeout,
            )?),
        };
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        Ok(YfClient {
            inner: Arc::new(ClientInner {
                transport,
                sessions: SessionCache::new(clock),
                session_ttl: self.session_ttl.unwrap_or(SESSION_TTL),
                cookie_strategy: self.cookie_strategy.unwrap_or_default(),
                full_page_url,
                cookie_url,
                crumb_url,
                base_quote_api,
                base_chart,
                base_search,
                auth_fallback: self.auth_fallback.unwrap_or_default(),
                default_currency: self
                    .default_currency
                    .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
                cache: self.cache_ttl.map(|ttl| CacheStore {
                    map: RwLock::new(HashMap::new()),
                    default_ttl: ttl,
                }),
            }),
        })
    }
}
