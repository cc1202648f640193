//! Centralized constants for default endpoints and UA.

/// Default desktop UA to avoid trivial bot blocking.
pub(crate) const USER_AGENT: &str = concat!(
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) ",
    "AppleWebKit/537.36 (KHTML, like Gecko) ",
    "Chrome/122.0.0.0 Safari/537.36"
);

/// Yahoo Finance homepage; sets the session cookie among a very large header block.
pub(crate) const DEFAULT_FULL_PAGE_URL: &str = "https://finance.yahoo.com/";

/// Minimal endpoint that only sets the session cookie.
pub(crate) const DEFAULT_COOKIE_URL: &str = "https://fc.yahoo.com/";

/// URL to fetch a crumb (requires the session cookie).
pub(crate) const DEFAULT_CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";

/// Yahoo quoteSummary API base (symbol is appended).
pub(crate) const DEFAULT_BASE_QUOTE_API: &str =
    "https://query2.finance.yahoo.com/v10/finance/quoteSummary/";

/// Yahoo chart API base (symbol is appended).
pub(crate) const DEFAULT_BASE_CHART: &str = "https://query1.finance.yahoo.com/v8/finance/chart/";

/// Yahoo symbol search endpoint.
pub(crate) const DEFAULT_BASE_SEARCH: &str = "https://query2.finance.yahoo.com/v1/finance/search";

/// Modules requested from quoteSummary for a fundamentals snapshot.
pub(crate) const FUNDAMENTALS_MODULES: &str = "defaultKeyStatistics,summaryDetail,financialData,price";

/// Currency reported when the upstream does not name one.
pub(crate) const DEFAULT_CURRENCY: &str = "NOK";

/// Header-block size the homepage needs the transport to accept.
pub(crate) const FULL_PAGE_MIN_HEADER_BYTES: usize = 64 * 1024;
