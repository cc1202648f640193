//! yfinance-fundamentals: crumb-authenticated Yahoo Finance fundamentals.
//!
//! [`YfClient::get_fundamentals`] obtains a session cookie and crumb, caches them for a
//! few minutes, fetches the quoteSummary fundamentals modules and flattens them into a
//! [`FundamentalsResult`]. An expired session is refreshed once per call. When the
//! handshake cannot be performed, [`YfClient::get_price_only`] (or
//! [`AuthFallback::PriceOnly`]) serves a price-only snapshot from the public chart
//! endpoint. The same unauthenticated endpoints back [`YfClient::chart`],
//! [`YfClient::quotes`] and [`YfClient::search`].
//!
//! ```no_run
//! # async fn run() -> Result<(), yfinance_fundamentals::YfError> {
//! let client = yfinance_fundamentals::YfClient::new()?;
//! let f = client.get_fundamentals("EQNR.OL").await?;
//! println!("{} P/E {:?}", f.short_name, f.pe);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod fundamentals;
pub mod price;
pub mod search;

pub use crate::core::{
    AcquisitionFailure, AuthFallback, CacheMode, Clock, CookieStrategy, ErrorPayload,
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, ManualClock, ReqwestTransport,
    SESSION_TTL, Session, SessionCache, SystemClock, YfClient, YfClientBuilder, YfError,
};
pub use fundamentals::{DataSource, FundamentalsResult, normalize, raw_value};
pub use price::{ChartMeta, ChartSeries, Interval, PriceQuote, Range};
pub use search::SearchQuote;

/// Install a `tracing` subscriber that honours `RUST_LOG`. Dev-only convenience.
#[cfg(feature = "tracing-subscriber")]
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};
    let _ = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init();
}
