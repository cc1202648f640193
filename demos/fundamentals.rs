use std::time::Duration;
use yfinance_fundamentals::{AuthFallback, CookieStrategy, ErrorPayload, YfClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "tracing-subscriber")]
    yfinance_fundamentals::init_tracing();

    let ticker = std::env::args().nth(1).unwrap_or_else(|| "EQNR.OL".to_string());

    let client = YfClient::builder()
        .cookie_strategy(CookieStrategy::Lightweight)
        .auth_fallback(AuthFallback::PriceOnly)
        .timeout(Duration::from_secs(10))
        .cache_ttl(Duration::from_secs(120))
        .build()?;

    match client.get_fundamentals(&ticker).await {
        Ok(f) => println!("{}", serde_json::to_string_pretty(&f)?),
        Err(e) => println!("{}", serde_json::to_string_pretty(&ErrorPayload::from(&e))?),
    }

    for q in client.quotes(["AAPL", "MSFT", ticker.as_str()]).await {
        println!(
            "{:<10} {:>10.2} {:>+8.2}%  {}",
            q.symbol,
            q.regular_market_price,
            q.regular_market_change_percent,
            q.currency.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}
