//! Maps a quoteSummary payload onto [`FundamentalsResult`].
//!
//! Where several upstream fields can supply one output, they are tried in a fixed
//! order and the first present value wins. Upstream modules disagree on which fields
//! they populate per ticker, so the order below is part of the public contract:
//!
//! | output | sources |
//! |---|---|
//! | `market_cap` | `price.marketCap`, `summaryDetail.marketCap` |
//! | `pe` | `summaryDetail.trailingPE`, `defaultKeyStatistics.trailingPE` |
//! | `forward_pe` | `summaryDetail.forwardPE`, `defaultKeyStatistics.forwardPE` |
//! | `eps` | `financialData.earningsPerShare`, `defaultKeyStatistics.trailingEps` |
//! | `dividend_yield` | `summaryDetail.dividendYield`, `summaryDetail.trailingAnnualDividendYield`, `dividendYieldPercentageTTM` ÷ 100, `dividendYieldTTM` |
//! | `dividend_per_share` | `summaryDetail.dividendRate`, `summaryDetail.trailingAnnualDividendRate` |
//! | `beta` | `summaryDetail.beta`, `defaultKeyStatistics.beta` |
//! | `short_name` | `price.shortName`, `price.longName`, the ticker |
//! | `currency` | `price.currency`, `financialData.financialCurrency`, the configured default |
//!
//! All other outputs have a single source.

use serde_json::Value;

use super::wire::{
    FinancialDataModule, KeyStatisticsModule, PriceModule, RootDividendFields,
    SummaryDetailModule, lenient, locate_result, raw, text,
};
use super::{DataSource, FundamentalsResult};

/// How a dividend-yield source expresses its value.
#[derive(Clone, Copy)]
enum YieldUnit {
    Fraction,
    Percent,
}

impl YieldUnit {
    fn to_fraction(self, v: f64) -> f64 {
        match self {
            Self::Fraction => v,
            Self::Percent => v / 100.0,
        }
    }
}

/// Normalize a quoteSummary body (wrapped or unwrapped) for `ticker`.
///
/// Never fails: missing, empty, or oddly typed fields come out as `None`.
#[must_use]
pub fn normalize(body: &Value, ticker: &str, default_currency: &str) -> FundamentalsResult {
    let result = locate_result(body);

    let price: PriceModule = lenient(result.get("price"));
    let summary: SummaryDetailModule = lenient(result.get("summaryDetail"));
    let stats: KeyStatisticsModule = lenient(result.get("defaultKeyStatistics"));
    let financial: FinancialDataModule = lenient(result.get("financialData"));
    let root: RootDividendFields = lenient(Some(result));

    let yield_sources = [
        (raw(summary.dividend_yield), YieldUnit::Fraction),
        (raw(summary.trailing_annual_dividend_yield), YieldUnit::Fraction),
        (raw(summary.dividend_yield_percentage_ttm), YieldUnit::Percent),
        (raw(root.dividend_yield_percentage_ttm), YieldUnit::Percent),
        (raw(summary.dividend_yield_ttm), YieldUnit::Fraction),
        (raw(root.dividend_yield_ttm), YieldUnit::Fraction),
    ];
    let dividend_yield = yield_sources
        .into_iter()
        .find_map(|(v, unit)| v.map(|v| unit.to_fraction(v)));

    FundamentalsResult {
        market_cap: raw(price.market_cap).or(raw(summary.market_cap)),
        pe: raw(summary.trailing_pe).or(raw(stats.trailing_pe)),
        forward_pe: raw(summary.forward_pe).or(raw(stats.forward_pe)),
        pb: raw(stats.price_to_book),
        ps: raw(stats.price_to_sales_trailing12_months),
        peg: raw(stats.peg_ratio),

        eps: raw(financial.earnings_per_share).or(raw(stats.trailing_eps)),
        book_value: raw(stats.book_value),

        dividend_yield,
        dividend_per_share: raw(summary.dividend_rate)
            .or(raw(summary.trailing_annual_dividend_rate)),

        revenue: raw(financial.total_revenue),
        ebitda: raw(financial.ebitda),
        profit_margin: raw(financial.profit_margins),

        fifty_two_week_high: raw(summary.fifty_two_week_high),
        fifty_two_week_low: raw(summary.fifty_two_week_low),

        beta: raw(summary.beta).or(raw(stats.beta)),
        price: raw(price.regular_market_price),
        volume: raw(price.regular_market_volume),

        short_name: text(price.short_name)
            .or_else(|| text(price.long_name))
            .unwrap_or_else(|| ticker.to_string()),
        currency: text(price.currency)
            .or_else(|| text(financial.financial_currency))
            .unwrap_or_else(|| default_currency.to_string()),
        source: DataSource::Authenticated,
    }
}
