use serde::{Deserialize, Deserializer};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::Value;

/// A numeric field as the upstream sends it.
///
/// Yahoo uses a bare number, a `{raw, fmt}` envelope, or `{}` for "not available"
/// interchangeably; anything that is not one of the first two reduces to `None`.
#[derive(Clone, Copy, Default)]
pub(crate) struct RawValue(Option<f64>);

impl<'de> Deserialize<'de> for RawValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Value::deserialize(deserializer)?;
        Ok(Self(raw_value(&v)))
    }
}

/// Reduce an optional wire value to `Option<f64>`.
pub(crate) fn raw(v: Option<RawValue>) -> Option<f64> {
    v.and_then(|r| r.0)
}

/// The `raw` reducer applied directly to a JSON value: a bare number is itself, an
/// object with a numeric `raw` key is that value, everything else is `None`.
pub fn raw_value(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64(),
        Value::Object(map) => map.get("raw").and_then(Value::as_f64),
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

/// A string field that tolerates other JSON types (they read as absent).
#[derive(Deserialize, Clone)]
#[serde(untagged)]
pub(crate) enum Text {
    Str(String),
    Other(IgnoredAny),
}

pub(crate) fn text(v: Option<Text>) -> Option<String> {
    match v {
        Some(Text::Str(s)) if !s.trim().is_empty() => Some(s),
        _ => None,
    }
}

/// Decode `v` as `T`, falling back to `T::default()` when it has the wrong shape.
pub(crate) fn lenient<T: DeserializeOwned + Default>(v: Option<&Value>) -> T {
    v.filter(|v| v.is_object())
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_default()
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct PriceModule {
    pub(crate) market_cap: Option<RawValue>,
    pub(crate) regular_market_price: Option<RawValue>,
    pub(crate) regular_market_volume: Option<RawValue>,
    pub(crate) short_name: Option<Text>,
    pub(crate) long_name: Option<Text>,
    pub(crate) currency: Option<Text>,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct SummaryDetailModule {
    pub(crate) market_cap: Option<RawValue>,
    #[serde(rename = "trailingPE")]
    pub(crate) trailing_pe: Option<RawValue>,
    #[serde(rename = "forwardPE")]
    pub(crate) forward_pe: Option<RawValue>,
    pub(crate) dividend_yield: Option<RawValue>,
    pub(crate) trailing_annual_dividend_yield: Option<RawValue>,
    #[serde(rename = "dividendYieldPercentageTTM")]
    pub(crate) dividend_yield_percentage_ttm: Option<RawValue>,
    #[serde(rename = "dividendYieldTTM")]
    pub(crate) dividend_yield_ttm: Option<RawValue>,
    pub(crate) dividend_rate: Option<RawValue>,
    pub(crate) trailing_annual_dividend_rate: Option<RawValue>,
    pub(crate) fifty_two_week_high: Option<RawValue>,
    pub(crate) fifty_two_week_low: Option<RawValue>,
    pub(crate) beta: Option<RawValue>,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct KeyStatisticsModule {
    #[serde(rename = "trailingPE")]
    pub(crate) trailing_pe: Option<RawValue>,
    #[serde(rename = "forwardPE")]
    pub(crate) forward_pe: Option<RawValue>,
    pub(crate) price_to_book: Option<RawValue>,
    pub(crate) price_to_sales_trailing12_months: Option<RawValue>,
    pub(crate) peg_ratio: Option<RawValue>,
    pub(crate) trailing_eps: Option<RawValue>,
    pub(crate) book_value: Option<RawValue>,
    pub(crate) beta: Option<RawValue>,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct FinancialDataModule {
    pub(crate) earnings_per_share: Option<RawValue>,
    pub(crate) total_revenue: Option<RawValue>,
    pub(crate) ebitda: Option<RawValue>,
    pub(crate) profit_margins: Option<RawValue>,
    pub(crate) financial_currency: Option<Text>,
}

/// Dividend fields some payloads carry at the top level of the result.
#[derive(Deserialize, Default)]
#[serde(default)]
pub(crate) struct RootDividendFields {
    #[serde(rename = "dividendYieldPercentageTTM")]
    pub(crate) dividend_yield_percentage_ttm: Option<RawValue>,
    #[serde(rename = "dividendYieldTTM")]
    pub(crate) dividend_yield_ttm: Option<RawValue>,
}

/// The quoteSummary `error` object.
#[derive(Deserialize)]
pub(crate) struct V10Error {
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    pub(crate) code: Option<String>,
}

/// The error carried in a `quoteSummary` envelope, if any.
pub(crate) fn envelope_error(body: &Value) -> Option<V10Error> {
    body.pointer("/quoteSummary/error")
        .filter(|v| !v.is_null())
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}

/// The result object: `quoteSummary.result[0]` when present, else the body itself.
pub(crate) fn locate_result(body: &Value) -> &Value {
    body.pointer("/quoteSummary/result/0")
        .filter(|v| v.is_object())
        .unwrap_or(body)
}
