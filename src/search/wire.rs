use serde::Deserialize;

use crate::fundamentals::wire::Text;

#[derive(Deserialize)]
pub(crate) struct V1SearchEnvelope {
    #[serde(default)]
    pub(crate) quotes: Option<Vec<serde_json::Value>>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub(crate) struct V1SearchQuote {
    pub(crate) symbol: Option<Text>,
    pub(crate) shortname: Option<Text>,
    pub(crate) longname: Option<Text>,
    pub(crate) exchange: Option<Text>,
    #[serde(rename = "exchDisp")]
    pub(crate) exch_disp: Option<Text>,
    #[serde(rename = "quoteType")]
    pub(crate) quote_type: Option<Text>,
    #[serde(rename = "typeDisp")]
    pub(crate) type_disp: Option<Text>,
}
