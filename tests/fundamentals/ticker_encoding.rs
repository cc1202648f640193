use crate::common::{ScriptedTransport, response};
use std::sync::Arc;
use yfinance_fundamentals::{YfClient, YfError};

fn handshake_then(body: &str) -> Arc<ScriptedTransport> {
    ScriptedTransport::new(vec![
        response(404, &[("set-cookie", "A3=abc123; Path=/")], ""),
        response(200, &[], "xY9.crumb"),
        response(200, &[], body),
    ])
}

#[tokio::test]
async fn ticker_is_a_single_encoded_path_segment() {
    let cases = [
        (
            "https://attacker.example/x",
            "/v10/finance/quoteSummary/https:%2F%2Fattacker.example%2Fx",
        ),
        ("BRK/B", "/v10/finance/quoteSummary/BRK%2FB"),
        ("A?b=1", "/v10/finance/quoteSummary/A%3Fb=1"),
        ("X#frag", "/v10/finance/quoteSummary/X%23frag"),
        ("EQNR.OL", "/v10/finance/quoteSummary/EQNR.OL"),
    ];

    for (ticker, path) in cases {
        let transport = handshake_then("{}");
        let client = YfClient::builder()
            .transport(transport.clone())
            .build()
            .unwrap();
        client.get_fundamentals(ticker).await.unwrap();

        let requests = transport.requests.lock().unwrap();
        let url = &requests[2].url;
        assert_eq!(url.host_str(), Some("query2.finance.yahoo.com"), "{ticker}");
        assert_eq!(url.path(), path, "{ticker}");
        assert_eq!(url.fragment(), None, "{ticker}");
        let keys: Vec<String> = url.query_pairs().map(|(k, _)| k.into_owned()).collect();
        assert_eq!(keys, ["modules", "crumb"], "{ticker}");
    }
}

#[tokio::test]
async fn chart_requests_encode_the_ticker_too() {
    let chart = r#"{"chart":{"result":[{"meta":{"regularMarketPrice":1.0}}],"error":null}}"#;
    let cases = [
        ("/EQNR.OL", "/v8/finance/chart/%2FEQNR.OL"),
        ("a:b", "/v8/finance/chart/a:b"),
        ("https://attacker.example/x", "/v8/finance/chart/https:%2F%2Fattacker.example%2Fx"),
    ];

    for (ticker, path) in cases {
        let transport = ScriptedTransport::new(vec![response(200, &[], chart)]);
        let client = YfClient::builder()
            .transport(transport.clone())
            .build()
            .unwrap();
        client.get_price_only(ticker).await.unwrap();

        let requests = transport.requests.lock().unwrap();
        let url = &requests[0].url;
        assert_eq!(url.scheme(), "https", "{ticker}");
        assert_eq!(url.host_str(), Some("query1.finance.yahoo.com"), "{ticker}");
        assert_eq!(url.path(), path, "{ticker}");
    }
}

#[tokio::test]
async fn dot_segments_are_rejected() {
    for ticker in [".", ".."] {
        let transport = ScriptedTransport::new(vec![]);
        let client = YfClient::builder()
            .transport(transport.clone())
            .build()
            .unwrap();
        let err = client.get_price_only(ticker).await.unwrap_err();
        assert!(matches!(err, YfError::InvalidTicker), "{ticker}: {err:?}");
        assert!(transport.request_urls().is_empty());
    }
}
