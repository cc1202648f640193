use crate::common::{self, ScriptedTransport, response};
use httpmock::Method::GET;
use yfinance_fundamentals::{AcquisitionFailure, CookieStrategy, YfClient, YfError};

#[tokio::test]
async fn lightweight_is_the_default_strategy() {
    let server = common::setup_server();
    let home = server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200).header("set-cookie", "A3=home; Path=/");
    });
    let (cookie, crumb) = common::mock_cookie_crumb(&server);
    let api = common::mock_summary(&server, "EQNR.OL", "xY9.crumb", 200, "{}");

    let client = common::client_for(&server);
    assert_eq!(client.cookie_strategy(), CookieStrategy::Lightweight);
    client.get_fundamentals("EQNR.OL").await.unwrap();

    cookie.assert();
    crumb.assert();
    api.assert();
    home.assert_calls(0);
}

#[tokio::test]
async fn full_page_strategy_reads_cookie_from_homepage() {
    let server = common::setup_server();
    let home = server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200)
            .header("set-cookie", "A3=home; Expires=Thu, 01 Jan 2032 00:00:00 GMT; Path=/; Secure")
            .body("<!doctype html><html></html>");
    });
    let light = common::mock_cookie(&server, "A3=abc123");
    let crumb = common::mock_crumb(&server, "A3=home", "home.crumb");
    let api = common::mock_summary(&server, "EQNR.OL", "home.crumb", 200, "{}");

    let client = common::builder_for(&server)
        .cookie_strategy(CookieStrategy::FullPage)
        .build()
        .unwrap();
    client.get_fundamentals("EQNR.OL").await.unwrap();

    home.assert();
    crumb.assert();
    api.assert();
    light.assert_calls(0);
}

#[tokio::test]
async fn every_set_cookie_pair_is_joined_without_attributes() {
    let transport = ScriptedTransport::new(vec![
        response(
            404,
            &[
                ("set-cookie", "A1=d=AQABBK&S=AQAAAj; Expires=Fri, 16 Oct 2027 12:00:00 GMT; Max-Age=31557600; Domain=.yahoo.com; Path=/; SameSite=Lax; Secure; HttpOnly"),
                ("content-type", "text/html"),
                ("Set-Cookie", "A3=d=AQABBK&S=AQAAAj; Path=/; Secure"),
                ("set-cookie", "; Secure"),
            ],
            "",
        ),
        response(200, &[], "tok"),
        response(200, &[], "{}"),
    ]);

    let client = YfClient::builder()
        .transport(transport.clone())
        .build()
        .unwrap();
    client.get_fundamentals("EQNR.OL").await.unwrap();

    let requests = transport.requests.lock().unwrap();
    let cookie = requests[1]
        .headers
        .iter()
        .find(|(k, _)| k == "cookie")
        .map(|(_, v)| v.clone());
    assert_eq!(
        cookie.as_deref(),
        Some("A1=d=AQABBK&S=AQAAAj; A3=d=AQABBK&S=AQAAAj")
    );
}

#[tokio::test]
async fn full_page_needs_a_transport_with_large_header_tolerance() {
    let transport = ScriptedTransport::with_header_limit(vec![], 16 * 1024);

    let client = YfClient::builder()
        .transport(transport.clone())
        .cookie_strategy(CookieStrategy::FullPage)
        .build()
        .unwrap();
    let err = client.get_fundamentals("EQNR.OL").await.unwrap_err();

    match err {
        YfError::Acquisition(AcquisitionFailure::HeadersTooLarge { limit, required }) => {
            assert_eq!(limit, 16 * 1024);
            assert_eq!(required, 64 * 1024);
        }
        other => panic!("expected HeadersTooLarge, got {other:?}"),
    }
    // Nothing was sent.
    assert!(transport.request_urls().is_empty());
}
